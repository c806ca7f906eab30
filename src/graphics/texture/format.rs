use std::ops::Deref;

// Re-export TextureFormat
pub use wgpu::TextureFormat;

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct TexFormat(pub TextureFormat);

impl Deref for TexFormat {
    type Target = TextureFormat;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TexFormat {
    pub const fn new(format: wgpu::TextureFormat) -> Self {
        Self(format)
    }

    pub const fn to_wgpu(self) -> wgpu::TextureFormat {
        self.0
    }

    /// Opaque color target: the fragment output replaces the attachment.
    pub const fn target(self) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.to_wgpu(),
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    /// Bytes per texel for the uncompressed color formats we read and write.
    pub const fn texel_size(self) -> Option<u32> {
        Some(match self.0 {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm | TextureFormat::R16Float => 2,
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8UnormSrgb
            | TextureFormat::Bgra8Unorm
            | TextureFormat::Bgra8UnormSrgb
            | TextureFormat::Rgb10a2Unorm
            | TextureFormat::Rg11b10Float
            | TextureFormat::R32Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
            _ => return None,
        })
    }
}

impl From<wgpu::TextureFormat> for TexFormat {
    fn from(format: wgpu::TextureFormat) -> Self {
        TexFormat(format)
    }
}

impl From<TexFormat> for wgpu::TextureFormat {
    fn from(format: TexFormat) -> Self {
        format.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_opaque() {
        let target = TexFormat::new(TextureFormat::Bgra8UnormSrgb).target();
        assert_eq!(target.format, TextureFormat::Bgra8UnormSrgb);
        assert_eq!(target.blend, Some(wgpu::BlendState::REPLACE));
        assert_eq!(target.write_mask, wgpu::ColorWrites::ALL);
    }

    #[test]
    fn texel_size_of_common_formats() {
        assert_eq!(TexFormat(TextureFormat::Rgba8Unorm).texel_size(), Some(4));
        assert_eq!(TexFormat(TextureFormat::Rgba16Float).texel_size(), Some(8));
        assert_eq!(TexFormat(TextureFormat::Depth32Float).texel_size(), None);
    }
}
