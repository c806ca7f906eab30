mod sampler;
pub use sampler::*;

mod builder;
pub use builder::*;

mod format;
pub use format::*;

use crate::{GpuError, GpuHandle};

// Re-export TextureFormat
pub use wgpu::TextureFormat;

pub struct Texture<D = D2>
where
    D: TextureDimensions,
{
    pub(crate) gpu: GpuHandle,
    inner: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: D,
    pub usage: wgpu::TextureUsages,
}
impl<D> std::ops::Deref for Texture<D>
where
    D: TextureDimensions,
{
    type Target = wgpu::Texture;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<D> Texture<D>
where
    D: TextureDimensions,
{
    pub fn width(&self) -> u32 {
        self.size.width()
    }

    pub fn height(&self) -> u32 {
        self.size.height()
    }

    /// Uploads tightly packed texels covering the whole texture.
    /// # Errors
    /// Errors when the texel size of the format is unknown.
    pub fn write<T>(&self, data: &[T]) -> Result<(), GpuError>
    where
        T: bytemuck::Pod,
    {
        let texel_size = TexFormat(self.format)
            .texel_size()
            .ok_or(GpuError::UnsupportedFormat(self.format))?;

        self.gpu.queue.write_texture(
            self.inner.as_image_copy(),
            bytemuck::cast_slice(data),
            wgpu::ImageDataLayout {
                // This is 0 because our source should not be offset
                offset: 0,
                bytes_per_row: Some(self.size.width() * texel_size),
                rows_per_image: None,
            },
            self.size.as_extent(),
        );
        Ok(())
    }

    /// Copies the texture into a staging buffer and blocks until it can be read.
    /// The texture must have been created with `allow_copy_from()`.
    /// Rows are returned tightly packed, without the copy alignment padding.
    /// # Errors
    /// Errors when the format cannot be read back or the staging buffer fails to map.
    pub fn read_immediately(&self) -> Result<Vec<u8>, GpuError> {
        let texel_size = TexFormat(self.format)
            .texel_size()
            .ok_or(GpuError::UnsupportedFormat(self.format))?;

        let unpadded_bytes_per_row = self.size.width() * texel_size;
        let padded_bytes_per_row = {
            let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
            let padding = (align - unpadded_bytes_per_row % align) % align;
            unpadded_bytes_per_row + padding
        };
        let rows = self.size.height() * self.size.depth();

        let staging_buf = self
            .gpu
            .new_buffer("texture read staging buffer")
            .allow_copy_to()
            .allow_map_read()
            .with_size(u64::from(padded_bytes_per_row) * u64::from(rows))
            .build();

        let mut enc = self
            .gpu
            .create_command_encoder("texture read immediately enc");
        enc.copy_texture_to_buffer(
            self.inner.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &staging_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: None,
                },
            },
            self.size.as_extent(),
        );
        enc.submit();

        let padded = staging_buf.download()?;
        Ok(padded
            .chunks(padded_bytes_per_row as usize)
            .flat_map(|row| &row[..unpadded_bytes_per_row as usize])
            .copied()
            .collect())
    }
}

pub type D2 = (u32, u32);

pub trait TextureDimensions: Copy {
    fn dim(&self) -> wgpu::TextureDimension;
    fn as_extent(&self) -> wgpu::Extent3d;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn depth(&self) -> u32;
}

impl TextureDimensions for (u32, u32) {
    fn dim(&self) -> wgpu::TextureDimension {
        wgpu::TextureDimension::D2
    }
    fn as_extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.0,
            height: self.1,
            depth_or_array_layers: 1,
        }
    }
    fn width(&self) -> u32 {
        self.0
    }
    fn height(&self) -> u32 {
        self.1
    }
    fn depth(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::TextureDimensions;

    #[test]
    fn d2_extent_has_one_layer() {
        let extent = (640_u32, 360_u32).as_extent();
        assert_eq!(extent.width, 640);
        assert_eq!(extent.height, 360);
        assert_eq!(extent.depth_or_array_layers, 1);
        assert_eq!((640_u32, 360_u32).dim(), wgpu::TextureDimension::D2);
    }

    #[test]
    fn texture_write_read() {
        let gpu = match crate::Gpu::builder()
            .with_backends(crate::Backends::all())
            .with_power_preference(crate::PowerPreference::LowPower)
            .build_headless()
        {
            Ok(gpu) => gpu,
            Err(err) => {
                eprintln!("skipping texture_write_read: {}", err);
                return;
            }
        };
        // 5 texels wide so rows need alignment padding on readback
        let data: Vec<u32> = (0..5 * 3).collect();

        let texture = gpu
            .new_texture("write read test")
            .with_format(wgpu::TextureFormat::Rgba8Unorm)
            .allow_copy_from()
            .allow_copy_to()
            .create_empty((5_u32, 3_u32));
        texture.write(&data).unwrap();

        let texture_read = texture.read_immediately().unwrap();

        assert_eq!(bytemuck::cast_slice::<u32, u8>(&data), texture_read.as_slice());
    }
}
