use tracing::debug;

use crate::{GpuHandle, Texture, TextureDimensions};

pub struct TextureBuilder<'a> {
    gpu: GpuHandle,
    texture: wgpu::TextureDescriptor<'a>,
    view: wgpu::TextureViewDescriptor<'a>,
}

impl<'a> TextureBuilder<'a> {
    pub const DEFAULT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(gpu: GpuHandle, label: &'a str) -> Self {
        Self {
            gpu,
            texture: wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d::default(),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::DEFAULT_FORMAT,
                usage: wgpu::TextureUsages::empty(),
                view_formats: &[],
            },
            view: wgpu::TextureViewDescriptor {
                label: Some(label),
                ..Default::default()
            },
        }
    }

    /// Creates the texture without uploading any data.
    /// Contents are zeroed by wgpu.
    pub fn create_empty<D>(mut self, size: D) -> Texture<D>
    where
        D: TextureDimensions,
    {
        self.texture.size = size.as_extent();
        self.texture.dimension = size.dim();

        debug!(
            "Creating texture {:?} at {:?} ({:?})",
            self.texture.label, self.texture.size, self.texture.format
        );
        let inner = self.gpu.device.create_texture(&self.texture);
        let view = inner.create_view(&self.view);

        Texture {
            gpu: self.gpu,
            inner,
            view,
            format: self.texture.format,
            size,
            usage: self.texture.usage,
        }
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.texture.format = format;
        self
    }

    pub fn allow_copy_from(mut self) -> Self {
        self.texture.usage |= wgpu::TextureUsages::COPY_SRC;
        self
    }

    pub fn allow_copy_to(mut self) -> Self {
        self.texture.usage |= wgpu::TextureUsages::COPY_DST;
        self
    }

    pub fn allow_binding(mut self) -> Self {
        self.texture.usage |= wgpu::TextureUsages::TEXTURE_BINDING;
        self
    }

    /// Adds a whole set of usages at once, see `pub_const_flag!`.
    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.texture.usage |= usage;
        self
    }
}
