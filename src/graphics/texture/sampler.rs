use crate::GpuHandle;

pub struct Sampler {
    pub inner: wgpu::Sampler,
}
crate::wgpu_inner_deref!(Sampler, wgpu::Sampler);

// 'a: Label str
pub struct SamplerBuilder<'a> {
    pub gpu: GpuHandle,
    pub inner: wgpu::SamplerDescriptor<'a>,
}

impl<'a> SamplerBuilder<'a> {
    pub fn new(gpu: GpuHandle, label: &'a str) -> Self {
        Self {
            gpu,
            inner: wgpu::SamplerDescriptor {
                label: Some(label),
                ..Default::default()
            },
        }
    }

    pub fn create(&self) -> Sampler {
        Sampler {
            inner: self.gpu.device.create_sampler(&self.inner),
        }
    }

    /// Out of bounds accesses repeat the edge texel.
    /// xyz/uvw are all affected (for now)
    pub fn clamp_to_edge(mut self) -> Self {
        self.inner.address_mode_u = wgpu::AddressMode::ClampToEdge;
        self.inner.address_mode_v = wgpu::AddressMode::ClampToEdge;
        self.inner.address_mode_w = wgpu::AddressMode::ClampToEdge;
        self
    }

    pub fn lerp_filter(mut self) -> Self {
        self.inner.mag_filter = wgpu::FilterMode::Linear;
        self.inner.min_filter = wgpu::FilterMode::Linear;
        self.inner.mipmap_filter = wgpu::FilterMode::Linear;
        self
    }
}
