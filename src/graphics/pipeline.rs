mod builder;
pub use builder::*;

pub struct RenderPipeline {
    pub inner: wgpu::RenderPipeline,
}
crate::wgpu_inner_deref!(RenderPipeline, wgpu::RenderPipeline);
