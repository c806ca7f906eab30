pub use crate::{
    BindGroup, Binding, Buffer, CommandEncoder, D2, GpuError, GpuHandle, RenderAttachmentExt,
    RenderPipeline, Sampler, TexFormat, Texture, TextureDimensions, ViewBindingExt,
};
pub use wgpu::TextureFormat;
