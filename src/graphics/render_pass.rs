use std::ops::{Deref, DerefMut};

use wgpu::LoadOp;

use crate::CommandEncoder;

/// Unpacks `0xRRGGBBAA` into a normalized wgpu color.
pub fn color_from_rgba(value: u32) -> wgpu::Color {
    let [r, g, b, a] = value.to_be_bytes();
    wgpu::Color {
        r: r as f64 / 255.0,
        g: g as f64 / 255.0,
        b: b as f64 / 255.0,
        a: a as f64 / 255.0,
    }
}

pub trait RenderAttachmentExt {
    fn clear(&mut self, value: u32) -> &mut Self;
}

impl<'a> RenderAttachmentExt for wgpu::RenderPassColorAttachment<'a> {
    fn clear(&mut self, value: u32) -> &mut Self {
        self.ops.load = LoadOp::Clear(color_from_rgba(value));
        self
    }
}

impl CommandEncoder {
    /// Starts a render pass that draws into `view`.
    /// The attachment loads its previous contents unless `clear_color` is called.
    pub fn render_pass<'a>(
        &'a mut self,
        label: &'a str,
        view: &'a wgpu::TextureView,
    ) -> RenderPassBuilder<'a> {
        RenderPassBuilder {
            encoder: self,
            label,
            attachment: wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            },
            init_pipeline: None,
            viewport: None,
        }
    }
}

pub struct RenderPassBuilder<'a> {
    /// Encoder is used to create the render pass on begin()
    encoder: &'a mut wgpu::CommandEncoder,
    label: &'a str,
    attachment: wgpu::RenderPassColorAttachment<'a>,
    /// An optional pipeline that the render pass will start with
    init_pipeline: Option<&'a wgpu::RenderPipeline>,
    /// x, y, width, height in pixels
    viewport: Option<[f32; 4]>,
}

impl<'a> RenderPassBuilder<'a> {
    #[inline]
    pub fn with_pipeline(mut self, pipeline: &'a wgpu::RenderPipeline) -> Self {
        self.init_pipeline = Some(pipeline);
        self
    }

    pub fn clear_color(mut self, value: u32) -> Self {
        self.attachment.clear(value);
        self
    }

    /// Restricts rasterization to a sub-rectangle of the attachment.
    pub fn with_viewport(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.viewport = Some([x, y, width, height]);
        self
    }

    pub fn begin(self) -> RenderPass<'a> {
        let mut inner = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label),
            color_attachments: &[Some(self.attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some([x, y, w, h]) = self.viewport {
            inner.set_viewport(x, y, w, h, 0.0, 1.0);
        }

        if let Some(pipeline) = self.init_pipeline {
            inner.set_pipeline(pipeline);
        }

        RenderPass { inner }
    }
}

pub struct RenderPass<'a> {
    inner: wgpu::RenderPass<'a>,
}

impl RenderPass<'_> {
    /// Draws one triangle with no vertex buffers, for shaders that derive
    /// positions from the vertex index.
    #[inline]
    pub fn draw_triangle(&mut self) {
        self.inner.draw(0..3, 0..1);
    }
}
impl<'a> RenderPass<'a> {
    /// Shadows wgpu::RenderPass::set_bind_group and returns self for chaining
    pub fn set_bind_group(
        &mut self,
        index: u32,
        bind_group: &'a wgpu::BindGroup,
        offsets: &[wgpu::DynamicOffset],
    ) -> &mut Self {
        self.inner.set_bind_group(index, bind_group, offsets);
        self
    }

    /// Shadows wgpu::RenderPass::set_pipeline and returns self for chaining
    pub fn set_pipeline(&mut self, pipeline: &'a wgpu::RenderPipeline) -> &mut Self {
        self.inner.set_pipeline(pipeline);
        self
    }
}

impl<'a> Deref for RenderPass<'a> {
    type Target = wgpu::RenderPass<'a>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<'a> DerefMut for RenderPass<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_unpacks_big_endian() {
        let c = color_from_rgba(0xFF00_80FF);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn transparent_black_is_zero() {
        assert_eq!(color_from_rgba(0), wgpu::Color::TRANSPARENT);
    }
}
