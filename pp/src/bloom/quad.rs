use glowgpu::prelude::*;
use glowgpu::wgpu;
use tracing::trace;

/// A render target and the pixel rectangle a quad covers in it.
#[derive(Copy, Clone)]
pub struct QuadTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub size: D2,
}

/// Draws one program over all of `target`.
///
/// The program's pipeline decides blending (opaque) and culling (none); its
/// bind group must already hold the input textures and parameters.
pub fn draw_fullscreen(
    encoder: &mut CommandEncoder,
    label: &str,
    pipeline: &RenderPipeline,
    bind_group: &BindGroup,
    target: QuadTarget,
) {
    let (width, height) = target.size;
    trace!("Drawing {} into {}x{}", label, width, height);

    let mut pass = encoder
        .render_pass(label, target.view)
        .clear_color(0x0000_0000)
        .with_viewport(0.0, 0.0, width as f32, height as f32)
        .with_pipeline(pipeline)
        .begin();
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw_triangle();
}
