use std::borrow::Cow;

use futures::executor::block_on;
use tracing::error;
use wgpu::ShaderSource;

use crate::GpuError;
use crate::GpuHandle;

use crate::RenderPipeline;

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

/// Builds render pipelines whose vertex and fragment stages live in one WGSL module.
/// Defaults suit full-screen passes: triangle list, no culling, no depth.
pub struct PipelineBuilder<'a> {
    /// Handle to the Gpu
    gpu: GpuHandle,
    label: Option<&'a str>,
    /// Data that is used to build the pipeline
    /// This is a seperate struct to take advantage of Default trait derivation
    desc: PipelineDescriptor<'a>,

    /// WGSL source containing both entry points
    shader: Option<ShaderSource<'a>>,
    fragment_targets: Vec<Option<wgpu::ColorTargetState>>,
}

#[derive(Default)]
struct PipelineDescriptor<'a> {
    // PIPELINE LAYOUT
    /// Bind groups that this pipeline uses. The first entry will provide all the bindings for
    /// "group = 0", second entry will provide all the bindings for "group = 1" etc.
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    // RENDER PIPELINE
    /// Primitive type the input mesh is composed of. Has Default.
    primitive: wgpu::PrimitiveState,
    multisample: wgpu::MultisampleState,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(gpu: GpuHandle, label: &'a str) -> Self {
        Self {
            gpu,
            label: Some(label),
            desc: PipelineDescriptor::default(),
            shader: None,
            fragment_targets: Vec::new(),
        }
        .cull_none()
    }

    /// Sets the WGSL module holding `vs_main` and `fs_main`.
    pub fn with_vertex_fragment(mut self, wgsl: impl Into<Cow<'a, str>>) -> Self {
        self.shader = Some(ShaderSource::Wgsl(wgsl.into()));
        self
    }

    pub fn with_fragment_targets(mut self, targets: &[wgpu::ColorTargetState]) -> Self {
        self.fragment_targets = targets.iter().cloned().map(Some).collect();
        self
    }

    pub fn with_bind_groups(mut self, bind_groups: &'a [&'a wgpu::BindGroupLayout]) -> Self {
        self.desc.bind_group_layouts = bind_groups;
        self
    }

    /// Rasterize both windings.
    pub fn cull_none(mut self) -> Self {
        self.desc.primitive.cull_mode = None;
        self
    }

    /// Creates the pipeline inside a validation error scope, so a bad shader
    /// or a layout mismatch is reported instead of panicking in wgpu.
    /// # Errors
    /// Errors when no shader was set or wgpu rejects the shader or pipeline.
    pub fn create(self) -> Result<RenderPipeline, GpuError> {
        let label = self.label.unwrap_or("Unlabeled pipeline").to_string();
        let source = self
            .shader
            .ok_or_else(|| GpuError::Validation(label.clone(), "no shader set".to_string()))?;

        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label,
            source,
        });

        // The pipeline layout
        let layout_label = format!("{} pipeline layout", label);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&layout_label),
            bind_group_layouts: self.desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

        // Create the pipeline
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            layout: Some(&layout),
            label: self.label,
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: VERTEX_ENTRY,
                buffers: &[],
            },
            primitive: self.desc.primitive,
            depth_stencil: None,
            multisample: self.desc.multisample,
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: FRAGMENT_ENTRY,
                targets: &self.fragment_targets,
            }),
            multiview: None,
        });

        if let Some(err) = block_on(device.pop_error_scope()) {
            error!("Pipeline {} failed validation: {}", label, err);
            return Err(GpuError::Validation(label, err.to_string()));
        }

        Ok(RenderPipeline { inner: pipeline })
    }
}
