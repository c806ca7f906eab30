//! Bloom: threshold extract, separable gaussian blur, combine.
//!
//! Runs at a fraction of the output resolution (see [`BloomConfig::scale`]).
//! Halving the scale quarters the memory and fill cost of the blur passes.

pub mod kernel;
pub mod pass;
pub mod program;
pub mod quad;
pub mod settings;
pub mod surfaces;

use std::borrow::Cow;

use glowgpu::prelude::*;
use glowgpu::wgpu;
use tracing::{debug, info, trace};

pub use self::kernel::{Axis, Kernel};
pub use self::pass::{PassDescriptor, PassInput, PassOutput, PassProgram, BLOOM_PASSES};
pub use self::program::{
    BloomPrograms, BlurProgram, CombineProgram, ExtractProgram, GpuPrograms, ShaderSources,
};
pub use self::quad::{draw_fullscreen, QuadTarget};
pub use self::settings::BloomSettings;
pub use self::surfaces::{surface_size, BloomSurfaces};

use crate::BloomError;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloomConfig {
    /// Intermediate surface size relative to the output.
    pub scale: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self { scale: 0.5 }
    }
}

/// Where the combine pass writes.
#[derive(Copy, Clone)]
pub enum Destination<'a> {
    /// The final output, such as a swapchain frame, sized like the output `Bloom` was set up for.
    Frame(&'a wgpu::TextureView),
    /// An offscreen texture; must have the output format.
    Texture(&'a Texture<D2>),
}

pub struct BloomBuilder<'a> {
    gpu: &'a GpuHandle,
    config: BloomConfig,
    settings: BloomSettings,
    shaders: ShaderSources,
}

impl<'a> BloomBuilder<'a> {
    pub fn new(gpu: &'a GpuHandle) -> Self {
        Self {
            gpu,
            config: BloomConfig::default(),
            settings: BloomSettings::default(),
            shaders: ShaderSources::default(),
        }
    }

    pub fn with_config(mut self, config: BloomConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    /// Settings used by [`Bloom::render`].
    pub fn with_settings(mut self, settings: BloomSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the extract fragment shader. It must declare `params.threshold`.
    pub fn with_extract_shader(mut self, wgsl: impl Into<Cow<'static, str>>) -> Self {
        self.shaders.extract = wgsl.into();
        self
    }

    /// Replaces the blur fragment shader. Its tap count is the length of `params.offsets`.
    pub fn with_blur_shader(mut self, wgsl: impl Into<Cow<'static, str>>) -> Self {
        self.shaders.blur = wgsl.into();
        self
    }

    /// Replaces the combine fragment shader. It must declare the four intensity
    /// and saturation parameters and a `base_texture`.
    pub fn with_combine_shader(mut self, wgsl: impl Into<Cow<'static, str>>) -> Self {
        self.shaders.combine = wgsl.into();
        self
    }

    /// Allocates the surfaces and compiles the programs for an output of
    /// `width` x `height` in `format`.
    pub fn create(
        self,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<Bloom, BloomError> {
        let surfaces = BloomSurfaces::setup(self.gpu, (width, height), format, self.config.scale)?;
        let sampler = self
            .gpu
            .new_sampler("Bloom linear clamp sampler")
            .lerp_filter()
            .clamp_to_edge()
            .create();
        let programs = GpuPrograms::new(
            self.gpu,
            &self.shaders,
            format,
            &sampler,
            &surfaces.surface_b()?.view,
        )?;
        info!(
            "Created bloom for {}x{} {:?}, {} blur taps",
            width,
            height,
            format,
            programs.blur_sample_count()
        );

        Ok(Bloom {
            gpu: self.gpu.clone(),
            settings: self.settings,
            surfaces,
            sampler,
            programs,
        })
    }
}

pub struct Bloom {
    gpu: GpuHandle,
    settings: BloomSettings,
    surfaces: BloomSurfaces,
    sampler: Sampler,
    programs: GpuPrograms,
}

impl Bloom {
    pub fn builder(gpu: &GpuHandle) -> BloomBuilder<'_> {
        BloomBuilder::new(gpu)
    }

    /// Bloom with the default scale, settings and shaders.
    pub fn new(
        gpu: &GpuHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<Self, BloomError> {
        Self::builder(gpu).create(width, height, format)
    }

    pub fn settings(&self) -> &BloomSettings {
        &self.settings
    }

    /// Replaces the settings used by [`Bloom::render`] from the next call on.
    pub fn set_settings(&mut self, settings: BloomSettings) {
        self.settings = settings;
    }

    pub fn surfaces(&self) -> &BloomSurfaces {
        &self.surfaces
    }

    pub fn blur_sample_count(&self) -> usize {
        self.programs.blur_sample_count()
    }

    /// Follows an output resize. Returns whether the surfaces were reallocated.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, BloomError> {
        let scale = self.surfaces.scale();
        self.surfaces.reconfigure((width, height), scale)
    }

    /// Changes the surface scale. Returns whether the surfaces were reallocated.
    pub fn set_scale(&mut self, scale: f32) -> Result<bool, BloomError> {
        let output = self.surfaces.output();
        self.surfaces.reconfigure(output, scale)
    }

    /// Releases the surfaces, for example on device loss. Idempotent.
    pub fn teardown(&mut self) {
        self.surfaces.teardown();
    }

    /// Reallocates surfaces released by [`Bloom::teardown`].
    pub fn restore(&mut self) -> Result<(), BloomError> {
        if self.surfaces.is_released() {
            let (output, scale) = (self.surfaces.output(), self.surfaces.scale());
            self.surfaces.reconfigure(output, scale)?;
        }
        Ok(())
    }

    /// [`Bloom::process`] with the held settings.
    pub fn render(
        &mut self,
        encoder: &mut CommandEncoder,
        source: &wgpu::TextureView,
        destination: Destination,
    ) -> Result<(), BloomError> {
        let settings = self.settings;
        self.process(encoder, source, destination, &settings)
    }

    /// Records the four bloom passes from `source` into `destination`.
    ///
    /// Everything is validated before the first pass is recorded, so on error
    /// nothing has been drawn. `source` must not be the destination.
    ///
    /// Parameters are copied into the program uniforms through `encoder` right
    /// before each pass, so several calls recorded into one encoder (one bloom
    /// per view, say) each draw with their own `settings`.
    pub fn process(
        &mut self,
        encoder: &mut CommandEncoder,
        source: &wgpu::TextureView,
        destination: Destination,
        settings: &BloomSettings,
    ) -> Result<(), BloomError> {
        let [surface_a, surface_b] = self.surfaces.pair()?;
        let surface_size = surface_a.size;
        let target = match destination {
            Destination::Frame(view) => QuadTarget {
                view,
                size: self.surfaces.output(),
            },
            Destination::Texture(texture) => {
                if texture.format != self.surfaces.format() {
                    return Err(BloomError::FormatMismatch {
                        expected: self.surfaces.format(),
                        actual: texture.format,
                    });
                }
                QuadTarget {
                    view: &texture.view,
                    size: texture.size,
                }
            }
        };

        settings.warn_suspicious();
        pass::bind_all(settings, surface_size, &mut self.programs)?;
        trace!("Bloom settings {:?}, surfaces {:?}", settings, surface_size);

        let surfaces = [&surface_a.view, &surface_b.view];
        let input_view = |input: PassInput| match input {
            PassInput::Scene => source,
            PassInput::Surface(i) => surfaces[i],
        };

        for pass in &BLOOM_PASSES {
            debug_assert!(!pass.reads_own_output());
            let input = input_view(pass.input);
            let base = pass.base.map(input_view);
            let output = match pass.output {
                PassOutput::Surface(i) => QuadTarget {
                    view: surfaces[i],
                    size: surface_size,
                },
                PassOutput::Destination => target,
            };

            let (pipeline, bind_group) = match pass.program {
                PassProgram::Extract => {
                    let program = &mut self.programs.extract;
                    program.prepare(encoder, &self.gpu, &self.sampler, input, base);
                    (&program.pipeline, &program.bind_group)
                }
                PassProgram::Blur(Axis::Horizontal) => {
                    let program = &mut self.programs.blur_horizontal;
                    program.prepare(encoder, &self.gpu, &self.sampler, input, base);
                    (&program.pipeline, &program.bind_group)
                }
                PassProgram::Blur(Axis::Vertical) => {
                    let program = &mut self.programs.blur_vertical;
                    program.prepare(encoder, &self.gpu, &self.sampler, input, base);
                    (&program.pipeline, &program.bind_group)
                }
                PassProgram::Combine => {
                    let program = &mut self.programs.combine;
                    program.prepare(encoder, &self.gpu, &self.sampler, input, base);
                    (&program.pipeline, &program.bind_group)
                }
            };
            draw_fullscreen(encoder, pass.label, pipeline, bind_group, output);
        }
        debug!("Recorded bloom passes into {:?}", target.size);
        Ok(())
    }
}
