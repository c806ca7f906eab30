//! Typed parameter interfaces of the three bloom programs and their wgpu backing.

pub mod reflect;

use std::borrow::Cow;

use glowgpu::prelude::*;
use glowgpu::wgpu;

use self::reflect::{ShaderReflection, Vec4Array, BASE_TEXTURE_BINDING};
use super::kernel::Axis;
use crate::{BloomError, ProgramKind};

pub trait ExtractProgram {
    fn set_threshold(&mut self, threshold: f32);
}

pub trait BlurProgram {
    /// Number of kernel taps the program samples per pixel.
    fn sample_count(&self) -> usize;
    fn set_weights(&mut self, weights: &[f32]);
    fn set_offsets(&mut self, offsets: &[[f32; 2]]);
}

pub trait CombineProgram {
    fn set_intensities(&mut self, bloom: f32, base: f32);
    fn set_saturations(&mut self, bloom: f32, base: f32);
}

/// The full set of programs one bloom frame binds parameters on.
pub trait BloomPrograms {
    type Extract: ExtractProgram;
    type Blur: BlurProgram;
    type Combine: CombineProgram;

    fn extract(&mut self) -> &mut Self::Extract;
    fn blur(&mut self, axis: Axis) -> &mut Self::Blur;
    fn combine(&mut self) -> &mut Self::Combine;
}

pub(crate) const SCREEN_SHADER: &str = include_str!("shader/screen.wgsl");
pub(crate) const EXTRACT_SHADER: &str = include_str!("shader/extract.wgsl");
pub(crate) const BLUR_SHADER: &str = include_str!("shader/blur.wgsl");
pub(crate) const COMBINE_SHADER: &str = include_str!("shader/combine.wgsl");

/// Fragment sources of the three programs.
/// Each is appended to the shared screen vertex shader, which declares `VertexOutput`.
#[derive(Clone, Debug)]
pub struct ShaderSources {
    pub extract: Cow<'static, str>,
    pub blur: Cow<'static, str>,
    pub combine: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            extract: Cow::Borrowed(EXTRACT_SHADER),
            blur: Cow::Borrowed(BLUR_SHADER),
            combine: Cow::Borrowed(COMBINE_SHADER),
        }
    }
}

pub(crate) fn with_screen_vertex(fragment: &str) -> String {
    format!("{}\n{}", SCREEN_SHADER, fragment)
}

#[derive(Copy, Clone, Debug)]
pub struct ExtractLayout {
    threshold: u32,
}

impl ExtractLayout {
    pub fn reflect(shader: &ShaderReflection) -> Result<Self, BloomError> {
        Ok(Self {
            threshold: shader.f32_offset("threshold")?,
        })
    }
}

#[derive(Copy, Clone, Debug)]
pub struct BlurLayout {
    offsets: Vec4Array,
    weights: Vec4Array,
}

impl BlurLayout {
    pub fn reflect(shader: &ShaderReflection) -> Result<Self, BloomError> {
        let offsets = shader.vec4_array("offsets")?;
        let weights = shader.vec4_array("weights")?;
        let taps = offsets.len as usize;
        if taps % 2 == 0 {
            return Err(BloomError::InvalidSampleCount(taps));
        }
        if (weights.len * 4) < offsets.len {
            return Err(BloomError::ShaderParameterMismatch {
                program: ProgramKind::Blur,
                parameter: "weights",
                reason: format!(
                    "{} vec4s cannot hold {} tap weights",
                    weights.len, offsets.len
                ),
            });
        }
        Ok(Self { offsets, weights })
    }

    pub fn sample_count(&self) -> usize {
        self.offsets.len as usize
    }
}

#[derive(Copy, Clone, Debug)]
pub struct CombineLayout {
    bloom_intensity: u32,
    base_intensity: u32,
    bloom_saturation: u32,
    base_saturation: u32,
}

impl CombineLayout {
    pub fn reflect(shader: &ShaderReflection) -> Result<Self, BloomError> {
        shader.texture_at("base_texture", BASE_TEXTURE_BINDING)?;
        Ok(Self {
            bloom_intensity: shader.f32_offset("bloom_intensity")?,
            base_intensity: shader.f32_offset("base_intensity")?,
            bloom_saturation: shader.f32_offset("bloom_saturation")?,
            base_saturation: shader.f32_offset("base_saturation")?,
        })
    }
}

/// CPU copy of a uniform block, uploaded before each draw.
#[derive(Clone, Debug)]
pub struct ParamBlock {
    bytes: Vec<u8>,
}

impl ParamBlock {
    pub fn new(size: u32) -> Self {
        // Uniform bindings are sized in 16 byte steps
        let size = ((size.max(1) + 15) / 16 * 16) as usize;
        Self {
            bytes: vec![0; size],
        }
    }

    pub fn set_f32(&mut self, offset: u32, value: f32) {
        let offset = offset as usize;
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn get_f32(&self, offset: u32) -> f32 {
        let offset = offset as usize;
        bytemuck::pod_read_unaligned(&self.bytes[offset..offset + 4])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parameter values of one program, written at the offsets its layout resolved.
#[derive(Clone, Debug)]
pub struct ProgramParams<L> {
    pub layout: L,
    pub block: ParamBlock,
}

impl<L> ProgramParams<L> {
    pub fn new(layout: L, size: u32) -> Self {
        Self {
            layout,
            block: ParamBlock::new(size),
        }
    }
}

impl ExtractProgram for ProgramParams<ExtractLayout> {
    fn set_threshold(&mut self, threshold: f32) {
        self.block.set_f32(self.layout.threshold, threshold);
    }
}

impl BlurProgram for ProgramParams<BlurLayout> {
    fn sample_count(&self) -> usize {
        self.layout.sample_count()
    }

    fn set_weights(&mut self, weights: &[f32]) {
        let layout = self.layout.weights;
        for (i, weight) in weights.iter().take(self.sample_count()).enumerate() {
            let i = i as u32;
            self.block
                .set_f32(layout.offset + (i / 4) * layout.stride + (i % 4) * 4, *weight);
        }
    }

    fn set_offsets(&mut self, offsets: &[[f32; 2]]) {
        let layout = self.layout.offsets;
        for (i, [x, y]) in offsets.iter().take(self.sample_count()).enumerate() {
            let base = layout.offset + i as u32 * layout.stride;
            self.block.set_f32(base, *x);
            self.block.set_f32(base + 4, *y);
        }
    }
}

impl CombineProgram for ProgramParams<CombineLayout> {
    fn set_intensities(&mut self, bloom: f32, base: f32) {
        self.block.set_f32(self.layout.bloom_intensity, bloom);
        self.block.set_f32(self.layout.base_intensity, base);
    }

    fn set_saturations(&mut self, bloom: f32, base: f32) {
        self.block.set_f32(self.layout.bloom_saturation, bloom);
        self.block.set_f32(self.layout.base_saturation, base);
    }
}

/// One bloom program on the GPU: pipeline, its bind group and its parameters.
pub struct ShaderProgram<L> {
    pub(crate) pipeline: RenderPipeline,
    pub(crate) bind_group: BindGroup,
    params_buffer: Buffer,
    pub(crate) params: ProgramParams<L>,
}

impl<L> ShaderProgram<L> {
    /// Creates the program with its group 0 bound to `input` (and `base` for two input programs).
    /// The views only need the right types, they are rebound before every draw.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        gpu: &GpuHandle,
        label: &str,
        source: &str,
        layout: L,
        params_size: u32,
        format: TextureFormat,
        sampler: &Sampler,
        input: &wgpu::TextureView,
        base: Option<&wgpu::TextureView>,
    ) -> Result<Self, BloomError> {
        let params = ProgramParams::new(layout, params_size);
        let params_buffer = gpu
            .new_buffer(label)
            .with_data(params.block.as_bytes())
            .as_uniform_buffer()
            .allow_copy_to()
            .build();

        let bind_group = gpu.create_bind_group(
            label,
            &group_bindings(sampler, input, &params_buffer, base),
        );

        let pipeline = gpu
            .new_pipeline(label)
            .with_vertex_fragment(source.to_string())
            .with_bind_groups(&[&bind_group.layout])
            .with_fragment_targets(&[TexFormat(format).target()])
            .create()?;

        Ok(Self {
            pipeline,
            bind_group,
            params_buffer,
            params,
        })
    }

    /// Points the bind group at this frame's textures and records the parameter
    /// upload into `encoder`, so draws recorded after it see these values even
    /// when the encoder holds several frames.
    pub(crate) fn prepare(
        &mut self,
        encoder: &mut CommandEncoder,
        gpu: &GpuHandle,
        sampler: &Sampler,
        input: &wgpu::TextureView,
        base: Option<&wgpu::TextureView>,
    ) {
        self.params_buffer
            .write_in(encoder, self.params.block.as_bytes());
        self.bind_group.rebind(
            &gpu.device,
            &group_bindings(sampler, input, &self.params_buffer, base),
        );
    }
}

/// Group 0 in the order of the `*_BINDING` slots in [`reflect`].
fn group_bindings<'a>(
    sampler: &'a Sampler,
    input: &'a wgpu::TextureView,
    params: &'a Buffer,
    base: Option<&'a wgpu::TextureView>,
) -> Vec<Binding<'a>> {
    let mut bindings = vec![
        sampler.bind().in_fragment(),
        input.bind().in_fragment(),
        params.bind_uniform().in_fragment(),
    ];
    if let Some(base) = base {
        bindings.push(sampler.bind().in_fragment());
        bindings.push(base.bind().in_fragment());
    }
    bindings
}

/// The wgpu programs of one `Bloom`, with parameter offsets resolved at creation.
pub struct GpuPrograms {
    pub(crate) extract: ShaderProgram<ExtractLayout>,
    pub(crate) blur_horizontal: ShaderProgram<BlurLayout>,
    pub(crate) blur_vertical: ShaderProgram<BlurLayout>,
    pub(crate) combine: ShaderProgram<CombineLayout>,
}

impl GpuPrograms {
    /// Reflects and compiles all programs. Any missing parameter fails here,
    /// before a frame is ever recorded.
    pub fn new(
        gpu: &GpuHandle,
        sources: &ShaderSources,
        format: TextureFormat,
        sampler: &Sampler,
        placeholder: &wgpu::TextureView,
    ) -> Result<Self, BloomError> {
        let extract_source = with_screen_vertex(&sources.extract);
        let blur_source = with_screen_vertex(&sources.blur);
        let combine_source = with_screen_vertex(&sources.combine);

        let extract = ShaderReflection::parse(ProgramKind::Extract, &extract_source)?;
        let blur = ShaderReflection::parse(ProgramKind::Blur, &blur_source)?;
        let combine = ShaderReflection::parse(ProgramKind::Combine, &combine_source)?;

        let extract_layout = ExtractLayout::reflect(&extract)?;
        let blur_layout = BlurLayout::reflect(&blur)?;
        let combine_layout = CombineLayout::reflect(&combine)?;

        Ok(Self {
            extract: ShaderProgram::new(
                gpu,
                "Bloom extract",
                &extract_source,
                extract_layout,
                extract.params_size(),
                format,
                sampler,
                placeholder,
                None,
            )?,
            blur_horizontal: ShaderProgram::new(
                gpu,
                "Bloom blur horizontal",
                &blur_source,
                blur_layout,
                blur.params_size(),
                format,
                sampler,
                placeholder,
                None,
            )?,
            blur_vertical: ShaderProgram::new(
                gpu,
                "Bloom blur vertical",
                &blur_source,
                blur_layout,
                blur.params_size(),
                format,
                sampler,
                placeholder,
                None,
            )?,
            combine: ShaderProgram::new(
                gpu,
                "Bloom combine",
                &combine_source,
                combine_layout,
                combine.params_size(),
                format,
                sampler,
                placeholder,
                Some(placeholder),
            )?,
        })
    }

    pub fn blur_sample_count(&self) -> usize {
        self.blur_horizontal.params.layout.sample_count()
    }
}

impl BloomPrograms for GpuPrograms {
    type Extract = ProgramParams<ExtractLayout>;
    type Blur = ProgramParams<BlurLayout>;
    type Combine = ProgramParams<CombineLayout>;

    fn extract(&mut self) -> &mut Self::Extract {
        &mut self.extract.params
    }

    fn blur(&mut self, axis: Axis) -> &mut Self::Blur {
        match axis {
            Axis::Horizontal => &mut self.blur_horizontal.params,
            Axis::Vertical => &mut self.blur_vertical.params,
        }
    }

    fn combine(&mut self) -> &mut Self::Combine {
        &mut self.combine.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blur_params() -> ProgramParams<BlurLayout> {
        let shader =
            ShaderReflection::parse(ProgramKind::Blur, &with_screen_vertex(BLUR_SHADER)).unwrap();
        ProgramParams::new(BlurLayout::reflect(&shader).unwrap(), shader.params_size())
    }

    #[test]
    fn default_blur_has_fifteen_taps() {
        assert_eq!(blur_params().sample_count(), 15);
    }

    #[test]
    fn weights_are_packed_four_per_vec4() {
        let mut blur = blur_params();
        let weights: Vec<f32> = (0..15).map(|i| i as f32).collect();
        blur.set_weights(&weights);
        let base = blur.layout.weights.offset;
        assert_eq!(blur.block.get_f32(base), 0.0);
        assert_eq!(blur.block.get_f32(base + 12), 3.0);
        assert_eq!(blur.block.get_f32(base + 16), 4.0);
        assert_eq!(blur.block.get_f32(base + 3 * 16 + 8), 14.0);
    }

    #[test]
    fn offsets_fill_xy_of_each_element() {
        let mut blur = blur_params();
        let offsets: Vec<[f32; 2]> = (0..15).map(|i| [i as f32, -(i as f32)]).collect();
        blur.set_offsets(&offsets);
        assert_eq!(blur.block.get_f32(16 * 7), 7.0);
        assert_eq!(blur.block.get_f32(16 * 7 + 4), -7.0);
        // zw stay untouched
        assert_eq!(blur.block.get_f32(16 * 7 + 8), 0.0);
    }

    #[test]
    fn param_blocks_are_padded() {
        assert_eq!(ParamBlock::new(4).as_bytes().len(), 16);
        assert_eq!(ParamBlock::new(16).as_bytes().len(), 16);
        assert_eq!(ParamBlock::new(304).as_bytes().len(), 304);
    }

    #[test]
    fn even_tap_count_is_rejected() {
        let source = BLUR_SHADER.replace("array<vec4<f32>, 15>", "array<vec4<f32>, 16>");
        let shader =
            ShaderReflection::parse(ProgramKind::Blur, &with_screen_vertex(&source)).unwrap();
        assert!(matches!(
            BlurLayout::reflect(&shader),
            Err(BloomError::InvalidSampleCount(16))
        ));
    }

    #[test]
    fn short_weights_array_is_rejected() {
        let source = BLUR_SHADER.replace("array<vec4<f32>, 4>", "array<vec4<f32>, 3>");
        let shader =
            ShaderReflection::parse(ProgramKind::Blur, &with_screen_vertex(&source)).unwrap();
        assert!(matches!(
            BlurLayout::reflect(&shader),
            Err(BloomError::ShaderParameterMismatch { parameter: "weights", .. })
        ));
    }

    #[test]
    fn combine_intensities_and_saturations() {
        let shader =
            ShaderReflection::parse(ProgramKind::Combine, &with_screen_vertex(COMBINE_SHADER))
                .unwrap();
        let mut combine =
            ProgramParams::new(CombineLayout::reflect(&shader).unwrap(), shader.params_size());
        combine.set_intensities(1.25, 1.0);
        combine.set_saturations(0.0, 2.0);
        let read: Vec<f32> = (0..4).map(|i| combine.block.get_f32(i * 4)).collect();
        assert_eq!(read, [1.25, 1.0, 0.0, 2.0]);
    }
}
