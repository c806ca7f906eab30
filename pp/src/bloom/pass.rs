//! The fixed bloom pass sequence, as data.
//!
//! Surfaces are addressed by index into the ping-pong pair. No pass reads
//! the surface it writes.

use super::kernel::{Axis, Kernel};
use super::program::{BlurProgram, BloomPrograms, CombineProgram, ExtractProgram};
use super::settings::BloomSettings;
use crate::BloomError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassInput {
    /// The scene image handed to `process`
    Scene,
    Surface(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassOutput {
    Surface(usize),
    /// The caller's destination
    Destination,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassProgram {
    Extract,
    Blur(Axis),
    Combine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PassDescriptor {
    pub label: &'static str,
    pub input: PassInput,
    /// Second texture input, sampled with the linear clamp base sampler
    pub base: Option<PassInput>,
    pub output: PassOutput,
    pub program: PassProgram,
}

pub const BLOOM_PASSES: [PassDescriptor; 4] = [
    PassDescriptor {
        label: "Bloom extract",
        input: PassInput::Scene,
        base: None,
        output: PassOutput::Surface(0),
        program: PassProgram::Extract,
    },
    PassDescriptor {
        label: "Bloom blur horizontal",
        input: PassInput::Surface(0),
        base: None,
        output: PassOutput::Surface(1),
        program: PassProgram::Blur(Axis::Horizontal),
    },
    PassDescriptor {
        label: "Bloom blur vertical",
        input: PassInput::Surface(1),
        base: None,
        output: PassOutput::Surface(0),
        program: PassProgram::Blur(Axis::Vertical),
    },
    PassDescriptor {
        label: "Bloom combine",
        input: PassInput::Surface(0),
        base: Some(PassInput::Scene),
        output: PassOutput::Destination,
        program: PassProgram::Combine,
    },
];

impl PassDescriptor {
    /// Writes this pass's parameters from `settings`.
    /// Blur kernels are recomputed for `surface_size` on every call.
    pub fn bind_parameters<P: BloomPrograms>(
        &self,
        settings: &BloomSettings,
        surface_size: (u32, u32),
        programs: &mut P,
    ) -> Result<(), BloomError> {
        match self.program {
            PassProgram::Extract => programs.extract().set_threshold(settings.threshold),
            PassProgram::Blur(axis) => {
                let blur = programs.blur(axis);
                let kernel = Kernel::compute(
                    settings.blur_amount,
                    blur.sample_count(),
                    axis.step(surface_size),
                )?;
                blur.set_weights(&kernel.weights);
                blur.set_offsets(&kernel.offsets);
            }
            PassProgram::Combine => {
                let combine = programs.combine();
                combine.set_intensities(settings.bloom_intensity, settings.base_intensity);
                combine.set_saturations(settings.bloom_saturation, settings.base_saturation);
            }
        }
        Ok(())
    }

    /// Whether this pass samples the surface it renders to.
    pub fn reads_own_output(&self) -> bool {
        let PassOutput::Surface(out) = self.output else {
            return false;
        };
        [Some(self.input), self.base]
            .into_iter()
            .flatten()
            .any(|input| input == PassInput::Surface(out))
    }
}

/// Binds every pass's parameters, in order.
/// A bad blur amount is rejected before any program is touched.
pub fn bind_all<P: BloomPrograms>(
    settings: &BloomSettings,
    surface_size: (u32, u32),
    programs: &mut P,
) -> Result<(), BloomError> {
    Kernel::compute(settings.blur_amount, 1, [0.0, 0.0])?;
    for pass in &BLOOM_PASSES {
        pass.bind_parameters(settings, surface_size, programs)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    pub struct RecordingExtract {
        pub threshold: Option<f32>,
    }
    impl ExtractProgram for RecordingExtract {
        fn set_threshold(&mut self, threshold: f32) {
            self.threshold = Some(threshold);
        }
    }

    #[derive(Debug, PartialEq)]
    pub struct RecordingBlur {
        pub taps: usize,
        pub weights: Vec<f32>,
        pub offsets: Vec<[f32; 2]>,
    }
    impl BlurProgram for RecordingBlur {
        fn sample_count(&self) -> usize {
            self.taps
        }
        fn set_weights(&mut self, weights: &[f32]) {
            self.weights = weights.to_vec();
        }
        fn set_offsets(&mut self, offsets: &[[f32; 2]]) {
            self.offsets = offsets.to_vec();
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct RecordingCombine {
        pub intensities: Option<(f32, f32)>,
        pub saturations: Option<(f32, f32)>,
    }
    impl CombineProgram for RecordingCombine {
        fn set_intensities(&mut self, bloom: f32, base: f32) {
            self.intensities = Some((bloom, base));
        }
        fn set_saturations(&mut self, bloom: f32, base: f32) {
            self.saturations = Some((bloom, base));
        }
    }

    #[derive(Debug, PartialEq)]
    pub struct RecordingPrograms {
        pub extract: RecordingExtract,
        pub horizontal: RecordingBlur,
        pub vertical: RecordingBlur,
        pub combine: RecordingCombine,
    }

    impl RecordingPrograms {
        pub fn new(taps: usize) -> Self {
            let blur = || RecordingBlur {
                taps,
                weights: Vec::new(),
                offsets: Vec::new(),
            };
            Self {
                extract: RecordingExtract::default(),
                horizontal: blur(),
                vertical: blur(),
                combine: RecordingCombine::default(),
            }
        }
    }

    impl BloomPrograms for RecordingPrograms {
        type Extract = RecordingExtract;
        type Blur = RecordingBlur;
        type Combine = RecordingCombine;

        fn extract(&mut self) -> &mut RecordingExtract {
            &mut self.extract
        }
        fn blur(&mut self, axis: Axis) -> &mut RecordingBlur {
            match axis {
                Axis::Horizontal => &mut self.horizontal,
                Axis::Vertical => &mut self.vertical,
            }
        }
        fn combine(&mut self) -> &mut RecordingCombine {
            &mut self.combine
        }
    }

    #[test]
    fn passes_ping_pong() {
        for pass in &BLOOM_PASSES {
            assert!(!pass.reads_own_output(), "{} reads its output", pass.label);
        }
        // each pass reads what the previous one wrote
        for pair in BLOOM_PASSES.windows(2) {
            let PassOutput::Surface(written) = pair[0].output else {
                panic!("{} writes the destination early", pair[0].label);
            };
            assert_eq!(pair[1].input, PassInput::Surface(written));
        }
    }

    #[test]
    fn pass_order() {
        let programs: Vec<_> = BLOOM_PASSES.iter().map(|p| p.program).collect();
        assert_eq!(
            programs,
            [
                PassProgram::Extract,
                PassProgram::Blur(Axis::Horizontal),
                PassProgram::Blur(Axis::Vertical),
                PassProgram::Combine,
            ]
        );
        assert_eq!(BLOOM_PASSES[0].input, PassInput::Scene);
        assert_eq!(BLOOM_PASSES[3].base, Some(PassInput::Scene));
        assert_eq!(BLOOM_PASSES[3].output, PassOutput::Destination);
    }

    #[test]
    fn reads_own_output_is_detected() {
        let bad = PassDescriptor {
            base: Some(PassInput::Surface(1)),
            ..BLOOM_PASSES[1]
        };
        assert!(bad.reads_own_output());
    }

    #[test]
    fn extract_binds_only_threshold() {
        let mut programs = RecordingPrograms::new(3);
        BLOOM_PASSES[0]
            .bind_parameters(&BloomSettings::default(), (100, 50), &mut programs)
            .unwrap();
        assert_eq!(programs.extract.threshold, Some(0.25));
        assert!(programs.horizontal.weights.is_empty());
        assert_eq!(programs.combine, RecordingCombine::default());
    }

    #[test]
    fn blur_passes_use_their_axis() {
        let mut programs = RecordingPrograms::new(5);
        let settings = BloomSettings::default();
        BLOOM_PASSES[1]
            .bind_parameters(&settings, (100, 50), &mut programs)
            .unwrap();
        BLOOM_PASSES[2]
            .bind_parameters(&settings, (100, 50), &mut programs)
            .unwrap();

        let h = &programs.horizontal;
        let v = &programs.vertical;
        assert_eq!(h.weights.len(), 5);
        assert_eq!(h.weights, v.weights);
        assert!((h.offsets[1][0] - 1.5 / 100.0).abs() < 1e-7);
        assert_eq!(h.offsets[1][1], 0.0);
        assert!((v.offsets[1][1] - 1.5 / 50.0).abs() < 1e-7);
        assert_eq!(v.offsets[1][0], 0.0);
    }

    #[test]
    fn combine_binds_intensities_and_saturations() {
        let mut programs = RecordingPrograms::new(3);
        let settings = BloomSettings::preset("Saturated").unwrap();
        BLOOM_PASSES[3]
            .bind_parameters(&settings, (100, 50), &mut programs)
            .unwrap();
        assert_eq!(programs.combine.intensities, Some((2.0, 1.0)));
        assert_eq!(programs.combine.saturations, Some((2.0, 0.0)));
    }

    #[test]
    fn same_settings_bind_identically() {
        let settings = BloomSettings::preset("Blurry").unwrap();
        let mut a = RecordingPrograms::new(15);
        let mut b = RecordingPrograms::new(15);
        bind_all(&settings, (320, 180), &mut a).unwrap();
        let same = settings;
        bind_all(&same, (320, 180), &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bad_blur_amount_binds_nothing() {
        let settings = BloomSettings {
            blur_amount: 0.0,
            ..BloomSettings::default()
        };
        let mut programs = RecordingPrograms::new(15);
        assert!(matches!(
            bind_all(&settings, (320, 180), &mut programs),
            Err(BloomError::InvalidBlurAmount(_))
        ));
        assert_eq!(programs, RecordingPrograms::new(15));
    }
}
