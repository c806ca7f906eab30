//! Separable gaussian blur kernel.
//!
//! Tap 0 samples the center texel. Every further pair of taps samples at
//! `±(2i + 1.5)` texels, halfway into the next two texels, so bilinear
//! filtering blends two texels per fetch and doubles the reach of each tap.

use std::f64::consts::PI;

use crate::BloomError;

/// Direction of one blur pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// One texel along this axis, in texture coordinates, for a surface of `size`.
    pub fn step(self, (width, height): (u32, u32)) -> [f32; 2] {
        match self {
            Axis::Horizontal => [1.0 / width as f32, 0.0],
            Axis::Vertical => [0.0, 1.0 / height as f32],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    /// Sums to one.
    pub weights: Vec<f32>,
    /// Texture coordinate offset of each tap, `offsets[0]` is the center.
    pub offsets: Vec<[f32; 2]>,
}

impl Kernel {
    /// Computes a normalized kernel of `sample_count` taps along `axis_step`.
    ///
    /// # Errors
    /// `blur_amount` must be positive and finite, `sample_count` odd.
    pub fn compute(
        blur_amount: f32,
        sample_count: usize,
        axis_step: [f32; 2],
    ) -> Result<Kernel, BloomError> {
        if !(blur_amount.is_finite() && blur_amount > 0.0) {
            return Err(BloomError::InvalidBlurAmount(blur_amount));
        }
        if sample_count % 2 == 0 {
            return Err(BloomError::InvalidSampleCount(sample_count));
        }

        let theta = f64::from(blur_amount);
        let mut weights = vec![0.0_f32; sample_count];
        let mut offsets = vec![[0.0_f32; 2]; sample_count];

        weights[0] = gaussian(0.0, theta);
        let mut total = weights[0];

        for i in 0..sample_count / 2 {
            let weight = gaussian((i + 1) as f64, theta);
            weights[i * 2 + 1] = weight;
            weights[i * 2 + 2] = weight;
            total += weight * 2.0;

            let distance = i as f32 * 2.0 + 1.5;
            let offset = [axis_step[0] * distance, axis_step[1] * distance];
            offsets[i * 2 + 1] = offset;
            offsets[i * 2 + 2] = [-offset[0], -offset[1]];
        }

        for weight in &mut weights {
            *weight /= total;
        }

        Ok(Kernel { weights, offsets })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

fn gaussian(n: f64, theta: f64) -> f32 {
    ((1.0 / (2.0 * PI * theta).sqrt()) * (-(n * n) / (2.0 * theta * theta)).exp()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const THETAS: [f32; 7] = [0.1, 0.5, 1.0, 2.0, 4.0, 8.0, 32.0];
    const COUNTS: [usize; 5] = [1, 3, 7, 15, 31];

    fn every_kernel() -> impl Iterator<Item = Kernel> {
        THETAS.into_iter().flat_map(|theta| {
            COUNTS
                .into_iter()
                .map(move |n| Kernel::compute(theta, n, [1.0 / 640.0, 0.0]).unwrap())
        })
    }

    #[test]
    fn weights_sum_to_one() {
        for kernel in every_kernel() {
            let sum: f32 = kernel.weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sum {} for {:?}", sum, kernel);
        }
    }

    #[test]
    fn pairs_are_symmetric() {
        for kernel in every_kernel() {
            for i in 0..kernel.len() / 2 {
                let (a, b) = (i * 2 + 1, i * 2 + 2);
                assert_eq!(kernel.weights[a], kernel.weights[b]);
                assert_eq!(kernel.offsets[a][0], -kernel.offsets[b][0]);
                assert_eq!(kernel.offsets[a][1], -kernel.offsets[b][1]);
            }
        }
    }

    #[test]
    fn center_tap_has_no_offset() {
        for kernel in every_kernel() {
            assert_eq!(kernel.offsets[0], [0.0, 0.0]);
        }
    }

    #[test]
    fn taps_sit_between_texels() {
        let kernel = Kernel::compute(2.0, 7, [0.5, 0.0]).unwrap();
        let xs: Vec<f32> = kernel.offsets.iter().map(|o| o[0]).collect();
        assert_eq!(xs, [0.0, 0.75, -0.75, 1.75, -1.75, 2.75, -2.75]);
    }

    #[test]
    fn axes_are_transposed() {
        let s = 1.0 / 360.0;
        for theta in THETAS {
            let h = Kernel::compute(theta, 15, [s, 0.0]).unwrap();
            let v = Kernel::compute(theta, 15, [0.0, s]).unwrap();
            assert_eq!(h.weights, v.weights);
            for (h, v) in h.offsets.iter().zip(&v.offsets) {
                assert_eq!(h[0], v[1]);
                assert_eq!(h[1], 0.0);
                assert_eq!(v[0], 0.0);
            }
        }
    }

    #[test]
    fn identical_settings_give_identical_kernels() {
        let a = Kernel::compute(4.0, 15, [1.0 / 400.0, 0.0]).unwrap();
        let b = Kernel::compute(4.0, 15, [1.0 / 400.0, 0.0]).unwrap();
        assert_eq!(a, b);
        let bits = |k: &Kernel| k.weights.iter().map(|w| w.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn three_taps_at_unit_theta() {
        let kernel = Kernel::compute(1.0, 3, [0.01, 0.0]).unwrap();
        // g(0) = 0.398942, g(1) = 0.241971, normalized by their sum 0.882884
        assert!((kernel.weights[0] - 0.451863).abs() < 1e-5);
        assert!((kernel.weights[1] - 0.274068).abs() < 1e-5);
        assert_eq!(kernel.weights[1], kernel.weights[2]);
        assert!(kernel.weights[0] > kernel.weights[1]);
        assert!((kernel.offsets[1][0] - 0.015).abs() < 1e-7);
        assert!((kernel.offsets[2][0] + 0.015).abs() < 1e-7);
    }

    #[test]
    fn weights_fall_off_with_distance() {
        let kernel = Kernel::compute(4.0, 15, [1.0, 0.0]).unwrap();
        for i in (1..kernel.len() - 2).step_by(2) {
            assert!(kernel.weights[i] > kernel.weights[i + 2]);
        }
    }

    #[test]
    fn single_tap_is_identity() {
        let kernel = Kernel::compute(3.0, 1, [0.1, 0.0]).unwrap();
        assert_eq!(kernel.weights, [1.0]);
        assert_eq!(kernel.offsets, [[0.0, 0.0]]);
    }

    #[test]
    fn rejects_bad_blur_amounts() {
        for theta in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Kernel::compute(theta, 15, [1.0, 0.0]),
                Err(BloomError::InvalidBlurAmount(_))
            ));
        }
    }

    #[test]
    fn rejects_even_sample_counts() {
        for n in [0, 2, 16] {
            assert!(matches!(
                Kernel::compute(1.0, n, [1.0, 0.0]),
                Err(BloomError::InvalidSampleCount(c)) if c == n
            ));
        }
    }

    #[test]
    fn axis_step_is_one_texel() {
        assert_eq!(Axis::Horizontal.step((320, 180)), [1.0 / 320.0, 0.0]);
        assert_eq!(Axis::Vertical.step((320, 180)), [0.0, 1.0 / 180.0]);
    }
}
