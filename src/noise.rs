//! Layered value noise on a fixed grid.
//!
//! A base grid of uniform random samples is smoothed at several octaves
//! (periods `2^max_octave` down to 1) by bilinear interpolation between
//! period-aligned corners. The octaves are summed with decaying amplitude and
//! normalized so every output cell lies in [0, 1].

use rand::Rng;

use crate::error::{Error, Result};
use crate::params::NoiseParams;

/// Linear interpolation between `x0` and `x1`
fn lerp(x0: f32, x1: f32, alpha: f32) -> f32 {
    x0 * (1.0 - alpha) + alpha * x1
}

/// Normalized noise field with its base samples
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    width: usize,
    height: usize,
    base: Vec<f32>,
    output: Vec<f32>,
}

impl NoiseField {
    /// Create a field of the given size from fresh uniform samples
    pub fn generate<R: Rng + ?Sized>(
        params: &NoiseParams,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate_dimensions(width, height)?;

        let base: Vec<f32> = (0..width * height).map(|_| rng.gen::<f32>()).collect();
        Self::from_base(params, width, height, base)
    }

    /// Create a field from an explicit base grid (row-major, `width * height` values)
    pub fn from_base(
        params: &NoiseParams,
        width: usize,
        height: usize,
        base: Vec<f32>,
    ) -> Result<Self> {
        params.validate_dimensions(width, height)?;
        if base.len() != width * height {
            return Err(Error::BufferSize {
                expected: width * height,
                actual: base.len(),
            });
        }

        let mut field = Self {
            width,
            height,
            base,
            output: vec![0.0; width * height],
        };
        field.accumulate_octaves(params);
        Ok(field)
    }

    fn accumulate_octaves(&mut self, params: &NoiseParams) {
        let (width, height) = (self.width, self.height);
        let mut amplitude = 1.0f32;
        let mut total_amplitude = 0.0f32;

        for octave in (0..=params.max_octave).rev() {
            let period = 1usize << octave;
            let frequency = 1.0 / period as f32;

            for y in 0..height {
                let y0 = (y / period) * period;
                let y1 = (y0 + period) % height;
                let v_blend = (y - y0) as f32 * frequency;

                for x in 0..width {
                    let x0 = (x / period) * period;
                    let x1 = (x0 + period) % width;
                    let h_blend = (x - x0) as f32 * frequency;

                    let top = lerp(
                        self.base[y0 * width + x0],
                        self.base[y0 * width + x1],
                        h_blend,
                    );
                    let bottom = lerp(
                        self.base[y1 * width + x0],
                        self.base[y1 * width + x1],
                        h_blend,
                    );

                    self.output[y * width + x] += amplitude * lerp(top, bottom, v_blend);
                }
            }

            total_amplitude += amplitude;
            amplitude *= params.persistence;
        }

        for value in &mut self.output {
            *value = (*value / total_amplitude).min(1.0);
        }
    }

    /// Nearest-cell lookup for normalized coordinates in [0, 1)
    ///
    /// Coordinates outside that range are clamped to the border cells.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.value(x, y)
    }

    /// Output value at grid cell (x, y)
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.output[y * self.width + x]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Base samples (row-major)
    pub fn base(&self) -> &[f32] {
        &self.base
    }

    /// Normalized output values (row-major)
    pub fn values(&self) -> &[f32] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_values_within_unit_range() {
        let params = NoiseParams::default();
        let mut rng = StdRng::seed_from_u64(7);

        for (width, height) in [(64, 64), (128, 64), (256, 256)] {
            let field = NoiseField::generate(&params, width, height, &mut rng).unwrap();
            assert_eq!(field.values().len(), width * height);
            assert!(field
                .values()
                .iter()
                .all(|value| (0.0..=1.0).contains(value)));
        }
    }

    #[test]
    fn test_same_base_same_output() {
        let params = NoiseParams::default();
        let mut rng = StdRng::seed_from_u64(1232);
        let base: Vec<f32> = (0..256 * 256).map(|_| rng.gen::<f32>()).collect();

        let first = NoiseField::from_base(&params, 256, 256, base.clone()).unwrap();
        let second = NoiseField::from_base(&params, 256, 256, base).unwrap();

        // Bit-identical, not just approximately equal
        let first_bits: Vec<u32> = first.values().iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u32> = second.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let params = NoiseParams::default();
        let first = NoiseField::generate(&params, 256, 256, &mut StdRng::seed_from_u64(3)).unwrap();
        let second =
            NoiseField::generate(&params, 256, 256, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_constant_base_stays_constant() {
        let params = NoiseParams::default();
        let field = NoiseField::from_base(&params, 64, 64, vec![0.5; 64 * 64]).unwrap();

        // Every interpolation of equal corners returns the corner value
        assert!(field.values().iter().all(|v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_period_corners_keep_base_weighting() {
        // Single octave of period 2: aligned cells copy the base sample,
        // odd cells blend halfway toward the wrapped neighbour.
        let params = NoiseParams {
            max_octave: 0,
            persistence: 0.5,
        };
        let base: Vec<f32> = (0..16).map(|i| i as f32 / 16.0).collect();
        let field = NoiseField::from_base(&params, 4, 4, base.clone()).unwrap();
        assert_eq!(field.values(), base.as_slice());

        let params = NoiseParams {
            max_octave: 1,
            persistence: 1.0,
        };
        let field = NoiseField::from_base(&params, 4, 4, base.clone()).unwrap();
        // Cell (0, 0) is a corner at both periods
        assert!((field.value(0, 0) - base[0]).abs() < 1e-6);
        // Cell (1, 0): period 1 gives base[1], period 2 blends base[0] and base[2]
        let expected = (base[1] + 0.5 * (base[0] + base[2])) / 2.0;
        assert!((field.value(1, 0) - expected).abs() < 1e-6);
        // Cell (3, 0): period 2 wraps from x0 = 2 to x1 = 0
        let expected = (base[3] + 0.5 * (base[2] + base[0])) / 2.0;
        assert!((field.value(3, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_sample_is_nearest_lookup() {
        let params = NoiseParams::default();
        let field = NoiseField::generate(&params, 64, 64, &mut StdRng::seed_from_u64(11)).unwrap();

        assert_eq!(field.sample(0.0, 0.0), field.value(0, 0));
        assert_eq!(field.sample(0.5, 0.25), field.value(32, 16));
        assert_eq!(field.sample(0.999, 0.999), field.value(63, 63));

        // Reading twice yields the same value
        assert_eq!(field.sample(0.3, 0.7), field.sample(0.3, 0.7));

        // Out-of-range coordinates clamp instead of indexing past the grid
        assert_eq!(field.sample(1.0, 1.0), field.value(63, 63));
        assert_eq!(field.sample(-0.5, 0.0), field.value(0, 0));
    }

    #[test]
    fn test_rejects_indivisible_dimensions() {
        let params = NoiseParams::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            NoiseField::generate(&params, 100, 64, &mut rng),
            Err(Error::InvalidDimensions { width: 100, .. })
        ));
        assert!(matches!(
            NoiseField::from_base(&params, 64, 64, vec![0.0; 10]),
            Err(Error::BufferSize {
                expected: 4096,
                actual: 10
            })
        ));
    }
}
