//! Noise synthesis parameters.

use crate::error::{Error, Result};

/// Layered value-noise parameters
#[derive(Debug, Clone)]
pub struct NoiseParams {
    /// Highest octave index; octaves run from this value down to 0
    /// Largest spatial period is `2^max_octave` cells
    pub max_octave: u32,

    /// Amplitude decay per octave (dimensionless, 0 < p <= 1)
    pub persistence: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            max_octave: 6, // Period 64
            persistence: 0.5,
        }
    }
}

impl NoiseParams {
    /// Largest octave period in cells
    pub fn max_period(&self) -> usize {
        1usize << self.max_octave
    }

    /// Sum of all octave amplitudes (the normalization divisor)
    pub fn total_amplitude(&self) -> f32 {
        let mut amplitude = 1.0f32;
        let mut total = 0.0f32;
        for _ in 0..=self.max_octave {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }

    /// Validate the parameters on their own
    pub fn validate(&self) -> Result<()> {
        if self.max_octave >= usize::BITS / 2 {
            return Err(Error::InvalidNoiseParams(format!(
                "max octave {} is too large",
                self.max_octave
            )));
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(Error::InvalidNoiseParams(format!(
                "persistence must be in (0, 1], got {}",
                self.persistence
            )));
        }
        Ok(())
    }

    /// Validate the parameters against grid dimensions
    ///
    /// Wrap-around corners and blend fractions are only consistent when both
    /// dimensions are multiples of every octave period.
    pub fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        self.validate()?;
        let period = self.max_period();
        if width == 0 || height == 0 || width % period != 0 || height % period != 0 {
            return Err(Error::InvalidDimensions {
                width,
                height,
                period,
            });
        }
        Ok(())
    }
}
