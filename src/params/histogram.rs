//! Histogram binning and bar coloring parameters.

use crate::error::{Error, Result};

/// Solid bar color (yellow) used before per-bin colors are assigned
pub const DEFAULT_BAR_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// How histogram bars are colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarColoring {
    /// Independent uniform RGB triple per bin, redrawn every frame
    Random,

    /// One color for every bar
    Solid([f32; 3]),
}

impl Default for BarColoring {
    fn default() -> Self {
        Self::Random
    }
}

/// Histogram configuration
#[derive(Debug, Clone)]
pub struct HistogramParams {
    /// Number of intensity bins
    pub bins: usize,

    /// Bar coloring mode
    pub coloring: BarColoring,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            bins: 256,
            coloring: BarColoring::default(),
        }
    }
}

impl HistogramParams {
    /// Validate configuration (at least one bin)
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::NoBins);
        }
        Ok(())
    }
}
