//! Intensity histogram of a gray bitmap with per-bin display colors.

use rand::Rng;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::params::{BarColoring, HistogramParams, DEFAULT_BAR_COLOR};

/// Bin for one gray level: `floor(level / 255 * bins)`, with 255 clamped into the last bin
pub fn bin_index(level: u8, bins: usize) -> usize {
    let index = (level as f32 / 255.0 * bins as f32) as usize;
    index.min(bins - 1)
}

/// Bin counts plus one RGB color per bin
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<u32>,
    colors: Vec<[f32; 3]>,
}

impl Histogram {
    /// Count the red channel of every pixel into `bins` bins
    pub fn tally(bitmap: &Bitmap, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::NoBins);
        }

        let mut counts = vec![0u32; bins];
        for level in bitmap.gray_levels() {
            counts[bin_index(level, bins)] += 1;
        }

        Ok(Self {
            counts,
            colors: vec![DEFAULT_BAR_COLOR; bins],
        })
    }

    /// Tally and color in one step
    pub fn build<R: Rng + ?Sized>(
        bitmap: &Bitmap,
        params: &HistogramParams,
        rng: &mut R,
    ) -> Result<Self> {
        let mut histogram = Self::tally(bitmap, params.bins)?;
        histogram.paint(params.coloring, rng);
        Ok(histogram)
    }

    /// Assign bar colors; random colors do not depend on the bin or its count
    pub fn paint<R: Rng + ?Sized>(&mut self, coloring: BarColoring, rng: &mut R) {
        match coloring {
            BarColoring::Random => {
                for color in &mut self.colors {
                    *color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()];
                }
            }
            BarColoring::Solid(rgb) => self.colors.fill(rgb),
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Colors as a flat `3 * bins` array
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Total number of counted pixels
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Largest bin count
    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
