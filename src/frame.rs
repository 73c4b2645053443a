//! Per-frame pipeline: fresh noise, refilled bitmap, rebuilt histogram.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::histogram::Histogram;
use crate::params::{HistogramParams, NoiseParams};

/// Borrowed view of the latest frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Frames generated so far, starting at 1
    pub index: u64,
    pub bitmap: &'a Bitmap,
    pub histogram: &'a Histogram,
}

/// Owns the buffers reused across frames and the RNG that drives them
pub struct FrameGenerator {
    noise_params: NoiseParams,
    histogram_params: HistogramParams,
    rng: StdRng,
    bitmap: Bitmap,
    histogram: Histogram,
    frame_index: u64,
}

impl FrameGenerator {
    /// Create a generator for `width` x `height` images
    ///
    /// A `seed` makes the whole frame sequence reproducible; without one the
    /// RNG is seeded from OS entropy.
    pub fn new(
        width: u32,
        height: u32,
        noise_params: NoiseParams,
        histogram_params: HistogramParams,
        seed: Option<u64>,
    ) -> Result<Self> {
        noise_params.validate_dimensions(width as usize, height as usize)?;
        histogram_params.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bitmap = Bitmap::new(width, height);
        let histogram = Histogram::tally(&bitmap, histogram_params.bins)?;

        Ok(Self {
            noise_params,
            histogram_params,
            rng,
            bitmap,
            histogram,
            frame_index: 0,
        })
    }

    /// Generate the next frame
    pub fn next_frame(&mut self) -> Result<Frame<'_>> {
        self.bitmap.render_noise(&self.noise_params, &mut self.rng)?;
        self.histogram = Histogram::build(&self.bitmap, &self.histogram_params, &mut self.rng)?;
        self.frame_index += 1;
        Ok(self.frame())
    }

    /// Latest frame (blank before the first `next_frame`)
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            index: self.frame_index,
            bitmap: &self.bitmap,
            histogram: &self.histogram,
        }
    }

    pub fn histogram_params(&self) -> &HistogramParams {
        &self.histogram_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn generator(seed: Option<u64>) -> FrameGenerator {
        FrameGenerator::new(
            64,
            64,
            NoiseParams::default(),
            HistogramParams::default(),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut first = generator(Some(99));
        let mut second = generator(Some(99));

        for _ in 0..3 {
            let a = first.next_frame().unwrap();
            let (bitmap, histogram) = (a.bitmap.clone(), a.histogram.clone());
            let b = second.next_frame().unwrap();
            assert_eq!(&bitmap, b.bitmap);
            assert_eq!(&histogram, b.histogram);
        }
    }

    #[test]
    fn test_frames_change_and_count() {
        let mut frames = generator(Some(1));
        let first = frames.next_frame().unwrap().bitmap.clone();
        let second = frames.next_frame().unwrap();

        assert_eq!(second.index, 2);
        assert_ne!(&first, second.bitmap);
        assert_eq!(second.histogram.total(), 64 * 64);
    }

    #[test]
    fn test_blank_before_first_frame() {
        let frames = generator(None);
        let frame = frames.frame();

        assert_eq!(frame.index, 0);
        assert_eq!(frame.histogram.counts()[0], 64 * 64);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let result = FrameGenerator::new(
            60,
            64,
            NoiseParams::default(),
            HistogramParams::default(),
            None,
        );
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));

        let result = FrameGenerator::new(
            64,
            64,
            NoiseParams::default(),
            HistogramParams {
                bins: 0,
                ..Default::default()
            },
            None,
        );
        assert!(matches!(result, Err(Error::NoBins)));
    }
}
