//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::{BarColoring, HistogramParams, NoiseParams, RenderConfig, DEFAULT_BAR_COLOR};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "noisegram")]
#[command(about = "Layered noise image and its intensity histogram", long_about = None)]
pub struct Args {
    /// Image width and height (pixels, multiple of 2^octaves)
    #[arg(long, value_name = "PIXELS", default_value_t = 256)]
    pub size: u32,

    /// Number of histogram bins
    #[arg(long, value_name = "COUNT", default_value_t = 256)]
    pub bins: usize,

    /// Highest noise octave (largest period is 2^octaves)
    #[arg(long, value_name = "OCTAVE", default_value_t = 6)]
    pub octaves: u32,

    /// Amplitude decay per octave
    #[arg(long, default_value_t = 0.5)]
    pub persistence: f32,

    /// RNG seed for a reproducible frame sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw every histogram bar in one color instead of random colors
    #[arg(long)]
    pub solid_bars: bool,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1000)]
    pub window_width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 800)]
    pub window_height: u32,

    /// Write noise.png and histogram.png into DIR and exit without a window
    #[arg(long, value_name = "DIR")]
    pub snapshot: Option<PathBuf>,
}

impl Args {
    /// Noise parameters (validated against the image size)
    pub fn noise_params(&self) -> Result<NoiseParams> {
        let params = NoiseParams {
            max_octave: self.octaves,
            persistence: self.persistence,
        };
        params.validate_dimensions(self.size as usize, self.size as usize)?;
        Ok(params)
    }

    /// Histogram parameters
    pub fn histogram_params(&self) -> Result<HistogramParams> {
        let coloring = if self.solid_bars {
            BarColoring::Solid(DEFAULT_BAR_COLOR)
        } else {
            BarColoring::Random
        };
        let params = HistogramParams {
            bins: self.bins,
            coloring,
        };
        params.validate()?;
        Ok(params)
    }

    /// Window configuration
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.window_width.max(1),
            window_height: self.window_height.max(1),
            ..RenderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_match_demo() {
        let args = Args::parse_from(["noisegram"]);

        assert_eq!(args.size, 256);
        assert_eq!(args.bins, 256);
        assert!(args.snapshot.is_none());

        let noise = args.noise_params().unwrap();
        assert_eq!(noise.max_octave, 6);
        assert_eq!(noise.persistence, 0.5);
        assert_eq!(args.histogram_params().unwrap().coloring, BarColoring::Random);

        let render = args.render_config();
        assert_eq!((render.window_width, render.window_height), (1000, 800));
        assert_eq!(render.title, "Histogram Demo");
    }

    #[test]
    fn test_invalid_size_rejected() {
        let args = Args::parse_from(["noisegram", "--size", "100"]);
        assert!(matches!(
            args.noise_params(),
            Err(Error::InvalidDimensions { .. })
        ));

        // Smaller octave count relaxes the divisibility requirement
        let args = Args::parse_from(["noisegram", "--size", "100", "--octaves", "2"]);
        assert!(args.noise_params().is_ok());
    }

    #[test]
    fn test_solid_bars_and_snapshot() {
        let args = Args::parse_from([
            "noisegram",
            "--solid-bars",
            "--bins",
            "32",
            "--seed",
            "7",
            "--snapshot",
            "out",
        ]);

        let params = args.histogram_params().unwrap();
        assert_eq!(params.bins, 32);
        assert_eq!(params.coloring, BarColoring::Solid(DEFAULT_BAR_COLOR));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.snapshot, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let args = Args::parse_from(["noisegram", "--bins", "0"]);
        assert!(matches!(args.histogram_params(), Err(Error::NoBins)));
    }
}
