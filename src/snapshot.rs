//! Headless export of one frame as PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::{self, ChartAxes};
use crate::error::Result;
use crate::frame::FrameGenerator;

/// Histogram chart image size (pixels)
pub const CHART_SIZE: (u32, u32) = (800, 600);

/// Files written by one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPaths {
    pub noise: PathBuf,
    pub histogram: PathBuf,
}

/// Generate one frame and write `noise.png` and `histogram.png` into `dir`
pub fn write_snapshot(frames: &mut FrameGenerator, dir: impl AsRef<Path>) -> Result<SnapshotPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let frame = frames.next_frame()?;
    let axes = ChartAxes::for_histogram(frame.bitmap.pixel_count(), frame.histogram.bins());

    let paths = SnapshotPaths {
        noise: dir.join("noise.png"),
        histogram: dir.join("histogram.png"),
    };

    frame.bitmap.save_png(&paths.noise)?;
    chart::rasterize(frame.histogram, &axes, CHART_SIZE.0, CHART_SIZE.1).save(&paths.histogram)?;

    log::info!(
        "Snapshot written: {} and {}",
        paths.noise.display(),
        paths.histogram.display()
    );

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HistogramParams, NoiseParams};

    #[test]
    fn test_snapshot_writes_both_images() {
        let dir = std::env::temp_dir().join(format!("noisegram-snapshot-{}", std::process::id()));
        let mut frames = FrameGenerator::new(
            64,
            64,
            NoiseParams::default(),
            HistogramParams::default(),
            Some(5),
        )
        .unwrap();

        let paths = write_snapshot(&mut frames, &dir).unwrap();

        let noise = image::open(&paths.noise).unwrap();
        assert_eq!((noise.width(), noise.height()), (64, 64));
        let histogram = image::open(&paths.histogram).unwrap();
        assert_eq!((histogram.width(), histogram.height()), CHART_SIZE);

        fs::remove_dir_all(&dir).unwrap();
    }
}
