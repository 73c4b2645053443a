//! Error type shared by the noise, bitmap, histogram and rendering modules.

use thiserror::Error;

/// Errors produced by noisegram
#[derive(Debug, Error)]
pub enum Error {
    /// Grid dimensions must be non-zero multiples of the largest octave period
    #[error("dimensions {width}x{height} must be non-zero multiples of {period}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        period: usize,
    },

    #[error("invalid noise parameters: {0}")]
    InvalidNoiseParams(String),

    #[error("histogram needs at least one bin")]
    NoBins,

    /// Pixel or grid buffer does not match the declared dimensions
    #[error("buffer holds {actual} elements, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("render setup failed: {0}")]
    Render(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
