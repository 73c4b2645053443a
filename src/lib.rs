//! noisegram library - layered noise images and their intensity histograms

pub mod bitmap;
pub mod chart;
pub mod cli;
pub mod error;
pub mod frame;
pub mod histogram;
pub mod layout;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod snapshot;

pub use error::{Error, Result};
