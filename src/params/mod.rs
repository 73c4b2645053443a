//! Parameter definitions with documented defaults and validation.
//!
//! Every tunable of the demo lives here:
//! - Noise synthesis (octaves, persistence)
//! - Histogram binning and bar coloring
//! - Window and pane layout

mod histogram;
mod noise;
mod render;

// Re-export all types
pub use histogram::{BarColoring, HistogramParams, DEFAULT_BAR_COLOR};
pub use noise::NoiseParams;
pub use render::RenderConfig;
