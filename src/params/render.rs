//! Window and pane layout configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Window title
    pub title: String,

    /// Pane grid rows
    pub grid_rows: u32,

    /// Pane grid columns (image left, histogram right)
    pub grid_cols: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 800,
            title: "Histogram Demo".to_string(),
            grid_rows: 1,
            grid_cols: 2,
        }
    }
}
