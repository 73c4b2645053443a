//! Histogram chart geometry for the GPU pane and for PNG snapshots.
//!
//! Geometry is expressed in the chart pane's normalized device coordinates
//! ([-1, 1] on both axes, y up). The plot area leaves `PLOT_MARGIN` on every
//! side for the axis lines.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::histogram::Histogram;

/// Gap between pane border and plot area (NDC units)
pub const PLOT_MARGIN: f32 = 0.1;

/// Axis line thickness (NDC units)
pub const AXIS_THICKNESS: f32 = 0.006;

pub const AXIS_COLOR: [f32; 3] = [0.85, 0.85, 0.85];

/// Vertex data for chart triangles (position + color)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ChartVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

/// Axis limits of the histogram chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartAxes {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl ChartAxes {
    /// X over the normalized intensity range, Y up to a quarter of the pixels
    /// scaled by the bin count (`total / (bins / 4)`)
    ///
    /// Using the full pixel count as the Y range would flatten every bar.
    pub fn for_histogram(total_pixels: usize, bins: usize) -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: total_pixels as f32 / (bins as f32 / 4.0),
        }
    }

    /// Fraction of the plot height covered by `count`, clipped to [0, 1]
    pub fn height_fraction(&self, count: u32) -> f32 {
        let span = self.y_max - self.y_min;
        if span <= 0.0 {
            return 0.0;
        }
        ((count as f32 - self.y_min) / span).clamp(0.0, 1.0)
    }
}

/// Axis-aligned filled rectangle in pane NDC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRect {
    pub min: Vec2,
    pub max: Vec2,
    pub color: [f32; 3],
}

/// One rectangle per bin followed by the X and Y axis lines
pub fn chart_rects(histogram: &Histogram, axes: &ChartAxes) -> Vec<ChartRect> {
    let plot_min = Vec2::splat(-1.0 + PLOT_MARGIN);
    let plot_max = Vec2::splat(1.0 - PLOT_MARGIN);
    let plot_size = plot_max - plot_min;
    let bar_width = plot_size.x / histogram.bins() as f32;

    let mut rects: Vec<ChartRect> = histogram
        .counts()
        .iter()
        .zip(histogram.colors())
        .enumerate()
        .map(|(bin, (&count, &color))| {
            let left = plot_min.x + bin as f32 * bar_width;
            let top = plot_min.y + axes.height_fraction(count) * plot_size.y;
            ChartRect {
                min: Vec2::new(left, plot_min.y),
                max: Vec2::new(left + bar_width, top),
                color,
            }
        })
        .collect();

    // X axis along the bottom, Y axis along the left edge
    rects.push(ChartRect {
        min: Vec2::new(plot_min.x, plot_min.y - AXIS_THICKNESS),
        max: Vec2::new(plot_max.x, plot_min.y),
        color: AXIS_COLOR,
    });
    rects.push(ChartRect {
        min: Vec2::new(plot_min.x - AXIS_THICKNESS, plot_min.y),
        max: Vec2::new(plot_min.x, plot_max.y),
        color: AXIS_COLOR,
    });

    rects
}

/// Number of vertices `bar_vertices` emits for `bins` bins
pub fn vertex_count(bins: usize) -> usize {
    (bins + 2) * 6
}

/// Triangle list for the chart pane (two triangles per rectangle)
pub fn bar_vertices(histogram: &Histogram, axes: &ChartAxes) -> Vec<ChartVertex> {
    let rects = chart_rects(histogram, axes);
    let mut vertices = Vec::with_capacity(rects.len() * 6);

    for rect in rects {
        let corner = |x: f32, y: f32| ChartVertex {
            position: [x, y],
            color: rect.color,
        };
        let bottom_left = corner(rect.min.x, rect.min.y);
        let bottom_right = corner(rect.max.x, rect.min.y);
        let top_right = corner(rect.max.x, rect.max.y);
        let top_left = corner(rect.min.x, rect.max.y);

        // Counter-clockwise winding
        vertices.extend_from_slice(&[
            bottom_left,
            bottom_right,
            top_right,
            bottom_left,
            top_right,
            top_left,
        ]);
    }

    vertices
}

/// Draw the chart into a `width` x `height` image on a black background
pub fn rasterize(histogram: &Histogram, axes: &ChartAxes, width: u32, height: u32) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let to_pixel = |ndc: Vec2| {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc.y) * 0.5 * height as f32,
        )
    };

    for rect in chart_rects(histogram, axes) {
        // NDC y grows upward, pixel y grows downward
        let start = to_pixel(Vec2::new(rect.min.x, rect.max.y)).round();
        let end = to_pixel(Vec2::new(rect.max.x, rect.min.y)).round();
        let color = Rgba([
            (rect.color[0] * 255.0) as u8,
            (rect.color[1] * 255.0) as u8,
            (rect.color[2] * 255.0) as u8,
            255,
        ]);

        let (x0, x1) = (start.x.max(0.0) as u32, (end.x.max(0.0) as u32).min(width));
        let (y0, y1) = (start.y.max(0.0) as u32, (end.y.max(0.0) as u32).min(height));
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, color);
            }
        }
    }

    image
}
