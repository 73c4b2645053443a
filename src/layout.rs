//! Window grid splitting into per-pane viewports.

use glam::Vec2;

/// Pixel rectangle on the surface (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Largest centered sub-rectangle with `aspect` = width / height
    pub fn fit_aspect(&self, aspect: f32) -> Self {
        let size = if self.size.x / self.size.y > aspect {
            Vec2::new(self.size.y * aspect, self.size.y)
        } else {
            Vec2::new(self.size.x, self.size.x / aspect)
        };
        Self {
            origin: self.origin + (self.size - size) * 0.5,
            size,
        }
    }

    /// Shrink by `margin` pixels on every side
    pub fn inset(&self, margin: f32) -> Self {
        let margin = Vec2::splat(margin).min(self.size * 0.5);
        Self {
            origin: self.origin + margin,
            size: self.size - margin * 2.0,
        }
    }

    /// True when the rectangle covers at least one pixel
    pub fn is_drawable(&self) -> bool {
        self.size.x >= 1.0 && self.size.y >= 1.0
    }
}

/// Equal-sized grid of panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
}

impl Grid {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Viewport of the pane at (`col`, `row`) on a `surface` sized in pixels
    pub fn cell(&self, col: u32, row: u32, surface: (u32, u32)) -> Viewport {
        let cell_w = surface.0 as f32 / self.cols as f32;
        let cell_h = surface.1 as f32 / self.rows as f32;
        Viewport::new(col as f32 * cell_w, row as f32 * cell_h, cell_w, cell_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_by_two_grid() {
        let grid = Grid::new(1, 2);

        assert_eq!(grid.cell(0, 0, (1000, 800)), Viewport::new(0.0, 0.0, 500.0, 800.0));
        assert_eq!(
            grid.cell(1, 0, (1000, 800)),
            Viewport::new(500.0, 0.0, 500.0, 800.0)
        );
    }

    #[test]
    fn test_degenerate_grid_is_single_pane() {
        let grid = Grid::new(0, 0);
        assert_eq!(grid.cell(0, 0, (640, 480)), Viewport::new(0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn test_fit_square_in_tall_cell() {
        let cell = Viewport::new(0.0, 0.0, 500.0, 800.0);
        let square = cell.fit_aspect(1.0);

        assert_eq!(square, Viewport::new(0.0, 150.0, 500.0, 500.0));
    }

    #[test]
    fn test_fit_square_in_wide_cell() {
        let cell = Viewport::new(100.0, 0.0, 400.0, 200.0);
        let square = cell.fit_aspect(1.0);

        assert_eq!(square, Viewport::new(200.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_inset_never_inverts() {
        let cell = Viewport::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(cell.inset(2.0), Viewport::new(2.0, 2.0, 6.0, 6.0));
        assert!(!cell.inset(50.0).is_drawable());
    }
}
