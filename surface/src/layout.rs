use serde::{Deserialize, Serialize};
use sweeper_core::{Coord, Coord2};

/// Rectangle in pixels; `x`/`y` may be window-local or absolute depending on
/// where it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && i64::from(x) < i64::from(self.x) + i64::from(self.w)
            && i64::from(y) < i64::from(self.y) + i64::from(self.h)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + (self.w / 2) as i32, self.y + (self.h / 2) as i32)
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Pixel geometry of the game window: a margin, the cell grid, then the
/// status strip below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Top-left corner of the window on the desktop.
    pub origin: (i32, i32),
    pub cell_size: u32,
    pub border: u32,
    pub margin: u32,
    pub label_height: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin: (100, 100),
            cell_size: 40,
            border: 2,
            margin: 10,
            label_height: 24,
        }
    }
}

impl Layout {
    pub fn window_size(&self, (rows, cols): Coord2) -> (u32, u32) {
        (
            2 * self.margin + u32::from(cols) * self.cell_size,
            2 * self.margin + u32::from(rows) * self.cell_size + self.label_height,
        )
    }

    /// Window bounds in desktop coordinates.
    pub fn window_rect(&self, size: Coord2) -> PixelRect {
        let (w, h) = self.window_size(size);
        PixelRect::new(self.origin.0, self.origin.1, w, h)
    }

    /// Cell bounds relative to the window.
    pub fn cell_rect(&self, (row, col): Coord2) -> PixelRect {
        PixelRect::new(
            (self.margin + u32::from(col) * self.cell_size) as i32,
            (self.margin + u32::from(row) * self.cell_size) as i32,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Centre of a cell in desktop coordinates.
    pub fn cell_center(&self, coords: Coord2) -> (i32, i32) {
        self.cell_rect(coords).offset(self.origin).center()
    }

    /// Status strip bounds relative to the window.
    pub fn label_rect(&self, size: Coord2) -> PixelRect {
        let (w, h) = self.window_size(size);
        PixelRect::new(0, (h - self.label_height) as i32, w, self.label_height)
    }

    /// Maps a desktop position to the cell under it.
    pub fn hit_test(&self, (rows, cols): Coord2, x: i32, y: i32) -> Option<Coord2> {
        let local_x = i64::from(x) - i64::from(self.origin.0) - i64::from(self.margin);
        let local_y = i64::from(y) - i64::from(self.origin.1) - i64::from(self.margin);
        if local_x < 0 || local_y < 0 || self.cell_size == 0 {
            return None;
        }
        let col = local_x / i64::from(self.cell_size);
        let row = local_y / i64::from(self.cell_size);
        if row >= i64::from(rows) || col >= i64::from(cols) {
            return None;
        }
        Some((row as Coord, col as Coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_fits_ten_by_ten() {
        let layout = Layout::default();
        assert_eq!(layout.window_size((10, 10)), (420, 444));
        assert_eq!(layout.window_rect((10, 10)), PixelRect::new(100, 100, 420, 444));
    }

    #[test]
    fn cell_center_round_trips_through_hit_test() {
        let layout = Layout::default();
        for coords in [(0, 0), (3, 7), (9, 9)] {
            let (x, y) = layout.cell_center(coords);
            assert_eq!(layout.hit_test((10, 10), x, y), Some(coords));
        }
        assert_eq!(layout.cell_center((0, 0)), (130, 130));
    }

    #[test]
    fn hit_test_misses_outside_grid() {
        let layout = Layout::default();
        assert_eq!(layout.hit_test((10, 10), 105, 105), None);
        assert_eq!(layout.hit_test((10, 10), 100 + 10 + 400, 150), None);
        assert_eq!(layout.hit_test((10, 10), 0, 0), None);
    }

    #[test]
    fn label_sits_below_grid() {
        let layout = Layout::default();
        assert_eq!(layout.label_rect((2, 3)), PixelRect::new(0, 100, 140, 24));
    }
}
