use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::*;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Alternating outline colours so neighbouring rows are easy to tell apart.
const ROW_COLORS: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 0, 255]), Rgb([255, 0, 255])];

fn draw_box(canvas: &mut RgbImage, cell_box: CellBox, color: Rgb<u8>) {
    if cell_box.w == 0 || cell_box.h == 0 {
        return;
    }
    let (x, y) = (cell_box.x as i32, cell_box.y as i32);
    draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(cell_box.w, cell_box.h), color);
    if cell_box.w > 2 && cell_box.h > 2 {
        let inner = Rect::at(x + 1, y + 1).of_size(cell_box.w - 2, cell_box.h - 2);
        draw_hollow_rect_mut(canvas, inner, color);
    }
}

/// Copy of the frame with every box outlined.
pub fn draw_boxes(frame: &Frame, cells: &[CellBox]) -> RgbImage {
    let mut canvas = frame.to_rgb_image();
    for &cell_box in cells {
        draw_box(&mut canvas, cell_box, BOX_COLOR);
    }
    canvas
}

/// Copy of the frame with each detected row outlined in its own colour.
pub fn draw_grid(frame: &Frame, grid: &DetectedGrid) -> RgbImage {
    let mut canvas = frame.to_rgb_image();
    for ((row, _), cell_box) in grid.iter() {
        draw_box(&mut canvas, cell_box, ROW_COLORS[row % ROW_COLORS.len()]);
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_box_edges_only() {
        let frame = Frame::filled(50, 50, [255, 255, 255]);
        let canvas = draw_boxes(&frame, &[CellBox::new(10, 10, 20, 20)]);

        assert_eq!(*canvas.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(11, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(20, 20), Rgb([255, 255, 255]));
    }

    #[test]
    fn grid_rows_use_distinct_colors() {
        let frame = Frame::filled(100, 100, [255, 255, 255]);
        let grid = DetectedGrid::organize(
            &[CellBox::new(0, 0, 30, 30), CellBox::new(0, 50, 30, 30)],
            0.5,
        );

        let canvas = draw_grid(&frame, &grid);

        assert_eq!(*canvas.get_pixel(0, 0), ROW_COLORS[0]);
        assert_eq!(*canvas.get_pixel(0, 50), ROW_COLORS[1]);
    }
}
