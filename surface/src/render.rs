use sweeper_core::{Coord2, iter_coords};
use sweeper_vision::{Bgr, Frame};

use crate::font::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph, is_lit};
use crate::*;

pub const WINDOW_BACKGROUND: Bgr = [240, 240, 240];
pub const CELL_BORDER: Bgr = [96, 96, 96];

/// Status strip colour; the strip carries no text.
fn status_color(status_text: &str) -> Bgr {
    match status_text {
        STATUS_LOST => [80, 80, 200],
        STATUS_WON => [80, 180, 80],
        _ => [225, 225, 225],
    }
}

/// Rasterises the whole window in window-local pixels.
pub fn render(surface: &Surface) -> Frame {
    let layout = surface.layout();
    let size = surface.size();
    let (width, height) = layout.window_size(size);
    let mut frame = Frame::filled(width, height, WINDOW_BACKGROUND);

    for coords in iter_coords(size) {
        draw_cell(&mut frame, layout, coords, surface.widget(coords));
    }

    let label = layout.label_rect(size);
    frame.fill_rect(
        i64::from(label.x),
        i64::from(label.y),
        label.w,
        label.h,
        status_color(surface.status_text()),
    );
    frame
}

fn draw_cell(frame: &mut Frame, layout: &Layout, coords: Coord2, widget: &CellWidget) {
    let rect = layout.cell_rect(coords);
    let (x, y) = (i64::from(rect.x), i64::from(rect.y));
    let inset = layout.border.min(rect.w / 2);

    frame.fill_rect(x, y, rect.w, rect.h, CELL_BORDER);
    frame.fill_rect(
        x + i64::from(inset),
        y + i64::from(inset),
        rect.w - 2 * inset,
        rect.h - 2 * inset,
        widget.bg.bgr(),
    );

    let Some(glyph) = glyph(widget.label) else {
        return;
    };
    let scale = (rect.w / 10).max(1);
    let (glyph_w, glyph_h) = (GLYPH_WIDTH * scale, GLYPH_HEIGHT * scale);
    let (cx, cy) = rect.center();
    let x0 = i64::from(cx) - i64::from(glyph_w / 2);
    let y0 = i64::from(cy) - i64::from(glyph_h / 2);
    let fg = widget.fg.bgr();
    for row in 0..GLYPH_HEIGHT {
        for col in 0..GLYPH_WIDTH {
            if is_lit(glyph, col, row) {
                frame.fill_rect(
                    x0 + i64::from(col * scale),
                    y0 + i64::from(row * scale),
                    scale,
                    scale,
                    fg,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Game, MineLayout};
    use sweeper_vision::{CellReading, VisionConfig, reconstruct};

    fn surface(size: Coord2, mines: &[Coord2]) -> Surface {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        Surface::new(Game::new(layout), Layout::default())
    }

    #[test]
    fn frame_matches_window_size() {
        let frame = render(&surface((4, 6), &[(0, 0)]));
        assert_eq!((frame.width(), frame.height()), (260, 204));
    }

    #[test]
    fn cell_face_and_border_are_drawn() {
        let frame = render(&surface((2, 2), &[(0, 0)]));

        assert_eq!(frame.pixel(10, 10), CELL_BORDER);
        assert_eq!(frame.pixel(30, 30), Color::Face.bgr());
        assert_eq!(frame.pixel(2, 2), WINDOW_BACKGROUND);
    }

    #[test]
    fn fresh_board_reads_back_as_unrevealed() {
        let frame = render(&surface((4, 5), &[(0, 0)]));

        let result = reconstruct(&frame, &VisionConfig::default());

        assert_eq!(result.grid.row_count(), 4);
        assert!(result.grid.rows().iter().all(|row| row.len() == 5));
        assert_eq!(result.reading.count(CellReading::Unrevealed), 20);
    }

    #[test]
    fn revealed_one_reads_back_as_digit() {
        let mut surface = surface((3, 3), &[(0, 0)]);
        surface.activate((1, 1)).unwrap();

        let frame = render(&surface);
        let result = reconstruct(&frame, &VisionConfig::default());

        assert_eq!(result.reading.get(1, 1), Some(CellReading::Digit(1)));
        assert_eq!(result.reading.count(CellReading::Unrevealed), 8);
    }

    #[test]
    fn digit_glyphs_read_back_through_first_matching_band() {
        let surface = surface((3, 3), &[(0, 0)]);
        let readings: Vec<_> = (1..=8)
            .map(|digit| {
                let mut frame = render(&surface);
                let widget = CellWidget {
                    label: CellLabel::Digit(digit),
                    fg: Color::for_digit(digit),
                    ..CellWidget::default()
                };
                draw_cell(&mut frame, surface.layout(), (1, 1), &widget);
                reconstruct(&frame, &VisionConfig::default()).reading.get(1, 1)
            })
            .collect();

        use CellReading::*;
        assert_eq!(
            readings,
            [Digit(1), Digit(2), Digit(3), Digit(4), Digit(3), Unknown, Digit(3), Digit(3)].map(Some)
        );
    }

    #[test]
    fn status_strip_follows_game_state() {
        let mut surface = surface((3, 3), &[(0, 0)]);
        let (x, y) = (5, 3 * 40 + 20 + 5);

        assert_eq!(render(&surface).pixel(x, y), status_color(STATUS_WELCOME));
        surface.activate((0, 0)).unwrap();
        assert_eq!(render(&surface).pixel(x, y), status_color(STATUS_LOST));
    }
}
