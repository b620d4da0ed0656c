use serde::{Deserialize, Serialize};

use crate::*;

/// Inclusive BGR range that identifies one digit colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub lower: Bgr,
    pub upper: Bgr,
}

impl ColorBand {
    pub const fn new(lower: Bgr, upper: Bgr) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, color: [f64; 3]) -> bool {
        (0..3).all(|c| {
            f64::from(self.lower[c]) <= color[c] && color[c] <= f64::from(self.upper[c])
        })
    }
}

/// Bands for digits 1 to 8, tested in order.
///
/// The first match wins, so with the surface palette rendered 5, 7 and 8
/// glyphs read as 3 and a rendered 6 matches no band at all.
pub const DIGIT_BANDS: [ColorBand; 8] = [
    // blue
    ColorBand::new([220, 0, 0], [255, 200, 200]),
    // green
    ColorBand::new([50, 150, 0], [150, 255, 200]),
    // red
    ColorBand::new([50, 100, 150], [200, 200, 255]),
    // purple
    ColorBand::new([128, 0, 128], [255, 100, 255]),
    // maroon
    ColorBand::new([0, 0, 128], [100, 100, 180]),
    // turquoise
    ColorBand::new([128, 128, 0], [255, 255, 100]),
    // black
    ColorBand::new([0, 0, 0], [50, 50, 50]),
    // gray
    ColorBand::new([100, 100, 100], [150, 150, 150]),
];

/// What a single detected cell appears to show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellReading {
    /// Light face: an unrevealed cell or an empty revealed one.
    Unrevealed,
    Digit(u8),
    /// Dark enough to hold a glyph but no band matched.
    Unknown,
    /// The sample region fell outside the frame.
    Invalid,
}

impl CellReading {
    pub const fn symbol(self) -> char {
        match self {
            Self::Unrevealed | Self::Unknown => ' ',
            Self::Digit(digit) => (b'0' + digit) as char,
            Self::Invalid => '?',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyParams {
    /// Side of the square sampled at each cell centre.
    pub sample_size: u32,
    /// Mean brightness above which a cell counts as a light face.
    pub light_threshold: f64,
    pub bands: [ColorBand; 8],
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            sample_size: 10,
            light_threshold: 200.0,
            bands: DIGIT_BANDS,
        }
    }
}

pub fn classify_color(color: [f64; 3], params: &ClassifyParams) -> CellReading {
    let brightness = color.iter().sum::<f64>() / 3.0;
    if brightness > params.light_threshold {
        return CellReading::Unrevealed;
    }

    params
        .bands
        .iter()
        .position(|band| band.contains(color))
        .map_or(CellReading::Unknown, |index| {
            CellReading::Digit(index as u8 + 1)
        })
}

pub fn classify_cell(frame: &Frame, cell_box: CellBox, params: &ClassifyParams) -> CellReading {
    let (center_x, center_y) = cell_box.center();
    let half = i64::from(params.sample_size / 2);
    let size = i64::from(params.sample_size);
    let (x0, y0) = (i64::from(center_x) - half, i64::from(center_y) - half);

    match frame.region_mean(x0, y0, x0 + size, y0 + size) {
        Some(mean) => classify_color(mean, params),
        None => CellReading::Invalid,
    }
}

pub fn classify_grid(frame: &Frame, grid: &DetectedGrid, params: &ClassifyParams) -> BoardReading {
    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&cell_box| classify_cell(frame, cell_box, params))
                .collect()
        })
        .collect();
    BoardReading::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blue_lower_bound_reads_as_one() {
        let params = ClassifyParams::default();
        assert_eq!(
            classify_color([220.0, 0.0, 0.0], &params),
            CellReading::Digit(1)
        );
    }

    #[test]
    fn sampled_blue_center_reads_as_one() {
        let mut frame = Frame::filled(60, 60, [230, 230, 230]);
        frame.fill_rect(25, 25, 10, 10, [220, 0, 0]);

        let reading = classify_cell(&frame, CellBox::new(10, 10, 40, 40), &ClassifyParams::default());

        assert_eq!(reading, CellReading::Digit(1));
    }

    #[test]
    fn odd_sample_size_covers_full_square() {
        let mut frame = Frame::filled(10, 10, [255, 255, 255]);
        frame.set_pixel(5, 5, [220, 0, 0]);
        let one = ClassifyParams {
            sample_size: 1,
            ..ClassifyParams::default()
        };
        assert_eq!(classify_cell(&frame, CellBox::new(0, 0, 10, 10), &one), CellReading::Digit(1));

        // 3x3 around (5, 5): the right column and bottom row are black
        let mut frame = Frame::filled(10, 10, [255, 255, 255]);
        frame.fill_rect(6, 4, 1, 3, [0, 0, 0]);
        frame.fill_rect(4, 6, 3, 1, [0, 0, 0]);
        let three = ClassifyParams {
            sample_size: 3,
            ..ClassifyParams::default()
        };
        assert_eq!(classify_cell(&frame, CellBox::new(0, 0, 10, 10), &three), CellReading::Digit(8));
    }

    #[test]
    fn light_face_is_unrevealed() {
        let params = ClassifyParams::default();
        assert_eq!(
            classify_color([211.0, 211.0, 211.0], &params),
            CellReading::Unrevealed
        );
    }

    #[test]
    fn first_matching_band_wins() {
        let params = ClassifyParams::default();
        // inside both the blue and the purple band
        assert_eq!(
            classify_color([230.0, 50.0, 150.0], &params),
            CellReading::Digit(1)
        );
        assert_eq!(
            classify_color([0.0, 0.0, 150.0], &params),
            CellReading::Digit(5)
        );
        assert_eq!(
            classify_color([20.0, 20.0, 20.0], &params),
            CellReading::Digit(7)
        );
    }

    #[test]
    fn unmatched_dark_color_is_unknown() {
        let params = ClassifyParams::default();
        let reading = classify_color([0.0, 255.0, 255.0], &params);
        assert_eq!(reading, CellReading::Unknown);
        assert_eq!(reading.symbol(), ' ');
    }

    #[test]
    fn sample_outside_frame_is_invalid() {
        let frame = Frame::filled(20, 20, [0, 0, 0]);
        let reading = classify_cell(&frame, CellBox::new(100, 100, 30, 30), &ClassifyParams::default());
        assert_eq!(reading, CellReading::Invalid);
        assert_eq!(reading.symbol(), '?');
    }
}
