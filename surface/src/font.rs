use crate::CellLabel;

pub(crate) const GLYPH_WIDTH: u32 = 3;
pub(crate) const GLYPH_HEIGHT: u32 = 5;

/// 3x5 bitmaps, one byte per row with the leftmost pixel in bit 2.
pub(crate) type Glyph = [u8; GLYPH_HEIGHT as usize];

const DIGITS: [Glyph; 8] = [
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
];

const FLAG: Glyph = [0b110, 0b111, 0b110, 0b100, 0b100];
const MINE: Glyph = [0b010, 0b111, 0b111, 0b111, 0b010];

pub(crate) fn glyph(label: CellLabel) -> Option<&'static Glyph> {
    match label {
        CellLabel::Empty => None,
        CellLabel::Digit(n @ 1..=8) => Some(&DIGITS[usize::from(n - 1)]),
        CellLabel::Digit(_) => None,
        CellLabel::Flag => Some(&FLAG),
        CellLabel::Mine => Some(&MINE),
    }
}

pub(crate) fn is_lit(glyph: &Glyph, col: u32, row: u32) -> bool {
    glyph[row as usize] & (0b100 >> col) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_has_a_stem() {
        let one = glyph(CellLabel::Digit(1)).unwrap();
        assert!((0..GLYPH_HEIGHT).all(|row| is_lit(one, 1, row)));
        assert!(!is_lit(one, 2, 0));
    }

    #[test]
    fn empty_and_zero_have_no_glyph() {
        assert!(glyph(CellLabel::Empty).is_none());
        assert!(glyph(CellLabel::Digit(0)).is_none());
    }
}
