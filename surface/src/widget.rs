use serde::{Deserialize, Serialize};
use sweeper_vision::Bgr;

pub const STATUS_WELCOME: &str = "Welcome to Minesweeper!";
pub const STATUS_LOST: &str = "Game Over!";
pub const STATUS_WON: &str = "You Win!";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Face,
    Pressed,
    Yellow,
    Blue,
    Green,
    Red,
    Purple,
    Maroon,
    Turquoise,
    Black,
    Gray,
}

impl Color {
    pub const fn bgr(self) -> Bgr {
        use Color::*;
        match self {
            Face => [240, 240, 240],
            Pressed => [211, 211, 211],
            Yellow => [0, 255, 255],
            Blue => [255, 0, 0],
            Green => [0, 128, 0],
            Red => [0, 0, 255],
            Purple => [128, 0, 128],
            Maroon => [0, 0, 128],
            Turquoise => [208, 224, 64],
            Black => [0, 0, 0],
            Gray => [128, 128, 128],
        }
    }

    /// Fixed colour of each adjacency digit.
    pub const fn for_digit(digit: u8) -> Self {
        use Color::*;
        match digit {
            1 => Blue,
            2 => Green,
            3 => Red,
            4 => Purple,
            5 => Maroon,
            6 => Turquoise,
            8 => Gray,
            _ => Black,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relief {
    #[default]
    Raised,
    Sunken,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellLabel {
    #[default]
    Empty,
    Digit(u8),
    Flag,
    Mine,
}

impl CellLabel {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Digit(1) => "1",
            Self::Digit(2) => "2",
            Self::Digit(3) => "3",
            Self::Digit(4) => "4",
            Self::Digit(5) => "5",
            Self::Digit(6) => "6",
            Self::Digit(7) => "7",
            Self::Digit(_) => "8",
            Self::Flag => "F",
            Self::Mine => "*",
        }
    }
}

/// Visual state of one board button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWidget {
    pub label: CellLabel,
    pub fg: Color,
    pub bg: Color,
    pub relief: Relief,
    pub enabled: bool,
}

impl Default for CellWidget {
    fn default() -> Self {
        Self {
            label: CellLabel::Empty,
            fg: Color::Black,
            bg: Color::Face,
            relief: Relief::Raised,
            enabled: true,
        }
    }
}

impl CellWidget {
    pub const fn is_pressed(&self) -> bool {
        matches!(self.relief, Relief::Sunken)
    }
}
