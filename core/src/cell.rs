use serde::{Deserialize, Serialize};

/// Per-cell state stored by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mined cell exposed when the game ends.
    Mine,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Mine)
    }

    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// Read-only view of a single board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub is_mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Only known once a safe cell has been revealed.
    pub adjacent_mine_count: Option<u8>,
}

impl Cell {
    pub(crate) fn new(state: CellState, is_mine: bool) -> Self {
        let adjacent_mine_count = match state {
            CellState::Revealed(count) => Some(count),
            _ => None,
        };
        Self {
            is_mine,
            revealed: state.is_revealed(),
            flagged: state.is_flagged(),
            adjacent_mine_count,
        }
    }
}
