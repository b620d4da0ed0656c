//! Minesweeper board engine: mine placement, reveal/flag state, flood fill and
//! win/loss detection.

use core::ops::BitOr;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use layout::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod layout;
mod types;

/// Result of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Result of activating a cell. Variants are ordered by precedence when
/// several activations are merged with `|`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Won,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::HitMine)
    }
}

impl BitOr for RevealOutcome {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.max(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_outcome_prefers_mine_hit() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!(NoChange | NoChange).has_update());
        assert!((Revealed | Won).is_terminal());
        assert!(!Revealed.is_terminal());
    }
}
