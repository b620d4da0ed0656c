use core::fmt;
use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game from the first move to a win or a loss.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    mine_layout: MineLayout,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl Game {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            status: Default::default(),
            triggered_mine: None,
        }
    }

    /// Creates a game with mines placed uniformly at random.
    pub fn random(config: GameConfig, seed: u64) -> Result<Self> {
        let mine_layout = RandomLayoutGenerator::new(seed).generate(config)?;
        Ok(Self::new(mine_layout))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_layout.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// Panics when `coords` is outside the board.
    pub fn cell_state(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(Cell::new(self.cell_state(coords), self.mine_layout[coords]))
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.status.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.board[coords.to_nd_index()] {
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) | Mine => NoChange,
        })
    }

    /// Reveals a hidden cell, cascading through zero-adjacency regions.
    pub fn activate(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if self.status.is_finished() || !matches!(self.cell_state(coords), CellState::Hidden) {
            log::trace!("Ignoring activation at {:?}", coords);
            return Ok(RevealOutcome::NoChange);
        }

        if self.mine_layout[coords] {
            log::debug!("Mine hit at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.end_game(GameStatus::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            // the hidden state doubles as the visited marker
            if !matches!(self.board[visit_coords.to_nd_index()], CellState::Hidden) {
                continue;
            }

            let adjacent_mines = self.mine_layout.adjacent_mine_count(visit_coords);
            self.board[visit_coords.to_nd_index()] = CellState::Revealed(adjacent_mines);
            self.revealed_count += 1;
            log::trace!(
                "Revealed {:?}, adjacent mines: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(self.board[pos.to_nd_index()], CellState::Hidden)),
                );
            }
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        self.status = status;
        self.reveal_mines();
        log::debug!("Game finished: {:?}", status);
    }

    fn reveal_mines(&mut self) {
        for coords in iter_coords(self.size()) {
            if self.mine_layout[coords] {
                if self.board[coords.to_nd_index()].is_flagged() {
                    self.flagged_count -= 1;
                }
                self.board[coords.to_nd_index()] = CellState::Mine;
            }
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 {
                    f.write_str(" ")?;
                }
                let symbol = match self.cell_state((row, col)) {
                    CellState::Hidden => '#',
                    CellState::Flagged => 'F',
                    CellState::Revealed(0) => '.',
                    CellState::Revealed(count) => char::from(b'0' + count),
                    CellState::Mine if self.triggered_mine == Some((row, col)) => 'X',
                    CellState::Mine => '*',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
