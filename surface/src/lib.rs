//! Button-grid presentation of a [`Game`]: one widget per cell, a status
//! line, pointer dispatch and a software rasteriser producing [`Frame`]s that
//! the vision pipeline can read back.

use bitflags::bitflags;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sweeper_core::*;

pub use layout::*;
pub use render::*;
pub use widget::*;

mod font;
mod layout;
mod render;
mod widget;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PointerButtons: u8 {
        const LEFT   = 1;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

/// A released click over a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub coords: Coord2,
    pub buttons: PointerButtons,
}

impl PointerEvent {
    pub const fn left(coords: Coord2) -> Self {
        Self {
            coords,
            buttons: PointerButtons::LEFT,
        }
    }

    pub const fn right(coords: Coord2) -> Self {
        Self {
            coords,
            buttons: PointerButtons::RIGHT,
        }
    }
}

/// Whether a handled event should reach the widget's default behaviour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Clone, Debug)]
pub struct Surface {
    game: Game,
    layout: Layout,
    widgets: Array2<CellWidget>,
    status_text: &'static str,
}

impl Surface {
    pub fn new(game: Game, layout: Layout) -> Self {
        let (rows, cols) = game.size();
        let mut surface = Self {
            game,
            layout,
            widgets: Array2::default((rows as usize, cols as usize)),
            status_text: STATUS_WELCOME,
        };
        surface.sync();
        surface
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.game.size()
    }

    pub fn status_text(&self) -> &'static str {
        self.status_text
    }

    /// Widget for a cell; panics when out of range.
    pub fn widget(&self, coords: Coord2) -> &CellWidget {
        &self.widgets[coords.to_nd_index()]
    }

    pub fn is_pressed(&self, coords: Coord2) -> bool {
        self.widget(coords).is_pressed()
    }

    /// A finished game leaves every button disabled.
    pub fn is_inert(&self) -> bool {
        self.game.is_finished()
    }

    /// Cell under a desktop position, if any.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Coord2> {
        self.layout.hit_test(self.size(), x, y)
    }

    /// Same as a left click on the cell's button.
    pub fn activate(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.game.mine_layout().validate_coords(coords)?;
        if !self.widget(coords).enabled {
            return Ok(RevealOutcome::NoChange);
        }
        let outcome = self.game.activate(coords)?;
        if outcome.has_update() {
            self.sync();
        }
        Ok(outcome)
    }

    /// Same as a right click on the cell's button.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.game.mine_layout().validate_coords(coords)?;
        if !self.widget(coords).enabled {
            return Ok(MarkOutcome::NoChange);
        }
        let outcome = self.game.toggle_flag(coords)?;
        if outcome.has_update() {
            self.sync();
        }
        Ok(outcome)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Result<Propagation> {
        let PointerEvent { coords, buttons } = event;
        match buttons {
            PointerButtons::LEFT => {
                log::debug!("activate cell: {:?}", coords);
                self.activate(coords)?;
                Ok(Propagation::Continue)
            }
            PointerButtons::RIGHT => {
                log::debug!("flag cell: {:?}", coords);
                self.toggle_flag(coords)?;
                Ok(Propagation::Stop)
            }
            _ => {
                log::trace!("ignoring buttons {:?} at {:?}", buttons, coords);
                Ok(Propagation::Continue)
            }
        }
    }

    /// Rebuilds every widget and the status line from the game state.
    pub fn sync(&mut self) {
        let enabled = !self.game.is_finished();
        for coords in iter_coords(self.size()) {
            let state = self.game.cell_state(coords);
            self.widgets[coords.to_nd_index()] = widget_for(state, enabled);
        }
        self.status_text = match self.game.status() {
            GameStatus::InProgress => STATUS_WELCOME,
            GameStatus::Lost => STATUS_LOST,
            GameStatus::Won => STATUS_WON,
        };
    }
}

fn widget_for(state: CellState, enabled: bool) -> CellWidget {
    use CellState::*;

    let base = CellWidget {
        enabled,
        ..CellWidget::default()
    };
    match state {
        Hidden => base,
        Flagged => CellWidget {
            label: CellLabel::Flag,
            fg: Color::Red,
            bg: Color::Yellow,
            ..base
        },
        Revealed(0) => CellWidget {
            bg: Color::Pressed,
            relief: Relief::Sunken,
            ..base
        },
        Revealed(n) => CellWidget {
            label: CellLabel::Digit(n),
            fg: Color::for_digit(n),
            ..base
        },
        Mine => CellWidget {
            label: CellLabel::Mine,
            ..base
        },
    }
}
