use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Reconstructed board, one reading per detected cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardReading {
    rows: Vec<Vec<CellReading>>,
}

impl BoardReading {
    pub fn new(rows: Vec<Vec<CellReading>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellReading>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellReading> {
        self.rows.get(row)?.get(col).copied()
    }

    pub fn count(&self, reading: CellReading) -> usize {
        self.rows.iter().flatten().filter(|&&r| r == reading).count()
    }
}

/// Rows of space separated symbols.
impl fmt::Display for BoardReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for (col, reading) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", reading.symbol())?;
            }
        }
        Ok(())
    }
}

/// Remembers the last printed board so unchanged readings can be skipped.
#[derive(Clone, Debug, Default)]
pub struct BoardMonitor {
    previous: Option<String>,
}

impl BoardMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the board text when it differs from the previous observation.
    pub fn observe(&mut self, reading: &BoardReading) -> Option<String> {
        let text = reading.to_string();
        if self.previous.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.previous = Some(text.clone());
        Some(text)
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}
