use serde::{Deserialize, Serialize};

use crate::*;

/// Detected boxes arranged into rows, top to bottom, each row left to right.
///
/// The arrangement approximates the logical board layout; nothing guarantees
/// that every row has the same length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedGrid {
    rows: Vec<Vec<CellBox>>,
}

impl DetectedGrid {
    /// Groups boxes into rows. A box opens a new row when its top edge is more
    /// than `tolerance` times the row's first box height away from that box.
    pub fn organize(cells: &[CellBox], tolerance: f64) -> Self {
        let mut sorted = cells.to_vec();
        sorted.sort_by_key(|cell| cell.y);

        let mut rows: Vec<Vec<CellBox>> = Vec::new();
        for cell in sorted {
            match rows.last_mut() {
                Some(row) if row_accepts(row[0], cell, tolerance) => row.push(cell),
                _ => rows.push(vec![cell]),
            }
        }

        for row in &mut rows {
            row.sort_by_key(|cell| cell.x);
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellBox>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether every row has the same number of boxes.
    pub fn is_rectangular(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|first| self.rows.iter().all(|row| row.len() == first.len()))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), CellBox)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_idx, row)| {
            row.iter()
                .enumerate()
                .map(move |(col_idx, &cell)| ((row_idx, col_idx), cell))
        })
    }
}

fn row_accepts(first: CellBox, cell: CellBox, tolerance: f64) -> bool {
    f64::from(cell.y.abs_diff(first.y)) <= f64::from(first.h) * tolerance
}
