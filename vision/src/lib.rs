//! Best-effort reconstruction of a Minesweeper board from a rendered frame.
//!
//! The pipeline never looks at game state: it segments the frame into
//! cell-sized boxes, arranges them into rows and classifies each box from the
//! colour sampled at its centre.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classify::*;
pub use frame::*;
pub use grid::*;
pub use overlay::*;
pub use reading::*;
pub use segment::*;

mod classify;
mod frame;
mod grid;
mod overlay;
mod reading;
mod segment;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisionError {
    #[error("Frame must be height x width x 3, got {shape:?}")]
    InvalidFrame { shape: [usize; 3] },
}

pub type Result<T> = core::result::Result<T, VisionError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub segment: SegmentParams,
    /// Fraction of a cell height two boxes may differ in `y` and share a row.
    pub row_tolerance: f64,
    pub classify: ClassifyParams,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            segment: SegmentParams::default(),
            row_tolerance: 0.5,
            classify: ClassifyParams::default(),
        }
    }
}

/// Everything one reconstruction pass produced, kept for debug artifacts.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub segmentation: Segmentation,
    pub grid: DetectedGrid,
    pub reading: BoardReading,
}

pub fn reconstruct(frame: &Frame, config: &VisionConfig) -> Reconstruction {
    let segmentation = segment(frame, &config.segment);
    if segmentation.cells.is_empty() {
        log::warn!("No cell-sized contours found in {}x{} frame", frame.width(), frame.height());
    }

    let grid = DetectedGrid::organize(&segmentation.cells, config.row_tolerance);
    if !grid.is_empty() && !grid.is_rectangular() {
        log::debug!("Detected rows differ in length: {:?}", grid.rows().iter().map(Vec::len).collect::<Vec<_>>());
    }

    let reading = classify_grid(frame, &grid, &config.classify);
    Reconstruction {
        segmentation,
        grid,
        reading,
    }
}
