use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use serde::{Deserialize, Serialize};

use crate::*;

/// Axis-aligned bounding box of a detected cell, in frame pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CellBox {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn area(&self) -> u32 {
        self.w * self.h
    }

    pub const fn center(&self) -> (u32, u32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.w) / f64::from(self.h)
    }
}

/// Tunables for turning a frame into cell-sized boxes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Neighbourhood size of the adaptive threshold, odd.
    pub block_size: u32,
    /// Subtracted from the local mean before comparing.
    pub offset: f32,
    /// Passes of a 3x3 dilation over the threshold mask.
    pub dilate_iterations: u8,
    pub min_aspect: f64,
    pub max_aspect: f64,
    pub min_side: u32,
    pub max_side: u32,
    /// Allowed relative deviation from the median box area.
    pub area_tolerance: f64,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            offset: 2.0,
            dilate_iterations: 2,
            min_aspect: 0.5,
            max_aspect: 1.2,
            min_side: 20,
            max_side: 100,
            area_tolerance: 0.5,
        }
    }
}

impl SegmentParams {
    fn accepts_shape(&self, cell_box: &CellBox) -> bool {
        let aspect = cell_box.aspect_ratio();
        let side_range = self.min_side..=self.max_side;
        (self.min_aspect..=self.max_aspect).contains(&aspect)
            && side_range.contains(&cell_box.w)
            && side_range.contains(&cell_box.h)
    }
}

/// Intermediate and final products of one segmentation pass.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// Dilated, inverted threshold mask; borders are white.
    pub mask: GrayImage,
    /// Every contour bounding box before filtering.
    pub candidates: Vec<CellBox>,
    pub cells: Vec<CellBox>,
}

/// Inverted binary threshold against a Gaussian-weighted local mean.
pub fn adaptive_threshold(gray: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let sigma = 0.3 * ((block_size.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let local_mean = gaussian_blur_f32(gray, sigma);

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = f32::from(gray.get_pixel(x, y)[0]);
        let threshold = f32::from(local_mean.get_pixel(x, y)[0]) - offset;
        if value > threshold { Luma([0]) } else { Luma([255]) }
    })
}

pub fn dilate_mask(mask: &GrayImage, iterations: u8) -> GrayImage {
    let mut mask = mask.clone();
    for _ in 0..iterations {
        mask = dilate(&mask, Norm::LInf, 1);
    }
    mask
}

/// Bounding boxes of every outer and hole border in the mask.
pub fn contour_boxes(mask: &GrayImage) -> Vec<CellBox> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter_map(|contour| {
            let xs = contour.points.iter().map(|point| point.x);
            let ys = contour.points.iter().map(|point| point.y);
            let (min_x, max_x) = (xs.clone().min()?, xs.max()?);
            let (min_y, max_y) = (ys.clone().min()?, ys.max()?);
            Some(CellBox::new(
                min_x as u32,
                min_y as u32,
                (max_x - min_x + 1) as u32,
                (max_y - min_y + 1) as u32,
            ))
        })
        .collect()
}

/// Keeps square-ish, cell-sized boxes whose area is close to the median.
pub fn filter_cells(candidates: &[CellBox], params: &SegmentParams) -> Vec<CellBox> {
    let shaped: Vec<CellBox> = candidates
        .iter()
        .copied()
        .filter(|cell_box| params.accepts_shape(cell_box))
        .collect();

    let mut areas: Vec<u32> = shaped.iter().map(CellBox::area).collect();
    if areas.is_empty() {
        return shaped;
    }
    areas.sort_unstable();
    let median = f64::from(areas[areas.len() / 2]);
    let lower = (1.0 - params.area_tolerance) * median;
    let upper = (1.0 + params.area_tolerance) * median;

    shaped
        .into_iter()
        .filter(|cell_box| (lower..=upper).contains(&f64::from(cell_box.area())))
        .collect()
}

pub fn segment(frame: &Frame, params: &SegmentParams) -> Segmentation {
    let gray = frame.to_gray();
    let threshold = adaptive_threshold(&gray, params.block_size, params.offset);
    let mask = dilate_mask(&threshold, params.dilate_iterations);
    let candidates = contour_boxes(&mask);
    let cells = filter_cells(&candidates, params);
    log::debug!(
        "Detected {} potential cells out of {} contours",
        cells.len(),
        candidates.len()
    );

    Segmentation {
        mask,
        candidates,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn synthetic_grid_yields_nine_cells() {
        let frame = synthetic_grid(3, 3, 40);

        let segmentation = segment(&frame, &SegmentParams::default());

        assert_eq!(segmentation.cells.len(), 9);
        for cell in &segmentation.cells {
            assert_eq!(cell.w, cell.h);
            assert!((20..=40).contains(&cell.w));
        }
    }

    #[test]
    fn threshold_marks_dark_borders() {
        let frame = synthetic_grid(1, 1, 40);
        let mask = adaptive_threshold(&frame.to_gray(), 11, 2.0);

        assert_eq!(mask.get_pixel(MARGIN, MARGIN + 20)[0], 255);
        assert_eq!(mask.get_pixel(MARGIN + 20, MARGIN + 20)[0], 0);
        assert_eq!(mask.get_pixel(2, 2)[0], 0);
    }

    #[test]
    fn dilation_grows_foreground() {
        let mut mask = GrayImage::new(9, 9);
        mask.put_pixel(4, 4, Luma([255]));

        let dilated = dilate_mask(&mask, 2);

        assert_eq!(dilated.get_pixel(2, 2)[0], 255);
        assert_eq!(dilated.get_pixel(6, 6)[0], 255);
        assert_eq!(dilated.get_pixel(1, 4)[0], 0);
    }

    #[test]
    fn filter_rejects_glyphs_and_outliers() {
        let candidates = [
            CellBox::new(0, 0, 34, 34),
            CellBox::new(40, 0, 34, 34),
            CellBox::new(80, 0, 34, 34),
            // text glyph
            CellBox::new(10, 10, 8, 12),
            // too wide
            CellBox::new(0, 0, 60, 30),
            // whole board
            CellBox::new(0, 0, 124, 124),
            // merged pair, square but far above the median area
            CellBox::new(0, 50, 70, 70),
        ];

        let cells = filter_cells(&candidates, &SegmentParams::default());

        assert_eq!(cells, candidates[..3].to_vec());
    }

    #[test]
    fn blank_frame_has_no_cells() {
        let frame = Frame::filled(120, 120, [230, 230, 230]);
        let segmentation = segment(&frame, &SegmentParams::default());
        assert!(segmentation.cells.is_empty());
    }
}
