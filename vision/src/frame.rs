use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array3, s};

use crate::*;

/// One pixel in blue, green, red channel order.
pub type Bgr = [u8; 3];

/// A captured window region, `height x width x 3` in BGR order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pixels: Array3<u8>,
}

impl Frame {
    pub fn from_array(pixels: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = pixels.dim();
        if height == 0 || width == 0 || channels != 3 {
            return Err(VisionError::InvalidFrame {
                shape: [height, width, channels],
            });
        }
        Ok(Self { pixels })
    }

    pub fn filled(width: u32, height: u32, color: Bgr) -> Self {
        let pixels =
            Array3::from_shape_fn((height as usize, width as usize, 3), |(_, _, c)| color[c]);
        Self { pixels }
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let pixels = Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
            image.get_pixel(x as u32, y as u32)[2 - c]
        });
        Self::from_array(pixels)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let [b, g, r] = self.pixel(x, y);
            Rgb([r, g, b])
        })
    }

    /// Luma with the BT.601 weights.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let [b, g, r] = self.pixel(x, y);
            let luma = 0.114 * f32::from(b) + 0.587 * f32::from(g) + 0.299 * f32::from(r);
            Luma([luma.round().clamp(0.0, 255.0) as u8])
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Bgr {
        let (x, y) = (x as usize, y as usize);
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Bgr) {
        if x < self.width() && y < self.height() {
            let (x, y) = (x as usize, y as usize);
            for (c, &value) in color.iter().enumerate() {
                self.pixels[[y, x, c]] = value;
            }
        }
    }

    /// Fills a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Bgr) {
        let x0 = x.clamp(0, self.width().into()) as usize;
        let y0 = y.clamp(0, self.height().into()) as usize;
        let x1 = (x + i64::from(w)).clamp(0, self.width().into()) as usize;
        let y1 = (y + i64::from(h)).clamp(0, self.height().into()) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for (c, &value) in color.iter().enumerate() {
            self.pixels.slice_mut(s![y0..y1, x0..x1, c]).fill(value);
        }
    }

    /// Mean colour of `[x0, x1) x [y0, y1)` clipped to the frame, `None` when
    /// nothing is left after clipping.
    pub fn region_mean(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Option<[f64; 3]> {
        let x0 = x0.clamp(0, self.width().into()) as usize;
        let y0 = y0.clamp(0, self.height().into()) as usize;
        let x1 = x1.clamp(0, self.width().into()) as usize;
        let y1 = y1.clamp(0, self.height().into()) as usize;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        let region = self.pixels.slice(s![y0..y1, x0..x1, ..]);
        let count = ((x1 - x0) * (y1 - y0)) as f64;
        let mut sums = [0.0; 3];
        for ((_, _, c), &value) in region.indexed_iter() {
            sums[c] += f64::from(value);
        }
        Some(sums.map(|sum| sum / count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_channel_count() {
        let pixels = Array3::<u8>::zeros((4, 4, 4));
        assert_eq!(
            Frame::from_array(pixels),
            Err(VisionError::InvalidFrame { shape: [4, 4, 4] })
        );
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(Frame::from_array(Array3::<u8>::zeros((0, 4, 3))).is_err());
    }

    #[test]
    fn rgb_conversion_swaps_channels() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([10, 20, 30]));

        let frame = Frame::from_rgb_image(&image).unwrap();

        assert_eq!(frame.pixel(1, 0), [30, 20, 10]);
        assert_eq!(frame.to_rgb_image(), image);
    }

    #[test]
    fn gray_uses_bt601_weights() {
        let frame = Frame::filled(1, 1, [0, 0, 255]);
        assert_eq!(frame.to_gray().get_pixel(0, 0)[0], 76);
    }

    #[test]
    fn region_mean_is_clipped() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0]);
        frame.fill_rect(0, 0, 2, 2, [100, 50, 200]);

        assert_eq!(frame.region_mean(-5, -5, 2, 2), Some([100.0, 50.0, 200.0]));
        assert_eq!(frame.region_mean(0, 0, 4, 2), Some([50.0, 25.0, 100.0]));
        assert_eq!(frame.region_mean(10, 10, 12, 12), None);
    }
}
