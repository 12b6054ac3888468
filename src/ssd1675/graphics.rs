//! Frame buffer with embedded-graphics support
//!
//! One bit per pixel, row-major with rows padded to whole bytes, MSB first.
//! A set bit is a white pixel, matching what the controller expects in its
//! black/white RAM.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Computes the needed buffer length. Takes care of rounding up in case
/// width is not divisible by 8.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}

/// A 1-bit-per-pixel bitmap, created all white.
///
/// Implements [`DrawTarget`] so text and primitives from
/// `embedded-graphics` render straight into the packed buffer.
pub struct Frame {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Frame {
    /// Create an all-white frame of the given pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Frame {
            width,
            height,
            buffer: vec![0xFF; buffer_len(width as usize, height as usize)],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packed pixel data, `(width + 7) / 8 * height` bytes
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn byte_and_mask(&self, x: u32, y: u32) -> (usize, u8) {
        let bytes_per_row = (self.width as usize + 7) / 8;
        let index = y as usize * bytes_per_row + x as usize / 8;
        let mask = 0x80 >> (x % 8);
        (index, mask)
    }

    /// Set one pixel; coordinates outside the frame are discarded
    pub fn set(&mut self, x: u32, y: u32, color: BinaryColor) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (index, mask) = self.byte_and_mask(x, y);
        match color {
            // On is black ink, a cleared bit in RAM
            BinaryColor::On => self.buffer[index] &= !mask,
            BinaryColor::Off => self.buffer[index] |= mask,
        }
    }

    /// Read one pixel
    pub fn get(&self, x: u32, y: u32) -> BinaryColor {
        let (index, mask) = self.byte_and_mask(x, y);
        if self.buffer[index] & mask != 0 {
            BinaryColor::Off
        } else {
            BinaryColor::On
        }
    }

    /// Rotate a quarter turn clockwise into a new frame.
    ///
    /// A black pixel at `(x, y)` in a frame of height `H` lands at
    /// `(H - y - 1, x)` in the output, whose dimensions are the transpose
    /// of the input. Only black pixels are copied; the output starts all
    /// white like any fresh frame.
    pub fn rotated(&self) -> Frame {
        let mut out = Frame::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) == BinaryColor::On {
                    out.set(self.height - y - 1, x, BinaryColor::On);
                }
            }
        }
        out
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_frame_is_white() {
        let frame = Frame::new(10, 4);
        assert_eq!(frame.buffer().len(), buffer_len(10, 4));
        assert!(frame.buffer().iter().all(|&b| b == 0xFF));
        assert_eq!(frame.get(3, 2), BinaryColor::Off);
    }

    #[test]
    fn rows_are_padded_and_msb_first() {
        let mut frame = Frame::new(10, 2);
        // 10 px wide -> 2 bytes per row
        assert_eq!(frame.buffer().len(), 4);

        frame.set(0, 0, BinaryColor::On);
        assert_eq!(frame.buffer()[0], 0x7F);

        frame.set(9, 1, BinaryColor::On);
        assert_eq!(frame.buffer()[3], 0xFF & !0x40);
    }

    #[test]
    fn set_outside_bounds_is_discarded() {
        let mut frame = Frame::new(8, 8);
        frame.set(8, 0, BinaryColor::On);
        frame.set(0, 8, BinaryColor::On);
        assert!(frame.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn draw_target_ignores_negative_points() {
        let mut frame = Frame::new(8, 8);
        frame
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::On),
                Pixel(Point::new(0, -3), BinaryColor::On),
                Pixel(Point::new(2, 2), BinaryColor::On),
            ])
            .unwrap();
        assert_eq!(frame.get(2, 2), BinaryColor::On);
        let black = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get(x, y) == BinaryColor::On)
            .count();
        assert_eq!(black, 1);
    }

    #[test]
    fn rotation_transposes_dimensions() {
        let frame = Frame::new(250, 122);
        let rotated = frame.rotated();
        assert_eq!(rotated.width(), 122);
        assert_eq!(rotated.height(), 250);
    }

    #[test]
    fn rotation_maps_every_pixel() {
        let width = 7;
        let height = 5;
        let mut frame = Frame::new(width, height);
        frame.set(0, 0, BinaryColor::On);
        frame.set(width - 1, 0, BinaryColor::On);
        frame.set(0, height - 1, BinaryColor::On);
        frame.set(width - 1, height - 1, BinaryColor::On);
        frame.set(3, 2, BinaryColor::On);

        let rotated = frame.rotated();
        for y in 0..height {
            for x in 0..width {
                assert_eq!(
                    rotated.get(height - y - 1, x),
                    frame.get(x, y),
                    "mismatch for source pixel ({}, {})",
                    x,
                    y
                );
            }
        }
        // corners spelled out: top-left ends up rightmost on the first row
        assert_eq!(rotated.get(height - 1, 0), BinaryColor::On);
        assert_eq!(rotated.get(0, width - 1), BinaryColor::On);
    }
}
