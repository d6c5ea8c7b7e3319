use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Packed 1-bit image in the badge's native layout: rows top to bottom,
/// MSB is the leftmost pixel, a set bit is white paper and a clear bit is
/// black ink. Rows are padded to whole bytes.
///
/// As a draw target `BinaryColor::On` is ink and `BinaryColor::Off` paper.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// A blank (all paper) bitmap.
    pub fn new(width: u32, height: u32) -> Bitmap {
        let len = Bitmap::stride_for(width) * height as usize;
        Bitmap {
            width,
            height,
            data: vec![0xff; len],
        }
    }

    /// Wraps already packed bytes; `None` if the length does not match.
    pub fn from_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Bitmap> {
        (data.len() == Bitmap::stride_for(width) * height as usize).then_some(Bitmap {
            width,
            height,
            data,
        })
    }

    pub fn stride_for(width: u32) -> usize {
        width.div_ceil(8) as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * Bitmap::stride_for(self.width) + (x / 8) as usize;
        Some((index, 0x80 >> (x % 8)))
    }

    /// `true` for black ink, `false` for paper or out of bounds.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.locate(x, y).is_some_and(|(index, mask)| self.data[index] & mask == 0)
    }

    pub fn set_ink(&mut self, x: u32, y: u32, ink: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if ink {
                self.data[index] &= !mask;
            } else {
                self.data[index] |= mask;
            }
        }
    }

    /// Number of ink pixels inside a rectangle.
    pub fn ink_in(&self, x: u32, y: u32, width: u32, height: u32) -> usize {
        (y..y + height)
            .flat_map(|py| (x..x + width).map(move |px| (px, py)))
            .filter(|&(px, py)| self.is_ink(px, py))
            .count()
    }

    /// Binary PBM (P4). PBM uses 1 for black, so the bits are flipped.
    pub fn to_pbm(&self) -> Vec<u8> {
        let mut out = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        out.extend(self.data.iter().map(|b| !b));
        out
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ink", &self.ink_in(0, 0, self.width, self.height))
            .finish()
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_ink(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
