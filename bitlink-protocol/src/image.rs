//! 5×5 LED images

use crate::ascii::base36_value;

/// Width and height of the LED matrix
pub const IMAGE_SIZE: usize = 5;

/// Brightness used for lit pixels decoded from the wire
pub const PIXEL_ON: u8 = 255;

/// A 5×5 greyscale image, indexed `pixels[y][x]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Image {
    pub pixels: [[u8; IMAGE_SIZE]; IMAGE_SIZE],
}

impl Image {
    /// All pixels off
    pub const fn blank() -> Self {
        Self {
            pixels: [[0; IMAGE_SIZE]; IMAGE_SIZE],
        }
    }

    /// Decode five base-36 row characters
    ///
    /// Bit `x` of each row value lights column `4 - x`, so bit 4 is the
    /// leftmost pixel. Characters outside the base-36 alphabet leave their
    /// row dark.
    pub fn from_packed_rows(rows: &[u8; IMAGE_SIZE]) -> Self {
        Self::from_row_bits(&rows.map(|c| base36_value(c).unwrap_or(0)))
    }

    /// Light the pixels of five row bitmasks (bit 4 = leftmost)
    pub fn from_row_bits(rows: &[u8; IMAGE_SIZE]) -> Self {
        let mut image = Self::blank();
        for (y, &bits) in rows.iter().enumerate() {
            for x in 0..IMAGE_SIZE {
                if bits & (1 << x) != 0 {
                    image.pixels[y][IMAGE_SIZE - 1 - x] = PIXEL_ON;
                }
            }
        }
        image
    }

    /// Brightness at column `x`, row `y` (0 when out of range)
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// Set one pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        if let Some(p) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *p = value;
        }
    }

    /// Row `y` packed back into five bits (bit 4 = leftmost), lit if non-zero
    pub fn row_bits(&self, y: usize) -> u8 {
        let mut bits = 0;
        for x in 0..IMAGE_SIZE {
            if self.pixel(x, y) != 0 {
                bits |= 1 << (IMAGE_SIZE - 1 - x);
            }
        }
        bits
    }

    /// Returns true if no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().flatten().all(|&p| p == 0)
    }
}
