//! Row/column scanned 5×5 LED matrix
//!
//! The frame buffer lives in a blocking mutex shared by every [`LedMatrix`]
//! handle. [`matrix_scan_task`] walks the rows continuously: a row is driven
//! high while the columns of its lit pixels are pulled low. Global brightness
//! sets the on-time of each row slot, and within that slot four phases give
//! pixels four grey levels.

use core::cell::RefCell;

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;

use bitlink_core::traits::{DisplayError, LedDisplay};
use bitlink_protocol::image::PIXEL_ON;
use bitlink_protocol::{Image, IMAGE_SIZE};

use super::font;

/// Time each row is given per scan, lit or not
const ROW_US: u64 = 2_000;

/// Grey levels per pixel
const LEVELS: u64 = 4;

type Pixels = [[u8; IMAGE_SIZE]; IMAGE_SIZE];

struct FrameBuffer {
    pixels: Pixels,
    brightness: u8,
}

static FRAME: Mutex<CriticalSectionRawMutex, RefCell<FrameBuffer>> =
    Mutex::new(RefCell::new(FrameBuffer {
        pixels: [[0; IMAGE_SIZE]; IMAGE_SIZE],
        brightness: 255,
    }));

fn update(f: impl FnOnce(&mut FrameBuffer)) {
    FRAME.lock(|frame| f(&mut frame.borrow_mut()));
}

fn show(pixels: Pixels) {
    update(|frame| frame.pixels = pixels);
}

/// Handle to the shared LED matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct LedMatrix;

impl LedDisplay for LedMatrix {
    fn clear(&mut self) -> Result<(), DisplayError> {
        show([[0; IMAGE_SIZE]; IMAGE_SIZE]);
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        update(|frame| frame.brightness = level);
        Ok(())
    }

    fn set_pixel(&mut self, x: u8, y: u8, value: u8) -> Result<(), DisplayError> {
        let (x, y) = (x as usize, y as usize);
        if x >= IMAGE_SIZE || y >= IMAGE_SIZE {
            return Err(DisplayError::OutOfBounds);
        }
        update(|frame| frame.pixels[y][x] = value);
        Ok(())
    }

    async fn scroll_image(&mut self, image: &Image, delay_ms: u16) -> Result<(), DisplayError> {
        // The image enters from the right and leaves on the left
        let width = IMAGE_SIZE as i32;
        for offset in (-width..=width).rev() {
            let mut pixels = [[0; IMAGE_SIZE]; IMAGE_SIZE];
            for (y, row) in pixels.iter_mut().enumerate() {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let src = x as i32 - offset;
                    if (0..width).contains(&src) {
                        *pixel = image.pixel(src as usize, y);
                    }
                }
            }
            show(pixels);
            Timer::after_millis(delay_ms as u64).await;
        }
        Ok(())
    }

    async fn print_image(&mut self, image: &Image, duration_ms: u16) -> Result<(), DisplayError> {
        show(image.pixels);
        if duration_ms > 0 {
            Timer::after_millis(duration_ms as u64).await;
        }
        Ok(())
    }

    async fn scroll_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError> {
        font::check(text)?;
        let columns = text.len() * font::CELL_WIDTH;
        for step in 0..=columns + IMAGE_SIZE {
            let mut pixels = [[0; IMAGE_SIZE]; IMAGE_SIZE];
            for x in 0..IMAGE_SIZE {
                // Text starts just off the right edge
                let Some(column) = (step + x).checked_sub(IMAGE_SIZE) else {
                    continue;
                };
                let mask = font::strip_column(text, column);
                for (y, row) in pixels.iter_mut().enumerate() {
                    if mask & (1 << y) != 0 {
                        row[x] = PIXEL_ON;
                    }
                }
            }
            show(pixels);
            Timer::after_millis(delay_ms as u64).await;
        }
        Ok(())
    }

    async fn print_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError> {
        font::check(text)?;
        for &c in text {
            show(Image::from_row_bits(font::glyph(c)?).pixels);
            Timer::after_millis(delay_ms as u64).await;
        }
        Ok(())
    }
}

/// Multiplex the matrix forever
#[embassy_executor::task]
pub async fn matrix_scan_task(mut rows: [Output<'static>; 5], mut cols: [Output<'static>; 5]) {
    info!("Matrix scan task started");

    loop {
        for (y, row) in rows.iter_mut().enumerate() {
            let (pixels, brightness) = FRAME.lock(|frame| {
                let frame = frame.borrow();
                (frame.pixels[y], frame.brightness)
            });
            let phase_us = ROW_US * brightness as u64 / 255 / LEVELS;

            if phase_us > 0 {
                row.set_high();
                for level in 0..LEVELS {
                    let threshold = (level * 256 / LEVELS) as u8;
                    for (col, &value) in cols.iter_mut().zip(pixels.iter()) {
                        col.set_level(if value > threshold { Level::Low } else { Level::High });
                    }
                    Timer::after_micros(phase_us).await;
                }
                for col in cols.iter_mut() {
                    col.set_high();
                }
                row.set_low();
            }

            Timer::after_micros(ROW_US - phase_us * LEVELS).await;
        }
    }
}
