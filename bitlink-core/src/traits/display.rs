//! LED matrix trait

use bitlink_protocol::Image;

/// Errors that can occur while driving the LED matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Pixel coordinate outside the 5×5 matrix
    OutOfBounds,
    /// Character has no glyph in the font
    UnsupportedGlyph,
    /// Matrix driver is not ready
    NotReady,
}

/// Trait for the 5×5 LED matrix
///
/// The synchronous operations take effect immediately. The animations are
/// async and return once the animation has finished, so a job awaiting them
/// yields to the executor between frames.
#[allow(async_fn_in_trait)]
pub trait LedDisplay {
    /// Turn every pixel off
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Set the global brightness (0-255)
    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Set one pixel's brightness
    fn set_pixel(&mut self, x: u8, y: u8, value: u8) -> Result<(), DisplayError>;

    /// Scroll an image in from the right, `delay_ms` per column step
    async fn scroll_image(&mut self, image: &Image, delay_ms: u16) -> Result<(), DisplayError>;

    /// Show an image for `duration_ms`
    ///
    /// With a zero duration the image is left on screen and the call returns
    /// immediately.
    async fn print_image(&mut self, image: &Image, duration_ms: u16) -> Result<(), DisplayError>;

    /// Scroll text across the matrix, `delay_ms` per column step
    async fn scroll_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError>;

    /// Show text one character at a time, `delay_ms` per character
    async fn print_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError>;
}
