//! Outbound serial link trait

/// Errors that can occur when queueing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Transmit queue is full; the frame was dropped
    QueueFull,
    /// Frame exceeds the transmit buffer
    FrameTooLong,
}

/// Trait for the transmit side of the serial link
///
/// `send` never blocks. Frames are complete lines including the terminator.
pub trait FrameSink {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError>;
}
