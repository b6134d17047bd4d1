//! Inter-task communication channels
//!
//! Every task that emits events owns a [`LinkSender`]; the serial TX task is
//! the only writer on the UART and drains [`TX_CHANNEL`] in order.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use bitlink_core::traits::{FrameSink, LinkError};
use bitlink_protocol::MAX_FRAME_LEN;

/// One outbound line including the terminator
pub type Frame = Vec<u8, { MAX_FRAME_LEN + 1 }>;

/// Channel capacity for outbound frames
const TX_CHANNEL_SIZE: usize = 16;

/// Outbound frames waiting for the UART
pub static TX_CHANNEL: Channel<CriticalSectionRawMutex, Frame, TX_CHANNEL_SIZE> = Channel::new();

/// Queues frames on [`TX_CHANNEL`] without waiting
///
/// A full queue drops the frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkSender;

impl FrameSink for LinkSender {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let frame = Frame::from_slice(frame).map_err(|_| LinkError::FrameTooLong)?;
        TX_CHANNEL.try_send(frame).map_err(|_| LinkError::QueueFull)
    }
}
