//! bitlink wire protocol
//!
//! This crate defines the line protocol spoken between the host programming
//! environment and the bitlink board. Every frame is a single line of
//! printable ASCII terminated by `\n`:
//!
//! ```text
//! ┌─────┬───┬─────────┬───┬─────────┬───┬─────┬────┐
//! │ TAG │ | │ FIELD 1 │ | │ FIELD 2 │ | │ ... │ \n │
//! │ 1B  │   │ hex/raw │   │ hex/raw │   │     │    │
//! └─────┴───┴─────────┴───┴─────────┴───┴─────┴────┘
//! ```
//!
//! Integers travel as uppercase hex digits (most significant byte first),
//! strings as a hex length byte followed by the raw characters, and 5×5
//! images as five base-36 row characters. Every field is closed by `|`.
//!
//! Commands (host → board) use uppercase tags, events (board → host) use
//! lowercase tags.

#![no_std]
#![deny(unsafe_code)]

pub mod ascii;
pub mod events;
pub mod image;
pub mod message;
pub mod tags;

pub use events::{ButtonId, ButtonState, DeviceEvent, Gesture, PinKind, PinSample, TelemetrySample};
pub use image::{Image, IMAGE_SIZE};
pub use message::{Message, OwnedMessage, ParseError, WriteError, MAX_FRAME_LEN, SEPARATOR, TERMINATOR};
pub use tags::CommandTag;

/// Protocol revision reported in ping replies
pub const PROTOCOL_VERSION: u8 = 4;
