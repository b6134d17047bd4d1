//! Board-agnostic core logic for the bitlink firmware
//!
//! This crate contains everything between the serial line and the hardware
//! that does not depend on a specific board:
//!
//! - Hardware abstraction traits (LED display, edge pins, accelerometer, link)
//! - Line assembly and command dispatch with argument validation
//! - Per-resource busy leases for display and tone jobs
//! - Deferred display and tone jobs
//! - Event emitters and the throttled telemetry sampler
//! - Gesture detection
//! - Device configuration parsing

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod busy;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod emit;
pub mod error;
pub mod gesture;
pub mod jobs;
pub mod line;
pub mod pin;
pub mod state;
pub mod telemetry;
pub mod traits;

pub use busy::{BusyRegistry, Lease};
pub use dispatch::Dispatcher;
pub use error::{ArgumentError, CommandError};
pub use jobs::{DisplayJob, Job, ToneJob};
pub use line::{Line, LineBuffer};
pub use pin::{PinId, Pull};
pub use state::DeviceState;
