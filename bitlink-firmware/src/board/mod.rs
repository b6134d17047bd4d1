//! Board support: LED matrix, edge pins and accelerometer
//!
//! Every collaborator the dispatcher and jobs talk to is a zero-sized handle
//! over statically allocated state, so each task can hold its own copy.
//!
//! Pin assignments:
//! - UART0: TX GPIO0, RX GPIO1
//! - LED rows: GPIO2-6, LED columns: GPIO7-11
//! - Buttons: A GPIO14, B GPIO15 (active low)
//! - I²C0 accelerometer: SDA GPIO20, SCL GPIO21
//! - Edge pins: P0 GPIO26, P1 GPIO27, P2 GPIO28

pub mod accel;
pub mod font;
pub mod matrix;
pub mod pins;

pub use accel::{CachedAccel, Lis3dh};
pub use matrix::LedMatrix;
pub use pins::BoardPins;
