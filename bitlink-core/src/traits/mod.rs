//! Hardware abstraction traits
//!
//! These traits define the interface between the command logic and the
//! board-specific drivers.

pub mod display;
pub mod link;
pub mod pins;
pub mod sensor;

pub use display::{DisplayError, LedDisplay};
pub use link::{FrameSink, LinkError};
pub use pins::{EdgePins, PinError};
pub use sensor::{AccelSample, Accelerometer, SensorError};
