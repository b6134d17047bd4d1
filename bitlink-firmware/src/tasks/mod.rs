//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels and the shared
//! device state.

pub mod accel;
pub mod banner;
pub mod buttons;
pub mod jobs;
pub mod serial_rx;
pub mod serial_tx;
pub mod telemetry;

pub use accel::accel_task;
pub use banner::banner_task;
pub use buttons::button_task;
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
pub use telemetry::telemetry_task;
