//! Telemetry sampling task
//!
//! Ticks at the configured rate; the core sampler decides whether the host
//! is still active enough to be sent a frame.

use defmt::*;
use embassy_time::{Duration, Ticker};

use bitlink_core::{telemetry, DeviceState};

use crate::board::{BoardPins, CachedAccel};
use crate::channels::LinkSender;

#[embassy_executor::task]
pub async fn telemetry_task(state: &'static DeviceState, period_ms: u64) {
    info!(
        "Telemetry task started: every {} ms, window {} ticks",
        period_ms,
        state.telemetry.window()
    );

    let mut ticker = Ticker::every(Duration::from_millis(period_ms));
    let mut pins = BoardPins;
    let mut accel = CachedAccel;
    let mut link = LinkSender;

    loop {
        ticker.next().await;
        if telemetry::tick(state, &mut accel, &mut pins, &mut link) {
            trace!("Telemetry sent, {} left", state.telemetry.remaining());
        }
    }
}
