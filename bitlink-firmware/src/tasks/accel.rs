//! Accelerometer task
//!
//! Samples the LIS3DH at 50 Hz, publishes the latest reading for telemetry
//! and forwards detected gestures.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};

use bitlink_core::emit;
use bitlink_core::gesture::GestureTracker;

use crate::board::accel::{self, Lis3dh};
use crate::channels::LinkSender;

const SAMPLE_PERIOD: Duration = Duration::from_millis(20);

pub type BoardAccel = Lis3dh<I2c<'static, I2C0, Async>>;

#[embassy_executor::task]
pub async fn accel_task(mut sensor: BoardAccel) {
    if let Err(e) = sensor.init().await {
        error!("Accelerometer init failed: {:?}", e);
        return;
    }
    info!("Accelerometer task started");

    let mut tracker = GestureTracker::new();
    let mut ticker = Ticker::every(SAMPLE_PERIOD);
    let mut link = LinkSender;

    loop {
        ticker.next().await;
        match sensor.read().await {
            Ok(sample) => {
                accel::publish(Some(sample));
                for gesture in tracker.update(sample) {
                    debug!("Gesture: {}", gesture);
                    emit::gesture(&mut link, gesture);
                }
            }
            Err(e) => {
                warn!("Accelerometer read failed: {:?}", e);
                accel::publish(None);
            }
        }
    }
}
