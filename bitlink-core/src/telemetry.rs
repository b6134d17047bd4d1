//! Throttled telemetry sampler
//!
//! Telemetry is only sent while the host is active. Every inbound command
//! re-arms a window of N ticks; each transmitted tick uses one up. Once the
//! window is exhausted the sampler stays quiet until the next command.

use portable_atomic::{AtomicU16, Ordering};

use bitlink_protocol::{DeviceEvent, TelemetrySample};

use crate::emit;
use crate::pin::PinId;
use crate::state::DeviceState;
use crate::traits::{Accelerometer, EdgePins, FrameSink};

/// Remaining telemetry ticks in the activity window
pub struct TelemetryWindow {
    remaining: AtomicU16,
    window: u16,
}

impl TelemetryWindow {
    /// A closed window that opens for `window` ticks when re-armed
    pub const fn new(window: u16) -> Self {
        Self {
            remaining: AtomicU16::new(0),
            window,
        }
    }

    /// Open the window for a full period
    pub fn rearm(&self) {
        self.remaining.store(self.window, Ordering::Relaxed);
    }

    /// Consume one tick; returns false once the window is closed
    pub fn take_tick(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> u16 {
        self.remaining.load(Ordering::Relaxed)
    }

    pub fn window(&self) -> u16 {
        self.window
    }
}

/// Take a telemetry snapshot
///
/// An accelerometer failure reports zeros; pins that fail to read are
/// left out.
pub fn capture<A: Accelerometer, P: EdgePins>(
    state: &DeviceState,
    accel: &mut A,
    pins: &mut P,
) -> TelemetrySample {
    let accel = match accel.read() {
        Ok(sample) => sample.axes(),
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("accelerometer read failed: {}", _e);
            [0; 3]
        }
    };

    let mut sample = TelemetrySample {
        buttons: state.buttons.snapshot(),
        accel,
        pins: heapless::Vec::new(),
    };
    for pin in PinId::ALL {
        if let Some(reading) = pins.sample(pin) {
            // Capacity equals the pin count
            let _ = sample.pins.push(reading);
        }
    }
    sample
}

/// Run one sampler tick
///
/// Returns true if a telemetry frame was sent.
pub fn tick<A, P, L>(state: &DeviceState, accel: &mut A, pins: &mut P, link: &mut L) -> bool
where
    A: Accelerometer,
    P: EdgePins,
    L: FrameSink,
{
    if !state.telemetry.take_tick() {
        return false;
    }
    let sample = capture(state, accel, pins);
    emit::send(link, DeviceEvent::Telemetry(&sample));
    true
}
