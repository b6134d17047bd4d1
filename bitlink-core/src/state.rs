//! Device-wide shared state
//!
//! Everything the dispatcher, deferred jobs and event tasks share lives in
//! one [`DeviceState`]. The firmware keeps it in a `StaticCell`; tests build
//! one on the stack.

use portable_atomic::{AtomicU8, Ordering};

use bitlink_protocol::{ButtonId, ButtonState};

use crate::busy::BusyRegistry;
use crate::telemetry::TelemetryWindow;

/// Last reported state of each push button
pub struct ButtonCache {
    states: [AtomicU8; 2],
}

const BUTTON_UP: u8 = ButtonState::Up as u8;

impl ButtonCache {
    pub const fn new() -> Self {
        Self {
            states: [AtomicU8::new(BUTTON_UP), AtomicU8::new(BUTTON_UP)],
        }
    }

    pub fn record(&self, id: ButtonId, state: ButtonState) {
        self.states[id.index()].store(state.to_byte(), Ordering::Relaxed);
    }

    pub fn get(&self, id: ButtonId) -> u8 {
        self.states[id.index()].load(Ordering::Relaxed)
    }

    /// States of buttons A and B
    pub fn snapshot(&self) -> [u8; 2] {
        [self.get(ButtonId::A), self.get(ButtonId::B)]
    }

    /// Both buttons back to "up"
    pub fn reset(&self) {
        for state in &self.states {
            state.store(BUTTON_UP, Ordering::Relaxed);
        }
    }
}

impl Default for ButtonCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared mutable state of the device
pub struct DeviceState {
    pub busy: BusyRegistry,
    pub buttons: ButtonCache,
    pub telemetry: TelemetryWindow,
}

impl DeviceState {
    /// Create the state with a telemetry window of `window_ticks` samples
    pub const fn new(window_ticks: u16) -> Self {
        Self {
            busy: BusyRegistry::new(),
            buttons: ButtonCache::new(),
            telemetry: TelemetryWindow::new(window_ticks),
        }
    }
}
