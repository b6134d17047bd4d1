//! Edge pin trait

use bitlink_protocol::{PinKind, PinSample};

use crate::pin::{PinId, Pull};

/// Errors that can occur on an edge pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin is not configured as an input
    NotInput,
    /// Pin driver did not accept the request
    Unavailable,
    /// ADC conversion failed
    Conversion,
}

/// Trait for the three edge pins
///
/// Outputs are analog (0-1023 duty over a configurable period), digital, or
/// servo. Inputs are configured explicitly and then sampled by telemetry.
pub trait EdgePins {
    /// Drive a digital output
    fn set_digital(&mut self, pin: PinId, high: bool) -> Result<(), PinError>;

    /// Drive an analog (PWM) output, 0-1023
    fn set_analog(&mut self, pin: PinId, value: u16) -> Result<(), PinError>;

    /// Change the analog output period in microseconds
    fn set_analog_period_us(&mut self, pin: PinId, period_us: u32) -> Result<(), PinError>;

    /// Drive a servo signal
    fn set_servo(&mut self, pin: PinId, value: u16) -> Result<(), PinError>;

    /// Make the pin a digital input with the given pull resistor
    fn configure_digital_input(&mut self, pin: PinId, pull: Pull) -> Result<(), PinError>;

    /// Make the pin an analog input
    fn configure_analog_input(&mut self, pin: PinId) -> Result<(), PinError>;

    /// Current input configuration, `None` for outputs
    fn input_kind(&self, pin: PinId) -> Option<PinKind>;

    /// Read a digital input (0 or 1)
    fn read_digital(&mut self, pin: PinId) -> Result<u16, PinError>;

    /// Read an analog input (0-1023)
    fn read_analog(&mut self, pin: PinId) -> Result<u16, PinError>;

    /// Sample a pin if it is configured as an input
    fn sample(&mut self, pin: PinId) -> Option<PinSample> {
        let kind = self.input_kind(pin)?;
        let value = match kind {
            PinKind::Digital => self.read_digital(pin),
            PinKind::Analog => self.read_analog(pin),
        }
        .ok()?;
        Some(PinSample {
            pin: pin.number(),
            kind,
            value,
        })
    }
}
