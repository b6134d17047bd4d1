//! Edge pin identifiers and wire-level pin modes

use crate::error::ArgumentError;

/// Number of addressable edge pins
pub const PIN_COUNT: usize = 3;

// I/O status flags used as mode bytes on the wire
pub const MODE_DIGITAL_IN: u8 = 0x01;
pub const MODE_DIGITAL_OUT: u8 = 0x02;
pub const MODE_ANALOG_IN: u8 = 0x04;
pub const MODE_ANALOG_OUT: u8 = 0x08;

/// Largest value accepted for analog output and duty cycles
pub const ANALOG_MAX: u16 = 1023;

/// Analog value used for tone output (half scale)
pub const TONE_LEVEL: u16 = 512;

/// A validated edge pin (P0, P1 or P2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(u8);

impl PinId {
    pub const P0: PinId = PinId(0);
    pub const P1: PinId = PinId(1);
    pub const P2: PinId = PinId(2);

    /// All edge pins in ascending order
    pub const ALL: [PinId; PIN_COUNT] = [PinId::P0, PinId::P1, PinId::P2];

    /// Validate a raw pin number
    pub fn new(raw: u8) -> Result<Self, ArgumentError> {
        if (raw as usize) < PIN_COUNT {
            Ok(PinId(raw))
        } else {
            Err(ArgumentError::PinOutOfRange)
        }
    }

    /// Pin number as sent on the wire
    pub fn number(self) -> u8 {
        self.0
    }

    /// Index into per-pin tables
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pull resistor for digital inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None = 0,
    Down = 1,
    Up = 3,
}

impl Pull {
    /// Parse a pull mode from its wire value
    pub fn from_byte(byte: u8) -> Result<Self, ArgumentError> {
        match byte {
            0 => Ok(Pull::None),
            1 => Ok(Pull::Down),
            3 => Ok(Pull::Up),
            _ => Err(ArgumentError::PullMode),
        }
    }
}

/// Input configuration requested by configure-input-pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    Digital(Pull),
    Analog,
}

/// Output kind requested by set-pin-value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    Digital,
    Analog,
}

impl OutputMode {
    /// Parse an output mode byte
    pub fn from_byte(byte: u8) -> Result<Self, ArgumentError> {
        match byte {
            MODE_DIGITAL_OUT => Ok(OutputMode::Digital),
            MODE_ANALOG_OUT => Ok(OutputMode::Analog),
            _ => Err(ArgumentError::PinMode),
        }
    }
}
