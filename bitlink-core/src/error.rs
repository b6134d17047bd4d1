//! Command error taxonomy
//!
//! Every error is local to the frame that caused it and is reported back to
//! the host as a diagnostic event. Nothing here is fatal.

use bitlink_protocol::ParseError;

/// Why a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// A field failed to parse
    Parse(ParseError),
    /// Fields parsed but a value is out of range
    Argument(ArgumentError),
    /// A display job is still running
    DisplayBusy,
    /// A tone job is still running on the requested pin
    PinBusy,
    /// Unrecognised command tag
    Unknown,
}

/// Violated argument constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    PinOutOfRange,
    PinMode,
    PullMode,
    PinValueOutOfRange,
    DutyCycleOutOfRange,
    ZeroFrequencyHz,
    ZeroFrequencyMultiplier,
    ZeroFrequency,
}

impl ArgumentError {
    /// Diagnostic code sent to the host
    pub fn code(&self) -> &'static [u8] {
        match self {
            ArgumentError::PinOutOfRange => b"ERR_ARGUMENT:pin>2",
            ArgumentError::PinMode => b"ERR_ARGUMENT:pinMode",
            ArgumentError::PullMode => b"ERR_ARGUMENT:pullMode",
            ArgumentError::PinValueOutOfRange => b"ERR_ARGUMENT:pinValue>1023",
            ArgumentError::DutyCycleOutOfRange => b"ERR_ARGUMENT:dutyCycle>1023",
            ArgumentError::ZeroFrequencyHz => b"ERR_ARGUMENT:frequencyHz==0",
            ArgumentError::ZeroFrequencyMultiplier => b"ERR_ARGUMENT:frequencyMultiplier==0",
            ArgumentError::ZeroFrequency => b"ERR_ARGUMENT:frequency==0",
        }
    }
}

impl CommandError {
    /// Diagnostic code sent to the host
    pub fn code(&self) -> &'static [u8] {
        match self {
            CommandError::Parse(_) => b"ERR_PARSE",
            CommandError::Argument(arg) => arg.code(),
            CommandError::DisplayBusy => b"ERR_DISPLAY_BUSY",
            CommandError::PinBusy => b"ERR_PIN_BUSY",
            CommandError::Unknown => b"ERR_UNKNOWN",
        }
    }

    /// Whether the diagnostic carries a copy of the offending frame
    ///
    /// Busy rejections are reported as plain system messages.
    pub fn echoes_frame(&self) -> bool {
        !matches!(self, CommandError::DisplayBusy | CommandError::PinBusy)
    }
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        CommandError::Parse(err)
    }
}

impl From<ArgumentError> for CommandError {
    fn from(err: ArgumentError) -> Self {
        CommandError::Argument(err)
    }
}
