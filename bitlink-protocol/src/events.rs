//! Events sent from the board to the host

use heapless::Vec;

use crate::message::{Message, OwnedMessage, WriteError};
use crate::tags::{EVT_BUTTON, EVT_DIAGNOSTIC, EVT_GESTURE, EVT_PING_REPLY, EVT_TELEMETRY};

/// Buffer capacity for ping replies
pub const PING_REPLY_CAPACITY: usize = 20;
/// Buffer capacity for system messages and diagnostics
pub const SYSMSG_CAPACITY: usize = 64;
/// Buffer capacity for button events
pub const BUTTON_CAPACITY: usize = 20;
/// Buffer capacity for gesture events
pub const GESTURE_CAPACITY: usize = 20;
/// Buffer capacity for telemetry frames
pub const TELEMETRY_CAPACITY: usize = 64;

/// Number of edge pins reported in telemetry
pub const MAX_TELEMETRY_PINS: usize = 3;

/// Push buttons on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A = 1,
    B = 2,
}

impl ButtonId {
    /// Zero-based index into per-button tables
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

/// Button transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Down = 1,
    Up = 2,
    Click = 3,
    LongClick = 4,
    Hold = 5,
    DoubleClick = 6,
}

impl ButtonState {
    /// Convert to wire value
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Accelerometer gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    TiltUp = 1,
    TiltDown = 2,
    TiltLeft = 3,
    TiltRight = 4,
    FaceUp = 5,
    FaceDown = 6,
    Freefall = 7,
    ThreeG = 8,
    SixG = 9,
    EightG = 10,
    Shake = 11,
}

impl Gesture {
    /// Convert to wire value
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// How an input pin is sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinKind {
    Analog,
    Digital,
}

impl PinKind {
    fn wire_char(self) -> u8 {
        match self {
            PinKind::Analog => b'a',
            PinKind::Digital => b'd',
        }
    }
}

/// One sampled input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSample {
    pub pin: u8,
    pub kind: PinKind,
    pub value: u16,
}

/// Snapshot reported by the periodic telemetry sampler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TelemetrySample {
    /// Last known state of buttons A and B
    pub buttons: [u8; 2],
    /// Accelerometer X, Y, Z in milli-g
    pub accel: [i16; 3],
    /// Input-configured pins
    pub pins: Vec<PinSample, MAX_TELEMETRY_PINS>,
}

/// An outbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent<'a> {
    /// Reply to ping and start
    PingReply { version: u8 },
    /// Free-form system message
    SysMsg { text: &'a [u8] },
    /// Error code followed by the offending frame
    Diagnostic { code: &'a [u8], frame: &'a [u8] },
    Button { id: ButtonId, state: ButtonState },
    Gesture(Gesture),
    Telemetry(&'a TelemetrySample),
}

impl DeviceEvent<'_> {
    /// Buffer capacity used for this event
    pub fn capacity(&self) -> usize {
        match self {
            DeviceEvent::PingReply { .. } => PING_REPLY_CAPACITY,
            DeviceEvent::SysMsg { .. } | DeviceEvent::Diagnostic { .. } => SYSMSG_CAPACITY,
            DeviceEvent::Button { .. } => BUTTON_CAPACITY,
            DeviceEvent::Gesture(_) => GESTURE_CAPACITY,
            DeviceEvent::Telemetry(_) => TELEMETRY_CAPACITY,
        }
    }

    /// Encode into a finalized message ready to transmit
    pub fn encode(&self) -> Result<OwnedMessage, WriteError> {
        let mut msg = Message::with_capacity(self.capacity());
        self.write_fields(&mut msg)?;
        msg.finalize();
        Ok(msg)
    }

    fn write_fields(&self, msg: &mut OwnedMessage) -> Result<(), WriteError> {
        match self {
            DeviceEvent::PingReply { version } => {
                msg.write_char(EVT_PING_REPLY)?;
                msg.write_u8(*version)?;
            }
            DeviceEvent::SysMsg { text } => {
                msg.write_char(EVT_DIAGNOSTIC)?;
                msg.write_str(text, true)?;
            }
            DeviceEvent::Diagnostic { code, frame } => {
                msg.write_char(EVT_DIAGNOSTIC)?;
                msg.write_str(code, true)?;
                msg.write_chars(frame, true)?;
            }
            DeviceEvent::Button { id, state } => {
                msg.write_char(EVT_BUTTON)?;
                msg.write_u8(*id as u8)?;
                msg.write_u8(state.to_byte())?;
            }
            DeviceEvent::Gesture(gesture) => {
                msg.write_char(EVT_GESTURE)?;
                msg.write_u8(gesture.to_byte())?;
            }
            DeviceEvent::Telemetry(sample) => {
                msg.write_char(EVT_TELEMETRY)?;
                msg.write_char(b'b')?;
                msg.write_u8(sample.buttons[0])?;
                msg.write_u8(sample.buttons[1])?;
                msg.write_char(b'a')?;
                for axis in sample.accel {
                    msg.write_u16(axis as u16)?;
                }
                msg.write_char(b'p')?;
                msg.write_u8(sample.pins.len() as u8)?;
                for pin in &sample.pins {
                    msg.write_u8(pin.pin)?;
                    msg.write_char(pin.kind.wire_char())?;
                    msg.write_u16(pin.value)?;
                }
            }
        }
        Ok(())
    }
}
