//! Command and event tags
//!
//! Commands use uppercase letters, events lowercase, so the two namespaces
//! never collide.

// Command tags (host → board)
pub const CMD_PING: u8 = b'P';
pub const CMD_START: u8 = b'S';
pub const CMD_SCROLL_IMAGES: u8 = b'A';
pub const CMD_PRINT_IMAGES: u8 = b'B';
pub const CMD_SCROLL_TEXT: u8 = b'C';
pub const CMD_PRINT_TEXT: u8 = b'D';
pub const CMD_CONFIGURE_INPUT_PIN: u8 = b'E';
pub const CMD_SET_PIN_VALUE: u8 = b'F';
pub const CMD_SET_PIN_SERVO_VALUE: u8 = b'G';
pub const CMD_PLAY_TONES: u8 = b'H';
pub const CMD_SET_PIXEL: u8 = b'I';
pub const CMD_PRINT_DISPLAY_FRAMES: u8 = b'J';
pub const CMD_SET_PIN_PWM_OUT: u8 = b'K';

// Event tags (board → host)
pub const EVT_DIAGNOSTIC: u8 = b'm';
pub const EVT_PING_REPLY: u8 = b'p';
pub const EVT_BUTTON: u8 = b'a';
pub const EVT_GESTURE: u8 = b'b';
pub const EVT_TELEMETRY: u8 = b'c';

/// Inbound command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandTag {
    Ping,
    Start,
    ScrollImages,
    PrintImages,
    ScrollText,
    PrintText,
    ConfigureInputPin,
    SetPinValue,
    SetPinServoValue,
    PlayTones,
    SetPixel,
    PrintDisplayFrames,
    SetPinPwmOut,
}

impl CommandTag {
    /// Parse a command from its tag byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_PING => Some(CommandTag::Ping),
            CMD_START => Some(CommandTag::Start),
            CMD_SCROLL_IMAGES => Some(CommandTag::ScrollImages),
            CMD_PRINT_IMAGES => Some(CommandTag::PrintImages),
            CMD_SCROLL_TEXT => Some(CommandTag::ScrollText),
            CMD_PRINT_TEXT => Some(CommandTag::PrintText),
            CMD_CONFIGURE_INPUT_PIN => Some(CommandTag::ConfigureInputPin),
            CMD_SET_PIN_VALUE => Some(CommandTag::SetPinValue),
            CMD_SET_PIN_SERVO_VALUE => Some(CommandTag::SetPinServoValue),
            CMD_PLAY_TONES => Some(CommandTag::PlayTones),
            CMD_SET_PIXEL => Some(CommandTag::SetPixel),
            CMD_PRINT_DISPLAY_FRAMES => Some(CommandTag::PrintDisplayFrames),
            CMD_SET_PIN_PWM_OUT => Some(CommandTag::SetPinPwmOut),
            _ => None,
        }
    }

    /// Convert to tag byte
    pub fn to_byte(self) -> u8 {
        match self {
            CommandTag::Ping => CMD_PING,
            CommandTag::Start => CMD_START,
            CommandTag::ScrollImages => CMD_SCROLL_IMAGES,
            CommandTag::PrintImages => CMD_PRINT_IMAGES,
            CommandTag::ScrollText => CMD_SCROLL_TEXT,
            CommandTag::PrintText => CMD_PRINT_TEXT,
            CommandTag::ConfigureInputPin => CMD_CONFIGURE_INPUT_PIN,
            CommandTag::SetPinValue => CMD_SET_PIN_VALUE,
            CommandTag::SetPinServoValue => CMD_SET_PIN_SERVO_VALUE,
            CommandTag::PlayTones => CMD_PLAY_TONES,
            CommandTag::SetPixel => CMD_SET_PIXEL,
            CommandTag::PrintDisplayFrames => CMD_PRINT_DISPLAY_FRAMES,
            CommandTag::SetPinPwmOut => CMD_SET_PIN_PWM_OUT,
        }
    }
}
