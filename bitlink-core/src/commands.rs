//! Command argument parsing
//!
//! Each parser starts after the command tag and reads every field before
//! checking any range, so a frame that fails to parse is only ever reported
//! as a parse error. Configure-input is the exception: its pin is checked
//! before the optional pull byte is read.

use bitlink_protocol::{Image, Message, ParseError};

use crate::error::{ArgumentError, CommandError};
use crate::pin::{InputMode, OutputMode, PinId, Pull, ANALOG_MAX, MODE_ANALOG_IN, MODE_DIGITAL_IN};

/// Header shared by scroll-images and print-images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBatch {
    /// Scroll delay or print duration, per image
    pub delay_ms: u16,
    pub brightness: u8,
    pub count: u8,
}

impl ImageBatch {
    pub fn read(msg: &mut Message<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            delay_ms: msg.read_u16()?,
            brightness: msg.read_u8()?,
            count: msg.read_u8()?,
        })
    }
}

/// Header shared by scroll-text and print-text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextHeader {
    pub delay_ms: u16,
    pub brightness: u8,
}

impl TextHeader {
    pub fn read(msg: &mut Message<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            delay_ms: msg.read_u16()?,
            brightness: msg.read_u8()?,
        })
    }
}

/// One entry of print-display-frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFrame {
    pub duration_ms: u16,
    pub brightness: u8,
    pub image: Image,
}

impl DisplayFrame {
    pub fn read(msg: &mut Message<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            duration_ms: msg.read_u16()?,
            brightness: msg.read_u8()?,
            image: msg.read_image()?,
        })
    }
}

/// Arguments of play-tones after the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneHeader {
    pub duration_ms: u16,
    pub count: u8,
}

impl ToneHeader {
    pub fn read(msg: &mut Message<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            duration_ms: msg.read_u16()?,
            count: msg.read_u8()?,
        })
    }
}

/// Arguments of set-pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPixel {
    pub x: u8,
    pub y: u8,
    pub brightness: u8,
}

impl SetPixel {
    pub fn read(msg: &mut Message<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            x: msg.read_u8()?,
            y: msg.read_u8()?,
            brightness: msg.read_u8()?,
        })
    }
}

/// Arguments of configure-input-pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureInput {
    pub pin: PinId,
    pub mode: InputMode,
}

impl ConfigureInput {
    pub fn parse(msg: &mut Message<'_>) -> Result<Self, CommandError> {
        let pin = msg.read_u8()?;
        let mode = msg.read_u8()?;
        let pin = PinId::new(pin)?;
        // Pull mode only follows digital inputs
        let pull = if mode == MODE_DIGITAL_IN {
            Some(msg.read_u8()?)
        } else {
            None
        };

        let mode = match (mode, pull) {
            (MODE_DIGITAL_IN, Some(pull)) => InputMode::Digital(Pull::from_byte(pull)?),
            (MODE_ANALOG_IN, _) => InputMode::Analog,
            _ => return Err(ArgumentError::PinMode.into()),
        };
        Ok(Self { pin, mode })
    }
}

/// Arguments of set-pin-value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetValue {
    pub pin: PinId,
    pub mode: OutputMode,
    pub value: u16,
}

impl SetValue {
    pub fn parse(msg: &mut Message<'_>) -> Result<Self, CommandError> {
        let pin = msg.read_u8()?;
        let mode = msg.read_u8()?;
        let value = msg.read_u16()?;

        let pin = PinId::new(pin)?;
        let mode = OutputMode::from_byte(mode)?;
        if mode == OutputMode::Analog && value > ANALOG_MAX {
            return Err(ArgumentError::PinValueOutOfRange.into());
        }
        Ok(Self { pin, mode, value })
    }
}

/// Arguments of set-pin-servo-value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetServo {
    pub pin: PinId,
    pub value: u16,
}

impl SetServo {
    pub fn parse(msg: &mut Message<'_>) -> Result<Self, CommandError> {
        let pin = msg.read_u8()?;
        let value = msg.read_u16()?;
        Ok(Self {
            pin: PinId::new(pin)?,
            value,
        })
    }
}

/// Arguments of set-pin-pwm-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPwm {
    pub pin: PinId,
    pub duty: u16,
    pub period_us: u32,
}

impl SetPwm {
    pub fn parse(msg: &mut Message<'_>) -> Result<Self, CommandError> {
        let pin = msg.read_u8()?;
        let frequency_hz = msg.read_u16()?;
        let multiplier = msg.read_u16()?;
        let duty = msg.read_u16()?;

        let pin = PinId::new(pin)?;
        if duty > ANALOG_MAX {
            return Err(ArgumentError::DutyCycleOutOfRange.into());
        }
        if frequency_hz == 0 {
            return Err(ArgumentError::ZeroFrequencyHz.into());
        }
        if multiplier == 0 {
            return Err(ArgumentError::ZeroFrequencyMultiplier.into());
        }
        // Not checked against what the PWM hardware can produce
        let period_us = 1_000_000 / (frequency_hz as u32 * multiplier as u32);
        Ok(Self {
            pin,
            duty,
            period_us,
        })
    }
}

/// Tone period for a frequency in Hz
pub fn tone_period_us(frequency_hz: u16) -> Result<u32, ArgumentError> {
    if frequency_hz == 0 {
        return Err(ArgumentError::ZeroFrequency);
    }
    Ok(1_000_000 / frequency_hz as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_digital_input_with_pull() {
        let mut msg = Message::borrowed(b"01|01|03|");
        let cmd = ConfigureInput::parse(&mut msg).unwrap();
        assert_eq!(cmd.pin, PinId::P1);
        assert_eq!(cmd.mode, InputMode::Digital(Pull::Up));
    }

    #[test]
    fn test_configure_analog_input_has_no_pull() {
        let mut msg = Message::borrowed(b"02|04|");
        let cmd = ConfigureInput::parse(&mut msg).unwrap();
        assert_eq!(cmd.mode, InputMode::Analog);
    }

    #[test]
    fn test_configure_digital_input_requires_pull() {
        let mut msg = Message::borrowed(b"02|01|");
        assert_eq!(
            ConfigureInput::parse(&mut msg),
            Err(CommandError::Parse(ParseError::Exhausted))
        );
    }

    #[test]
    fn test_configure_pin_checked_before_pull() {
        let mut msg = Message::borrowed(b"03|01|");
        assert_eq!(
            ConfigureInput::parse(&mut msg),
            Err(CommandError::Argument(ArgumentError::PinOutOfRange))
        );
    }

    #[test]
    fn test_configure_output_mode_rejected() {
        let mut msg = Message::borrowed(b"00|02|");
        assert_eq!(
            ConfigureInput::parse(&mut msg),
            Err(CommandError::Argument(ArgumentError::PinMode))
        );
    }

    #[test]
    fn test_configure_bad_pull() {
        let mut msg = Message::borrowed(b"00|01|02|");
        assert_eq!(
            ConfigureInput::parse(&mut msg),
            Err(CommandError::Argument(ArgumentError::PullMode))
        );
    }

    #[test]
    fn test_set_value_pin_out_of_range() {
        let mut msg = Message::borrowed(b"03|00|0001|");
        assert_eq!(
            SetValue::parse(&mut msg),
            Err(CommandError::Argument(ArgumentError::PinOutOfRange))
        );
    }

    #[test]
    fn test_parse_error_wins_over_range() {
        // Pin 3 is out of range but the value field is truncated
        let mut msg = Message::borrowed(b"03|08|00");
        assert!(matches!(SetValue::parse(&mut msg), Err(CommandError::Parse(_))));
    }

    #[test]
    fn test_set_value_analog_limit() {
        let mut msg = Message::borrowed(b"00|08|0400|");
        assert_eq!(
            SetValue::parse(&mut msg),
            Err(CommandError::Argument(ArgumentError::PinValueOutOfRange))
        );
        let mut msg = Message::borrowed(b"00|08|03FF|");
        assert!(SetValue::parse(&mut msg).is_ok());
    }

    #[test]
    fn test_set_value_digital_allows_large_values() {
        let mut msg = Message::borrowed(b"00|02|FFFF|");
        let cmd = SetValue::parse(&mut msg).unwrap();
        assert_eq!(cmd.mode, OutputMode::Digital);
    }

    #[test]
    fn test_pwm_period() {
        let mut msg = Message::borrowed(b"01|0032|000A|0200|");
        let cmd = SetPwm::parse(&mut msg).unwrap();
        // 50 Hz × 10
        assert_eq!(cmd.period_us, 2000);
        assert_eq!(cmd.duty, 512);
    }

    #[test]
    fn test_pwm_argument_checks() {
        let cases: [(&[u8], ArgumentError); 3] = [
            (b"01|0032|000A|0400|", ArgumentError::DutyCycleOutOfRange),
            (b"01|0000|000A|0200|", ArgumentError::ZeroFrequencyHz),
            (b"01|0032|0000|0200|", ArgumentError::ZeroFrequencyMultiplier),
        ];
        for (frame, expected) in cases {
            let mut msg = Message::borrowed(frame);
            assert_eq!(SetPwm::parse(&mut msg), Err(CommandError::Argument(expected)));
        }
    }

    #[test]
    fn test_tone_period() {
        assert_eq!(tone_period_us(440), Ok(2272));
        assert_eq!(tone_period_us(0), Err(ArgumentError::ZeroFrequency));
    }

    #[test]
    fn test_display_frame() {
        let mut msg = Message::borrowed(b"0064|80|V0001|");
        let frame = DisplayFrame::read(&mut msg).unwrap();
        assert_eq!(frame.duration_ms, 100);
        assert_eq!(frame.brightness, 0x80);
        assert_eq!(frame.image.row_bits(0), 0x1F);
    }
}
