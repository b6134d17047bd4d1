//! Deferred display and tone jobs
//!
//! A job owns a private copy of its command frame and the busy lease for its
//! resource. It re-parses the frame from the start, stops at the first field
//! that fails to parse, and releases the lease when it is dropped at the end
//! of [`DisplayJob::run`] or [`ToneJob::run`].

use embedded_hal_async::delay::DelayNs;

use bitlink_protocol::{CommandTag, Message, OwnedMessage, ParseError};

use crate::busy::Lease;
use crate::commands::{tone_period_us, DisplayFrame, ImageBatch, TextHeader, ToneHeader};
use crate::emit;
use crate::error::CommandError;
use crate::pin::{PinId, TONE_LEVEL};
use crate::traits::{EdgePins, FrameSink, LedDisplay};

/// Work handed from the dispatcher to a background task
#[derive(Debug)]
pub enum Job<'s> {
    Display(DisplayJob<'s>),
    Tones(ToneJob<'s>),
}

impl Job<'_> {
    /// Rejection reported when the job cannot be started
    pub(crate) fn busy_error(&self) -> CommandError {
        match self {
            Job::Display(_) => CommandError::DisplayBusy,
            Job::Tones(_) => CommandError::PinBusy,
        }
    }
}

/// An animation on the LED matrix
#[derive(Debug)]
pub struct DisplayJob<'s> {
    frame: OwnedMessage,
    _lease: Lease<'s>,
}

/// A tone sequence on one edge pin
#[derive(Debug)]
pub struct ToneJob<'s> {
    pin: PinId,
    frame: OwnedMessage,
    _lease: Lease<'s>,
}

fn read_tag(msg: &mut Message<'_>) -> Result<CommandTag, CommandError> {
    let tag = msg.read_char()?;
    CommandTag::from_byte(tag).ok_or(CommandError::Unknown)
}

impl<'s> DisplayJob<'s> {
    pub(crate) fn new(frame: OwnedMessage, lease: Lease<'s>) -> Self {
        Self {
            frame,
            _lease: lease,
        }
    }

    /// Render the animation, reporting the first parse failure on `link`
    pub async fn run<D: LedDisplay, L: FrameSink>(mut self, display: &mut D, link: &mut L) {
        if let Err(err) = render(&mut self.frame, display).await {
            emit::report(link, &err, self.frame.as_bytes());
        }
    }
}

async fn render<D: LedDisplay>(msg: &mut OwnedMessage, display: &mut D) -> Result<(), CommandError> {
    msg.rewind();
    let tag = read_tag(msg)?;
    match tag {
        CommandTag::ScrollImages | CommandTag::PrintImages => {
            let batch = ImageBatch::read(msg)?;
            swallow!("set brightness", display.set_brightness(batch.brightness));
            swallow!("clear", display.clear());
            for _ in 0..batch.count {
                let image = msg.read_image()?;
                if tag == CommandTag::ScrollImages {
                    swallow!("scroll image", display.scroll_image(&image, batch.delay_ms).await);
                } else {
                    swallow!("print image", display.print_image(&image, batch.delay_ms).await);
                }
            }
        }
        CommandTag::ScrollText | CommandTag::PrintText => {
            let header = TextHeader::read(msg)?;
            let text = msg.read_str()?;
            swallow!("clear", display.clear());
            if !text.is_empty() {
                swallow!("set brightness", display.set_brightness(header.brightness));
                if tag == CommandTag::ScrollText {
                    swallow!("scroll text", display.scroll_text(text, header.delay_ms).await);
                } else {
                    swallow!("print text", display.print_text(text, header.delay_ms).await);
                }
            }
        }
        CommandTag::PrintDisplayFrames => {
            let count = msg.read_u8()?;
            swallow!("clear", display.clear());
            for _ in 0..count {
                let frame = DisplayFrame::read(msg)?;
                swallow!("set brightness", display.set_brightness(frame.brightness));
                swallow!("print frame", display.print_image(&frame.image, frame.duration_ms).await);
                if frame.duration_ms > 0 {
                    swallow!("clear", display.clear());
                }
            }
        }
        _ => return Err(ParseError::Mismatch.into()),
    }
    Ok(())
}

impl<'s> ToneJob<'s> {
    pub(crate) fn new(pin: PinId, frame: OwnedMessage, lease: Lease<'s>) -> Self {
        Self {
            pin,
            frame,
            _lease: lease,
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Play the tone sequence, reporting the first failure on `link`
    ///
    /// With a non-zero duration every tone is held for that long and the pin
    /// is silenced afterwards. With a zero duration only the first tone is
    /// started and left playing.
    pub async fn run<P, T, L>(mut self, pins: &mut P, delay: &mut T, link: &mut L)
    where
        P: EdgePins,
        T: DelayNs,
        L: FrameSink,
    {
        let pin = self.pin;
        let result = match read_tone_header(&mut self.frame) {
            Ok(header) => {
                let played = play(&mut self.frame, header, pin, pins, delay).await;
                if header.duration_ms > 0 {
                    swallow!("silence", pins.set_analog(pin, 0));
                }
                played
            }
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            emit::report(link, &err, self.frame.as_bytes());
        }
    }
}

fn read_tone_header(msg: &mut OwnedMessage) -> Result<ToneHeader, CommandError> {
    msg.rewind();
    read_tag(msg)?;
    // Pin was validated by the dispatcher
    msg.read_u8()?;
    Ok(ToneHeader::read(msg)?)
}

async fn play<P: EdgePins, T: DelayNs>(
    msg: &mut OwnedMessage,
    header: ToneHeader,
    pin: PinId,
    pins: &mut P,
    delay: &mut T,
) -> Result<(), CommandError> {
    for _ in 0..header.count {
        let frequency = msg.read_u16()?;
        let period_us = tone_period_us(frequency)?;
        swallow!("tone level", pins.set_analog(pin, TONE_LEVEL));
        swallow!("tone period", pins.set_analog_period_us(pin, period_us));
        if header.duration_ms == 0 {
            break;
        }
        delay.delay_ms(header.duration_ms as u32).await;
    }
    Ok(())
}
