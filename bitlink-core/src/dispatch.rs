//! Command dispatcher
//!
//! The dispatcher handles one received line at a time and never awaits, so
//! checking and taking a busy flag is atomic with respect to every other
//! task on the executor. Commands either complete immediately or come back
//! as a [`Job`] for the caller to run in the background.

use bitlink_protocol::{CommandTag, Message, ParseError};

use crate::commands::{ConfigureInput, ImageBatch, SetPixel, SetPwm, SetServo, SetValue, TextHeader};
use crate::emit;
use crate::error::CommandError;
use crate::jobs::{DisplayJob, Job, ToneJob};
use crate::line::Line;
use crate::pin::{InputMode, OutputMode, PinId};
use crate::state::DeviceState;
use crate::traits::{EdgePins, FrameSink, LedDisplay};

/// Brightness restored by the start command
const START_BRIGHTNESS: u8 = 255;

/// Routes inbound frames to their handlers
pub struct Dispatcher<'s, D, P, L> {
    state: &'s DeviceState,
    display: D,
    pins: P,
    link: L,
}

impl<'s, D, P, L> Dispatcher<'s, D, P, L>
where
    D: LedDisplay,
    P: EdgePins,
    L: FrameSink,
{
    pub fn new(state: &'s DeviceState, display: D, pins: P, link: L) -> Self {
        Self {
            state,
            display,
            pins,
            link,
        }
    }

    /// Handle one line from the receiver and hand any job to `start`
    ///
    /// Blank lines are ignored and overlong lines are rejected as a parse
    /// error. `start` returns false when the job could not be started, in
    /// which case the job has been dropped and the command is reported busy.
    pub fn receive<F>(&mut self, line: Line<'_>, start: F)
    where
        F: FnOnce(Job<'s>) -> bool,
    {
        let job = match line {
            Line::Empty => return,
            Line::Frame(bytes) => self.dispatch(bytes),
            Line::Overlong(bytes) => {
                self.state.telemetry.rearm();
                self.reject(bytes, &CommandError::Parse(ParseError::FrameTooLong));
                return;
            }
        };
        if let Some(job) = job {
            let busy = job.busy_error();
            if !start(job) {
                self.reject(line.bytes(), &busy);
            }
        }
    }

    /// Handle one received line (without its terminator)
    ///
    /// Every line re-arms the telemetry window, whether or not it parses.
    /// Errors are reported on the link. Returns a job when the command needs
    /// to keep running after this call.
    pub fn dispatch(&mut self, line: &[u8]) -> Option<Job<'s>> {
        self.state.telemetry.rearm();
        let mut msg = Message::borrowed(line);
        match self.route(&mut msg) {
            Ok(job) => job,
            Err(err) => {
                self.reject(line, &err);
                None
            }
        }
    }

    /// Report a rejected frame
    fn reject(&mut self, line: &[u8], err: &CommandError) {
        emit::report(&mut self.link, err, line);
    }

    fn route(&mut self, msg: &mut Message<'_>) -> Result<Option<Job<'s>>, CommandError> {
        let tag = msg.read_raw()?;
        msg.rewind();
        let tag = CommandTag::from_byte(tag).ok_or(CommandError::Unknown)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("dispatch {}", tag);

        msg.consume(tag.to_byte())?;
        match tag {
            CommandTag::Ping => {
                emit::ping_reply(&mut self.link);
            }
            CommandTag::Start => self.start(),
            CommandTag::ScrollImages | CommandTag::PrintImages => {
                ImageBatch::read(msg)?;
                return self.display_job(msg).map(Some);
            }
            CommandTag::ScrollText | CommandTag::PrintText => {
                TextHeader::read(msg)?;
                return self.display_job(msg).map(Some);
            }
            CommandTag::PrintDisplayFrames => {
                msg.read_u8()?;
                return self.display_job(msg).map(Some);
            }
            CommandTag::PlayTones => {
                let pin = PinId::new(msg.read_u8()?)?;
                return self.tone_job(msg, pin).map(Some);
            }
            CommandTag::ConfigureInputPin => {
                let cmd = ConfigureInput::parse(msg)?;
                match cmd.mode {
                    InputMode::Digital(pull) => swallow!(
                        "configure digital input",
                        self.pins.configure_digital_input(cmd.pin, pull)
                    ),
                    InputMode::Analog => swallow!(
                        "configure analog input",
                        self.pins.configure_analog_input(cmd.pin)
                    ),
                }
            }
            CommandTag::SetPinValue => {
                let cmd = SetValue::parse(msg)?;
                match cmd.mode {
                    OutputMode::Digital => swallow!(
                        "set digital",
                        self.pins.set_digital(cmd.pin, cmd.value != 0)
                    ),
                    OutputMode::Analog => {
                        swallow!("set analog", self.pins.set_analog(cmd.pin, cmd.value))
                    }
                }
            }
            CommandTag::SetPinServoValue => {
                let cmd = SetServo::parse(msg)?;
                swallow!("set servo", self.pins.set_servo(cmd.pin, cmd.value));
            }
            CommandTag::SetPinPwmOut => {
                let cmd = SetPwm::parse(msg)?;
                swallow!("set duty", self.pins.set_analog(cmd.pin, cmd.duty));
                swallow!(
                    "set period",
                    self.pins.set_analog_period_us(cmd.pin, cmd.period_us)
                );
            }
            CommandTag::SetPixel => {
                let cmd = SetPixel::read(msg)?;
                swallow!(
                    "set pixel",
                    self.display.set_pixel(cmd.x, cmd.y, cmd.brightness)
                );
            }
        }
        Ok(None)
    }

    fn start(&mut self) {
        for pin in PinId::ALL {
            swallow!("reset pin", self.pins.set_digital(pin, false));
        }
        swallow!("set brightness", self.display.set_brightness(START_BRIGHTNESS));
        swallow!("clear", self.display.clear());
        self.state.busy.reset();
        self.state.buttons.reset();
        emit::ping_reply(&mut self.link);
    }

    fn display_job(&self, msg: &Message<'_>) -> Result<Job<'s>, CommandError> {
        let state = self.state;
        let lease = state
            .busy
            .try_acquire_display()
            .ok_or(CommandError::DisplayBusy)?;
        let frame = msg.deep_copy()?;
        Ok(Job::Display(DisplayJob::new(frame, lease)))
    }

    fn tone_job(&self, msg: &Message<'_>, pin: PinId) -> Result<Job<'s>, CommandError> {
        let state = self.state;
        let lease = state
            .busy
            .try_acquire_pin(pin)
            .ok_or(CommandError::PinBusy)?;
        let frame = msg.deep_copy()?;
        Ok(Job::Tones(ToneJob::new(pin, frame, lease)))
    }
}
