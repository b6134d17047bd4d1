//! Mock collaborators shared by the integration tests
//!
//! Every mock appends to one shared call log so tests can assert on the
//! order of hardware actions across the display, the pins and the delays.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bitlink_core::pin::{PinId, Pull};
use bitlink_core::traits::{
    AccelSample, Accelerometer, DisplayError, EdgePins, FrameSink, LedDisplay, LinkError,
    PinError, SensorError,
};
use bitlink_core::{DeviceState, Dispatcher, Job, LineBuffer};
use bitlink_protocol::{Image, PinKind};
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear,
    Brightness(u8),
    Pixel(u8, u8, u8),
    ScrollImage(Image, u16),
    PrintImage(Image, u16),
    ScrollText(Vec<u8>, u16),
    PrintText(Vec<u8>, u16),
    Digital(u8, bool),
    Analog(u8, u16),
    Period(u8, u32),
    Servo(u8, u16),
    DigitalInput(u8, Pull),
    AnalogInput(u8),
    DelayMs(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Call>>>);

impl Log {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MockDisplay {
    pub log: Log,
}

impl LedDisplay for MockDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.log.push(Call::Clear);
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.log.push(Call::Brightness(level));
        Ok(())
    }

    fn set_pixel(&mut self, x: u8, y: u8, value: u8) -> Result<(), DisplayError> {
        self.log.push(Call::Pixel(x, y, value));
        Ok(())
    }

    async fn scroll_image(&mut self, image: &Image, delay_ms: u16) -> Result<(), DisplayError> {
        self.log.push(Call::ScrollImage(*image, delay_ms));
        Ok(())
    }

    async fn print_image(&mut self, image: &Image, duration_ms: u16) -> Result<(), DisplayError> {
        self.log.push(Call::PrintImage(*image, duration_ms));
        Ok(())
    }

    async fn scroll_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError> {
        self.log.push(Call::ScrollText(text.to_vec(), delay_ms));
        Ok(())
    }

    async fn print_text(&mut self, text: &[u8], delay_ms: u16) -> Result<(), DisplayError> {
        self.log.push(Call::PrintText(text.to_vec(), delay_ms));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PinTable {
    pub inputs: [Option<PinKind>; 3],
    pub values: [u16; 3],
}

#[derive(Debug, Clone)]
pub struct MockPins {
    pub log: Log,
    pub table: Rc<RefCell<PinTable>>,
}

impl EdgePins for MockPins {
    fn set_digital(&mut self, pin: PinId, high: bool) -> Result<(), PinError> {
        self.table.borrow_mut().inputs[pin.index()] = None;
        self.log.push(Call::Digital(pin.number(), high));
        Ok(())
    }

    fn set_analog(&mut self, pin: PinId, value: u16) -> Result<(), PinError> {
        self.table.borrow_mut().inputs[pin.index()] = None;
        self.log.push(Call::Analog(pin.number(), value));
        Ok(())
    }

    fn set_analog_period_us(&mut self, pin: PinId, period_us: u32) -> Result<(), PinError> {
        self.log.push(Call::Period(pin.number(), period_us));
        Ok(())
    }

    fn set_servo(&mut self, pin: PinId, value: u16) -> Result<(), PinError> {
        self.table.borrow_mut().inputs[pin.index()] = None;
        self.log.push(Call::Servo(pin.number(), value));
        Ok(())
    }

    fn configure_digital_input(&mut self, pin: PinId, pull: Pull) -> Result<(), PinError> {
        self.table.borrow_mut().inputs[pin.index()] = Some(PinKind::Digital);
        self.log.push(Call::DigitalInput(pin.number(), pull));
        Ok(())
    }

    fn configure_analog_input(&mut self, pin: PinId) -> Result<(), PinError> {
        self.table.borrow_mut().inputs[pin.index()] = Some(PinKind::Analog);
        self.log.push(Call::AnalogInput(pin.number()));
        Ok(())
    }

    fn input_kind(&self, pin: PinId) -> Option<PinKind> {
        self.table.borrow().inputs[pin.index()]
    }

    fn read_digital(&mut self, pin: PinId) -> Result<u16, PinError> {
        Ok(self.table.borrow().values[pin.index()].min(1))
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, PinError> {
        Ok(self.table.borrow().values[pin.index()])
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockLink {
    pub frames: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl MockLink {
    pub fn take(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.frames.borrow_mut())
    }
}

impl FrameSink for MockLink {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.frames.borrow_mut().push(frame.to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockDelay {
    pub log: Log,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Call::DelayMs(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Call::DelayMs(ms));
    }
}

pub struct MockAccel(pub Result<AccelSample, SensorError>);

impl Accelerometer for MockAccel {
    fn read(&mut self) -> Result<AccelSample, SensorError> {
        self.0
    }
}

/// A dispatcher wired to mocks that share one call log
pub struct Rig<'s> {
    pub log: Log,
    pub link: MockLink,
    pub display: MockDisplay,
    pub pins: MockPins,
    pub delay: MockDelay,
    pub dispatcher: Dispatcher<'s, MockDisplay, MockPins, MockLink>,
    pub line: LineBuffer,
}

impl<'s> Rig<'s> {
    pub fn new(state: &'s DeviceState) -> Self {
        let log = Log::default();
        let link = MockLink::default();
        let display = MockDisplay { log: log.clone() };
        let pins = MockPins {
            log: log.clone(),
            table: Rc::default(),
        };
        let delay = MockDelay { log: log.clone() };
        let dispatcher = Dispatcher::new(state, display.clone(), pins.clone(), link.clone());
        Self {
            log,
            link,
            display,
            pins,
            delay,
            dispatcher,
            line: LineBuffer::new(),
        }
    }

    pub fn dispatch(&mut self, line: &[u8]) -> Option<Job<'s>> {
        self.dispatcher.dispatch(line)
    }

    /// Feed raw serial bytes; `start` decides whether each job starts
    pub fn feed<F>(&mut self, bytes: &[u8], mut start: F)
    where
        F: FnMut(Job<'s>) -> bool,
    {
        for &byte in bytes {
            if self.line.push(byte) {
                self.dispatcher.receive(self.line.line(), &mut start);
                self.line.reset();
            }
        }
    }

    /// Run a job to completion on the mocks
    pub fn run(&mut self, job: Job<'s>) {
        let mut link = self.link.clone();
        match job {
            Job::Display(job) => {
                let mut display = self.display.clone();
                embassy_futures::block_on(job.run(&mut display, &mut link));
            }
            Job::Tones(job) => {
                let mut pins = self.pins.clone();
                let mut delay = self.delay.clone();
                embassy_futures::block_on(job.run(&mut pins, &mut delay, &mut link));
            }
        }
    }

    /// Frames sent so far, as strings
    pub fn sent(&self) -> Vec<String> {
        self.link
            .take()
            .into_iter()
            .map(|f| String::from_utf8_lossy(&f).into_owned())
            .collect()
    }
}

pub fn image(rows: &[u8; 5]) -> Image {
    Image::from_packed_rows(rows)
}
