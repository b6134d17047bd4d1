//! Edge pins P0-P2
//!
//! Each pin has a driver task that owns the GPIO and re-configures it whenever
//! its slot changes. Commands only write the slot and wake the task, so
//! [`BoardPins`] is a cheap handle that can be copied into every task that
//! needs the pins.
//!
//! Outputs are software PWM on the executor; inputs are polled and the latest
//! reading is cached for telemetry.

use core::cell::Cell;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::adc::{self, Adc, AdcPin};
use embassy_rp::gpio::{self, Flex, Level};
use embassy_rp::peripherals::{PIN_26, PIN_27, PIN_28};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use portable_atomic::{AtomicU16, AtomicU32, Ordering};

use bitlink_core::pin::{PinId, Pull, ANALOG_MAX, PIN_COUNT};
use bitlink_core::traits::{EdgePins, PinError};
use bitlink_protocol::PinKind;

/// Analog output period until a command changes it
const DEFAULT_PERIOD_US: u32 = 20_000;

/// Servo frame length
const SERVO_PERIOD_US: u32 = 20_000;

/// Servo pulse at 0° and the pulse span up to 180°
const SERVO_MIN_PULSE_US: u32 = 500;
const SERVO_SPAN_US: u32 = 2_000;

/// How often inputs are re-sampled
const INPUT_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    DigitalOut(bool),
    Analog(u16),
    Servo(u16),
    DigitalIn(Pull),
    AnalogIn,
}

struct PinSlot {
    drive: BlockingMutex<CriticalSectionRawMutex, Cell<Drive>>,
    period_us: AtomicU32,
    input: AtomicU16,
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl PinSlot {
    const fn new() -> Self {
        Self {
            drive: BlockingMutex::new(Cell::new(Drive::DigitalOut(false))),
            period_us: AtomicU32::new(DEFAULT_PERIOD_US),
            input: AtomicU16::new(0),
            changed: Signal::new(),
        }
    }

    fn drive(&self) -> Drive {
        self.drive.lock(|d| d.get())
    }

    fn set(&self, drive: Drive) {
        self.drive.lock(|d| d.set(drive));
        self.changed.signal(());
    }
}

static SLOTS: [PinSlot; PIN_COUNT] = [PinSlot::new(), PinSlot::new(), PinSlot::new()];

/// The ADC, shared by the analog inputs
static ADC: Mutex<CriticalSectionRawMutex, Option<Adc<'static, adc::Async>>> = Mutex::new(None);

/// Hand the ADC to the pin drivers
pub async fn install_adc(adc: Adc<'static, adc::Async>) {
    *ADC.lock().await = Some(adc);
}

/// Handle to the edge pins
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardPins;

impl BoardPins {
    fn slot(pin: PinId) -> &'static PinSlot {
        &SLOTS[pin.index()]
    }
}

impl EdgePins for BoardPins {
    fn set_digital(&mut self, pin: PinId, high: bool) -> Result<(), PinError> {
        Self::slot(pin).set(Drive::DigitalOut(high));
        Ok(())
    }

    fn set_analog(&mut self, pin: PinId, value: u16) -> Result<(), PinError> {
        Self::slot(pin).set(Drive::Analog(value.min(ANALOG_MAX)));
        Ok(())
    }

    fn set_analog_period_us(&mut self, pin: PinId, period_us: u32) -> Result<(), PinError> {
        if period_us == 0 {
            return Err(PinError::Unavailable);
        }
        let slot = Self::slot(pin);
        slot.period_us.store(period_us, Ordering::Relaxed);
        slot.changed.signal(());
        Ok(())
    }

    fn set_servo(&mut self, pin: PinId, value: u16) -> Result<(), PinError> {
        Self::slot(pin).set(Drive::Servo(value.min(180)));
        Ok(())
    }

    fn configure_digital_input(&mut self, pin: PinId, pull: Pull) -> Result<(), PinError> {
        Self::slot(pin).set(Drive::DigitalIn(pull));
        Ok(())
    }

    fn configure_analog_input(&mut self, pin: PinId) -> Result<(), PinError> {
        Self::slot(pin).set(Drive::AnalogIn);
        Ok(())
    }

    fn input_kind(&self, pin: PinId) -> Option<PinKind> {
        match Self::slot(pin).drive() {
            Drive::DigitalIn(_) => Some(PinKind::Digital),
            Drive::AnalogIn => Some(PinKind::Analog),
            _ => None,
        }
    }

    fn read_digital(&mut self, pin: PinId) -> Result<u16, PinError> {
        let slot = Self::slot(pin);
        match slot.drive() {
            Drive::DigitalIn(_) => Ok(slot.input.load(Ordering::Relaxed)),
            _ => Err(PinError::NotInput),
        }
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, PinError> {
        let slot = Self::slot(pin);
        match slot.drive() {
            Drive::AnalogIn => Ok(slot.input.load(Ordering::Relaxed)),
            _ => Err(PinError::NotInput),
        }
    }
}

fn gpio_pull(pull: Pull) -> gpio::Pull {
    match pull {
        Pull::None => gpio::Pull::None,
        Pull::Down => gpio::Pull::Down,
        Pull::Up => gpio::Pull::Up,
    }
}

/// Wait up to `timeout`; true if the slot changed in the meantime
async fn changed_within(slot: &PinSlot, timeout: Duration) -> bool {
    matches!(
        select(slot.changed.wait(), Timer::after(timeout)).await,
        Either::First(_)
    )
}

/// Square wave with `on_us` high per `period_us`, until the slot changes
async fn soft_pwm(out: &mut Flex<'_>, slot: &PinSlot, on_us: u32, period_us: u32) {
    if on_us == 0 || on_us >= period_us {
        out.set_level(if on_us == 0 { Level::Low } else { Level::High });
        slot.changed.wait().await;
        return;
    }

    let high = Duration::from_micros(on_us as u64);
    let low = Duration::from_micros((period_us - on_us) as u64);
    loop {
        out.set_high();
        if changed_within(slot, high).await {
            return;
        }
        out.set_low();
        if changed_within(slot, low).await {
            return;
        }
    }
}

async fn sample_adc(channel: &mut adc::Channel<'_>) -> Option<u16> {
    let mut adc = ADC.lock().await;
    match adc.as_mut()?.read(channel).await {
        // 12-bit conversion scaled to the 10-bit range the host expects
        Ok(raw) => Some(raw >> 2),
        Err(e) => {
            warn!("ADC read failed: {:?}", e);
            None
        }
    }
}

async fn drive<T: AdcPin>(id: PinId, mut pin: Peri<'static, T>) -> ! {
    let slot = &SLOTS[id.index()];
    info!("Pin P{} driver started", id.number());

    loop {
        match slot.drive() {
            Drive::DigitalOut(high) => {
                let mut out = Flex::new(pin.reborrow());
                out.set_as_output();
                out.set_level(if high { Level::High } else { Level::Low });
                slot.changed.wait().await;
            }
            Drive::Analog(value) => {
                let mut out = Flex::new(pin.reborrow());
                out.set_as_output();
                let period_us = slot.period_us.load(Ordering::Relaxed);
                let on_us = (period_us as u64 * value as u64 / ANALOG_MAX as u64) as u32;
                soft_pwm(&mut out, slot, on_us, period_us).await;
            }
            Drive::Servo(angle) => {
                let mut out = Flex::new(pin.reborrow());
                out.set_as_output();
                let on_us = SERVO_MIN_PULSE_US + angle as u32 * SERVO_SPAN_US / 180;
                soft_pwm(&mut out, slot, on_us, SERVO_PERIOD_US).await;
            }
            Drive::DigitalIn(pull) => {
                let mut input = Flex::new(pin.reborrow());
                input.set_as_input();
                input.set_pull(gpio_pull(pull));
                loop {
                    slot.input.store(input.is_high() as u16, Ordering::Relaxed);
                    if changed_within(slot, INPUT_POLL).await {
                        break;
                    }
                }
            }
            Drive::AnalogIn => {
                let mut channel = adc::Channel::new_pin(pin.reborrow(), gpio::Pull::None);
                loop {
                    if let Some(value) = sample_adc(&mut channel).await {
                        slot.input.store(value, Ordering::Relaxed);
                    }
                    if changed_within(slot, INPUT_POLL).await {
                        break;
                    }
                }
            }
        }
    }
}

#[embassy_executor::task]
pub async fn pin0_task(pin: Peri<'static, PIN_26>) {
    drive(PinId::P0, pin).await
}

#[embassy_executor::task]
pub async fn pin1_task(pin: Peri<'static, PIN_27>) {
    drive(PinId::P1, pin).await
}

#[embassy_executor::task]
pub async fn pin2_task(pin: Peri<'static, PIN_28>) {
    drive(PinId::P2, pin).await
}
