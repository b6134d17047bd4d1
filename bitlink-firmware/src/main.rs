//! bitlink - serial command firmware
//!
//! Main firmware binary for RP2040-based boards with a 5×5 LED matrix, two
//! buttons, an accelerometer and three edge pins. A host editor drives the
//! board over a newline-delimited hex protocol on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use bitlink_core::config::{parse_config, DeviceConfig};
use bitlink_core::traits::LedDisplay;
use bitlink_core::DeviceState;
use bitlink_protocol::ButtonId;

use crate::board::matrix::matrix_scan_task;
use crate::board::pins::{self, pin0_task, pin1_task, pin2_task};
use crate::board::{LedMatrix, Lis3dh};

mod board;
mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static STATE: StaticCell<DeviceState> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("bitlink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let state: &'static DeviceState = STATE.init(DeviceState::new(config.telemetry_window_ticks()));

    // LED matrix: rows drive high, columns sink low
    let rows = [
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
    ];
    let cols = [
        Output::new(p.PIN_7, Level::High),
        Output::new(p.PIN_8, Level::High),
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_11, Level::High),
    ];
    if let Err(e) = LedMatrix.set_brightness(config.brightness) {
        warn!("Set brightness failed: {:?}", e);
    }
    spawner.spawn(unwrap!(matrix_scan_task(rows, cols)));
    spawner.spawn(unwrap!(tasks::banner_task(
        state,
        config.banner.clone(),
        config.banner_delay_ms
    )));

    info!("LED matrix initialized");

    // Edge pins share the ADC for analog inputs
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    pins::install_adc(adc).await;
    spawner.spawn(unwrap!(pin0_task(p.PIN_26)));
    spawner.spawn(unwrap!(pin1_task(p.PIN_27)));
    spawner.spawn(unwrap!(pin2_task(p.PIN_28)));

    info!("Edge pins initialized");

    // Accelerometer on I2C0 (SDA=GPIO20, SCL=GPIO21)
    let i2c = I2c::new_async(p.I2C0, p.PIN_21, p.PIN_20, Irqs, i2c::Config::default());
    spawner.spawn(unwrap!(tasks::accel_task(Lis3dh::new(i2c))));

    // Buttons
    let button_a = Input::new(p.PIN_14, Pull::Up);
    let button_b = Input::new(p.PIN_15, Pull::Up);
    spawner.spawn(unwrap!(tasks::button_task(button_a, ButtonId::A, state)));
    spawner.spawn(unwrap!(tasks::button_task(button_b, ButtonId::B, state)));

    // Host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.baudrate);

    spawner.spawn(unwrap!(tasks::serial_tx_task(tx)));
    spawner.spawn(unwrap!(tasks::serial_rx_task(rx, spawner, state)));
    spawner.spawn(unwrap!(tasks::telemetry_task(
        state,
        config.telemetry_period_ms()
    )));

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded device.toml
///
/// build.rs validates the file, so a failure here means the two parsers
/// disagree; the board still comes up with defaults.
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            DeviceConfig::default()
        }
    }
}
