//! Serial receive task
//!
//! Assembles newline-terminated command lines, runs the dispatcher on each,
//! and hands display and tone work to their own tasks.

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use bitlink_core::{DeviceState, Dispatcher, Job, LineBuffer};

use crate::board::{BoardPins, LedMatrix};
use crate::channels::LinkSender;
use crate::tasks::jobs::{display_task, tone_task};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives and dispatches command lines
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, spawner: Spawner, state: &'static DeviceState) {
    info!("Serial RX task started");

    let mut dispatcher = Dispatcher::new(state, LedMatrix, BoardPins, LinkSender);
    let mut line = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    if line.push(byte) {
                        dispatcher.receive(line.line(), |job| start_job(job, spawner));
                        line.reset();
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Spawn the task for a job; false if its pool is still occupied
fn start_job(job: Job<'static>, spawner: Spawner) -> bool {
    match job {
        Job::Display(job) => match display_task(job) {
            Ok(token) => {
                spawner.spawn(token);
                true
            }
            Err(_) => {
                warn!("Display task still running");
                false
            }
        },
        Job::Tones(job) => {
            let pin = job.pin();
            match tone_task(job) {
                Ok(token) => {
                    spawner.spawn(token);
                    true
                }
                Err(_) => {
                    warn!("Tone task pool exhausted, pin {} rejected", pin);
                    false
                }
            }
        }
    }
}
