//! Background display and tone jobs
//!
//! The busy leases allow one display job at a time and one tone job per edge
//! pin, which sizes the task pools.

use defmt::*;
use embassy_time::Delay;

use bitlink_core::{DisplayJob, ToneJob};

use crate::board::{BoardPins, LedMatrix};
use crate::channels::LinkSender;

#[embassy_executor::task]
pub async fn display_task(job: DisplayJob<'static>) {
    debug!("Display job started");
    job.run(&mut LedMatrix, &mut LinkSender).await;
    debug!("Display job finished");
}

#[embassy_executor::task(pool_size = 3)]
pub async fn tone_task(job: ToneJob<'static>) {
    debug!("Tone job started");
    job.run(&mut BoardPins, &mut Delay, &mut LinkSender).await;
    debug!("Tone job finished");
}
