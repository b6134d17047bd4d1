//! Serial transmit task
//!
//! Sole writer on the UART. Frames from every emitter arrive on
//! [`TX_CHANNEL`] and go out in the order they were queued.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::TX_CHANNEL;

/// Serial TX task - drains the outbound queue
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let frame = TX_CHANNEL.receive().await;
        if let Err(e) = tx.write_all(&frame).await {
            warn!("Failed to send frame: {:?}", e);
        } else {
            trace!("TX: {} bytes", frame.len());
        }
    }
}
