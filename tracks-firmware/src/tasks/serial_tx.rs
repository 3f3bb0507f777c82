//! Host UART transmit task
//!
//! Echoes diagnostic lines back to the host.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::DIAG_LINES;

/// Serial TX task - writes queued diagnostic lines
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let line = DIAG_LINES.receive().await;

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send diagnostic: {:?}", e);
        } else {
            trace!("TX: {} bytes", line.len());
        }
    }
}
