//! Host UART receive task
//!
//! Moves received bytes into the byte queue. Line assembly happens in the
//! drive task so that the control loop sees bytes in arrival order.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::RX_BYTES;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - forwards host bytes to the drive task
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut dropped: u32 = 0;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if RX_BYTES.try_send(byte).is_err() {
                        dropped = dropped.wrapping_add(1);
                    }
                }

                if dropped > 0 {
                    warn!("RX queue full, dropped {} bytes", dropped);
                    dropped = 0;
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
