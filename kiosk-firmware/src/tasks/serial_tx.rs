//! Host serial transmit task
//!
//! Writes the kiosk's log lines to the host, one per line.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::LOG_CHANNEL;

/// Serial TX task - forwards queued log lines to the host
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let line = LOG_CHANNEL.receive().await;

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send log line: {:?}", e);
            continue;
        }
        if let Err(e) = tx.write_all(b"\r\n").await {
            warn!("Failed to send line ending: {:?}", e);
        }
    }
}
