//! Drive control task
//!
//! Runs the control loop on a fixed ticker. Bytes come from the RX queue
//! without waiting, so a quiet link never delays the heartbeat check.

use defmt::{debug, error, info, trace, warn, Display2Format};
use embassy_time::{Duration, Instant, Ticker};

use tracks_core::config::DriveConfig;
use tracks_core::diagnostics::{Diagnostic, Severity};
use tracks_core::traits::{ByteSource, Clock};
use tracks_core::ControlLoop;

use crate::board::{Drive, LOOP_PERIOD_MS};
use crate::channels::{DIAG_LINES, RX_BYTES};

/// Byte source backed by the RX queue
struct QueueSource;

impl ByteSource for QueueSource {
    fn poll_byte(&mut self) -> Option<u8> {
        RX_BYTES.try_receive().ok()
    }
}

/// Clock backed by the embassy time driver
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Drive task - owns the tracks and the control loop
#[embassy_executor::task]
pub async fn drive_task(drive: Drive) {
    info!("Drive task started");

    let mut control = ControlLoop::new(QueueSource, EmbassyClock, drive, DriveConfig::default());
    report(Diagnostic::Ready);

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_PERIOD_MS));

    loop {
        let diagnostics = control.step();
        if let Some(line) = control.take_line() {
            trace!("cmd: {=[u8]:a}", line.as_slice());
        }
        for diag in diagnostics {
            report(diag);
        }

        let actuator = control.controller_mut().actuator_mut();
        if actuator.has_fault() {
            error!("Track output fault");
            actuator.clear_fault();
        }

        ticker.next().await;
    }
}

/// Log a diagnostic and queue it for the host
fn report(diag: Diagnostic) {
    match diag.severity() {
        Severity::Info => match diag {
            Diagnostic::Drive(targets) => debug!("{:?}", targets),
            _ => info!("{}", Display2Format(&diag)),
        },
        Severity::Warn => warn!("{}", Display2Format(&diag)),
    }

    if DIAG_LINES.try_send(diag.to_line()).is_err() {
        warn!("Diagnostic queue full, dropping line");
    }
}
