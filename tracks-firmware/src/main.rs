//! Tracks controller firmware
//!
//! Main firmware binary for an RP2040 driving two tracked-chassis motors
//! through H-bridge modules. The host streams `move`/`heartbeat` lines over
//! UART0; the drive task mixes them into track duties and stops the tracks
//! when the host goes quiet.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use tracks_drivers::motor::DifferentialDrive;
use {defmt_rtt as _, panic_probe as _};

mod board;
mod channels;
mod tasks;

use board::UART_BUF_SIZE;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tracks firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::UART_BAUD;

    let tx_buf = TX_BUF.init([0u8; UART_BUF_SIZE]);
    let rx_buf = RX_BUF.init([0u8; UART_BUF_SIZE]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", board::UART_BAUD);

    // Tracks: PWM on channel B of slices 1 and 3, supply and direction low
    let left_pwm = Pwm::new_output_b(p.PWM_SLICE1, p.PIN_3, board::pwm_config());
    let right_pwm = Pwm::new_output_b(p.PWM_SLICE3, p.PIN_7, board::pwm_config());

    let left = board::track(
        left_pwm,
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_2, Level::Low),
    );
    let right = board::track(
        right_pwm,
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_6, Level::Low),
    );

    let (Some(left), Some(right)) = (left, right) else {
        defmt::panic!("Track PWM output unavailable");
    };
    let drive = DifferentialDrive::new(left, right);

    info!("Track drivers initialized");

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::drive_task(drive)).unwrap();

    info!("All tasks spawned, firmware running");
}
