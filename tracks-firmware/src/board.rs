//! Board wiring
//!
//! ```text
//! ┌─────────┬───────────┬───────────┐
//! │ SIGNAL  │ LEFT      │ RIGHT     │
//! ├─────────┼───────────┼───────────┤
//! │ VCC     │ GPIO2     │ GPIO6     │
//! │ PWM     │ GPIO3 (1B)│ GPIO7 (3B)│
//! │ DIR     │ GPIO4     │ GPIO8     │
//! └─────────┴───────────┴───────────┘
//! Host link: UART0 TX=GPIO0, RX=GPIO1
//! ```

use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use tracks_core::config::DUTY_MAX;
use tracks_drivers::motor::{DifferentialDrive, HBridgeConfig, HBridgeTrack};

/// Host link baud rate
pub const UART_BAUD: u32 = 115_200;

/// UART ring buffer sizes
pub const UART_BUF_SIZE: usize = 256;

/// PWM counter top; one count per duty step
pub const PWM_TOP: u16 = DUTY_MAX;

/// Control loop period in milliseconds
pub const LOOP_PERIOD_MS: u64 = 1;

/// One track's H-bridge on this board
pub type TrackDriver = HBridgeTrack<PwmOutput<'static>, Output<'static>, Output<'static>>;

/// Both tracks on this board
pub type Drive = DifferentialDrive<PwmOutput<'static>, Output<'static>, Output<'static>>;

/// PWM configuration for a track output, starting at zero duty
pub fn pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.top = PWM_TOP;
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// Build a track driver from a channel-B PWM slice and its control lines
///
/// Returns `None` if the slice has no channel B output.
pub fn track(pwm: Pwm<'static>, dir: Output<'static>, vcc: Output<'static>) -> Option<TrackDriver> {
    let (_, output) = pwm.split();
    let config = HBridgeConfig {
        duty_max: DUTY_MAX,
        ..HBridgeConfig::default()
    };
    Some(HBridgeTrack::new(output?, dir, vcc, config))
}
