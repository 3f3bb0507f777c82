//! # Tracks CLI
//!
//! Host companion tool for the tracks controller.
//!
//! ```bash
//! # One command
//! tracks --port /dev/ttyACM0 send "move 20 0"
//!
//! # Drive for five seconds, keeping the link alive
//! tracks --port /dev/ttyACM0 drive 20 5 --seconds 5
//!
//! # Watch device diagnostics
//! tracks --port /dev/ttyACM0 monitor
//!
//! # Run the controller on the host, commands from stdin
//! printf 'move 10 0\n' | tracks simulate
//! ```

use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracks_core::config::{DriveConfig, HEARTBEAT_TIMEOUT_US};
use tracks_protocol::HEARTBEAT_KEYWORD;

mod error;
mod link;
mod sim;

use error::{CliError, Result};
use link::{move_line, DeviceLink};

/// Tracks CLI - drive a tracked chassis over its serial link
#[derive(Parser, Debug)]
#[command(name = "tracks")]
#[command(about = "Host companion tool for the tracks controller", long_about = None)]
#[command(version)]
struct Cli {
    /// Serial port of the controller
    #[arg(short, long, global = true, default_value = "/dev/ttyACM0")]
    port: String,

    /// Serial baud rate
    #[arg(short, long, global = true, default_value_t = 115_200)]
    baud: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one raw command line
    Send {
        /// Line to send, without terminator
        line: String,
    },

    /// Drive at a fixed velocity, sending heartbeats, then stop
    Drive {
        /// Linear velocity
        #[arg(allow_negative_numbers = true)]
        linear: f32,

        /// Angular velocity
        #[arg(allow_negative_numbers = true)]
        angular: f32,

        /// How long to drive
        #[arg(short, long, default_value_t = 2.0)]
        seconds: f32,

        /// Heartbeat period in milliseconds
        #[arg(long, default_value_t = 500)]
        heartbeat_ms: u64,
    },

    /// Print device diagnostics until interrupted
    Monitor,

    /// Run the controller on the host with stdin as the serial link
    Simulate {
        /// Control loop period in milliseconds
        #[arg(long, default_value_t = 1)]
        tick_ms: u64,
    },
}

fn main() {
    // Setup logging (set RUST_LOG=debug for actuator writes)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Send { line } => {
            let mut link = DeviceLink::open(&cli.port, cli.baud)?;
            link.send_line(&line)?;
            info!("Sent {:?}", line);
            Ok(())
        }
        Commands::Drive {
            linear,
            angular,
            seconds,
            heartbeat_ms,
        } => {
            let heartbeat = heartbeat_period(heartbeat_ms)?;
            let duration = drive_duration(seconds)?;
            let mut link = DeviceLink::open(&cli.port, cli.baud)?;
            drive(&mut link, linear, angular, duration, heartbeat)
        }
        Commands::Monitor => {
            let mut link = DeviceLink::open(&cli.port, cli.baud)?;
            info!("Monitoring {}", cli.port);
            loop {
                print_lines(link.poll_lines()?);
            }
        }
        Commands::Simulate { tick_ms } => {
            sim::run(Duration::from_millis(tick_ms.max(1)), DriveConfig::default())
        }
    }
}

/// Validate the heartbeat period against the device timeout
fn heartbeat_period(ms: u64) -> Result<Duration> {
    let period = Duration::from_millis(ms);
    let timeout = Duration::from_micros(HEARTBEAT_TIMEOUT_US);

    if period.is_zero() || period >= timeout {
        return Err(CliError::HeartbeatPeriod { period, timeout });
    }
    Ok(period)
}

/// Convert the requested drive time, rejecting negative or unrepresentable values
fn drive_duration(seconds: f32) -> Result<Duration> {
    Duration::try_from_secs_f32(seconds).map_err(|_| CliError::InvalidDuration { seconds })
}

fn drive(
    link: &mut DeviceLink,
    linear: f32,
    angular: f32,
    duration: Duration,
    heartbeat: Duration,
) -> Result<()> {
    let heartbeat_line = String::from_utf8_lossy(HEARTBEAT_KEYWORD).into_owned();

    info!("Driving linear={} angular={} for {:?}", linear, angular, duration);
    link.send_line(&move_line(linear, angular))?;

    let start = Instant::now();
    let mut last_heartbeat = start;

    while start.elapsed() < duration {
        if last_heartbeat.elapsed() >= heartbeat {
            link.send_line(&heartbeat_line)?;
            last_heartbeat = Instant::now();
        }
        print_lines(link.poll_lines()?);
    }

    info!("Stopping");
    link.send_line(&move_line(0.0, 0.0))?;

    // Let the device echo the final command
    thread::sleep(Duration::from_millis(50));
    print_lines(link.poll_lines()?);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
