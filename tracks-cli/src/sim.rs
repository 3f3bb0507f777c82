//! Hosted controller simulation
//!
//! Runs the same control loop as the firmware, with stdin as the serial
//! link and a logging actuator in place of the H-bridges. Useful for
//! checking command streams and watchdog timing without hardware.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use tracks_core::config::DriveConfig;
use tracks_core::traits::{Actuator, ByteSource, Clock, Direction, Track};
use tracks_core::{ControlLoop, Diagnostic};

use crate::error::Result;

/// Byte source fed from a channel
pub struct ChannelSource {
    rx: Receiver<u8>,
    closed: bool,
}

impl ChannelSource {
    pub fn new(rx: Receiver<u8>) -> Self {
        Self { rx, closed: false }
    }

    /// Spawn a thread forwarding stdin into a new source
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut stdin = io::stdin().lock();
            let mut buf = [0u8; 64];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        for &byte in &buf[..n] {
                            if tx.send(byte).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Self::new(rx)
    }

    /// Check if the sender is gone and every byte has been consumed
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for ChannelSource {
    fn poll_byte(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(byte) => Some(byte),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}

/// Monotonic clock measured from creation
pub struct HostClock {
    start: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for HostClock {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// State of one simulated track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTrack {
    pub duty: u16,
    pub direction: Direction,
    pub powered: bool,
}

impl Default for SimTrack {
    fn default() -> Self {
        Self {
            duty: 0,
            direction: Direction::Backward,
            powered: false,
        }
    }
}

/// Actuator that logs writes and remembers the resulting output state
#[derive(Debug, Default)]
pub struct LoggingActuator {
    left: SimTrack,
    right: SimTrack,
}

impl LoggingActuator {
    pub fn track(&self, track: Track) -> SimTrack {
        match track {
            Track::Left => self.left,
            Track::Right => self.right,
        }
    }

    fn track_mut(&mut self, track: Track) -> &mut SimTrack {
        match track {
            Track::Left => &mut self.left,
            Track::Right => &mut self.right,
        }
    }
}

impl Actuator for LoggingActuator {
    fn set_duty(&mut self, track: Track, duty: u16) {
        debug!(?track, duty, "set duty");
        self.track_mut(track).duty = duty;
    }

    fn set_direction(&mut self, track: Track, direction: Direction) {
        debug!(?track, ?direction, "set direction");
        self.track_mut(track).direction = direction;
    }

    fn enable_power(&mut self, track: Track, on: bool) {
        debug!(?track, on, "enable power");
        self.track_mut(track).powered = on;
    }
}

/// Simulated controller
pub type Simulator<C> = ControlLoop<ChannelSource, C, LoggingActuator>;

/// Run the simulator until stdin closes
pub fn run(tick: Duration, config: DriveConfig) -> Result<()> {
    info!("Simulating controller, tick {:?}", tick);

    let mut sim = Simulator::new(
        ChannelSource::stdin(),
        HostClock::new(),
        LoggingActuator::default(),
        config,
    );
    println!("{}", Diagnostic::Ready);

    while !sim.source_mut().is_closed() {
        let diagnostics = sim.step();
        if let Some(line) = sim.take_line() {
            debug!("cmd: {}", String::from_utf8_lossy(&line));
        }
        for diag in diagnostics {
            println!("{}", diag);
        }
        thread::sleep(tick);
    }

    println!("{}", sim.controller_mut().shutdown());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StepClock<'a>(&'a Cell<u64>);

    impl Clock for StepClock<'_> {
        fn now_us(&self) -> u64 {
            self.0.get()
        }
    }

    fn feed(tx: &mpsc::Sender<u8>, bytes: &[u8]) {
        for &b in bytes {
            tx.send(b).unwrap();
        }
    }

    #[test]
    fn test_channel_source_reports_close() {
        let (tx, rx) = mpsc::channel();
        let mut source = ChannelSource::new(rx);

        feed(&tx, b"ab");
        drop(tx);

        assert_eq!(source.poll_byte(), Some(b'a'));
        assert_eq!(source.poll_byte(), Some(b'b'));
        assert!(!source.is_closed());
        assert_eq!(source.poll_byte(), None);
        assert!(source.is_closed());
    }

    #[test]
    fn test_simulated_session() {
        let (tx, rx) = mpsc::channel();
        let now = Cell::new(0);
        let mut sim = ControlLoop::new(
            ChannelSource::new(rx),
            StepClock(&now),
            LoggingActuator::default(),
            DriveConfig::default(),
        );

        let actuator = sim.controller().actuator();
        assert!(actuator.track(Track::Left).powered);
        assert!(actuator.track(Track::Right).powered);

        feed(&tx, b"move 0 50\n");
        let diags = sim.step();
        assert_eq!(diags[0].to_string(), "left_pwm: 500, right_pwm: 500");

        let left = sim.controller().actuator().track(Track::Left);
        let right = sim.controller().actuator().track(Track::Right);
        assert_eq!(left.direction, Direction::Forward);
        assert_eq!(right.direction, Direction::Backward);

        // Host goes quiet
        now.set(3_100_000);
        let diags = sim.step();
        assert_eq!(diags.as_slice(), &[Diagnostic::HeartbeatLost]);
        assert_eq!(sim.controller().actuator().track(Track::Left).duty, 0);
        assert_eq!(
            sim.controller().actuator().track(Track::Left).direction,
            Direction::Forward
        );

        drop(tx);
        sim.step();
        assert!(sim.source_mut().is_closed());

        assert_eq!(sim.controller_mut().shutdown(), Diagnostic::Shutdown);
        assert!(!sim.controller().actuator().track(Track::Right).powered);
    }

    #[test]
    fn test_host_clock_is_monotonic() {
        let clock = HostClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
