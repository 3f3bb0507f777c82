//! Command interpreter and drive controller
//!
//! The controller is the only place decisions are made:
//! - Classifies assembled lines into commands
//! - Mixes accepted move commands into track targets
//! - Refreshes the heartbeat on every accepted command
//! - Blanks both tracks once per outage when the heartbeat expires
//!
//! All state is held in an explicit [`ControllerState`] owned by the
//! controller, which in turn is owned by the control loop.

use tracks_protocol::Command;

use crate::config::DriveConfig;
use crate::diagnostics::{line_text, Diagnostic};
use crate::drive::{mix, DriveTargets};
use crate::safety::{HeartbeatWatchdog, LinkState, WatchdogEvent};
use crate::traits::{Actuator, Track};

/// Mutable controller state
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Heartbeat recency and outage flag
    pub watchdog: HeartbeatWatchdog,
    /// Targets most recently written to the actuator
    pub targets: DriveTargets,
}

/// Drive controller coordinating the interpreter, mixer and watchdog
pub struct DriveController<A: Actuator> {
    actuator: A,
    config: DriveConfig,
    state: ControllerState,
}

impl<A: Actuator> DriveController<A> {
    /// Create a controller and bring the power stage up
    ///
    /// Enables both track supplies and writes zero duty. Liveness is
    /// assumed at `now_us`.
    pub fn new(mut actuator: A, config: DriveConfig, now_us: u64) -> Self {
        for track in Track::ALL {
            actuator.enable_power(track, true);
            actuator.set_duty(track, 0);
        }

        Self {
            actuator,
            config,
            state: ControllerState {
                watchdog: HeartbeatWatchdog::new(now_us, config.heartbeat_timeout_us),
                targets: DriveTargets::default(),
            },
        }
    }

    /// Interpret one assembled line
    ///
    /// Returns the diagnostic to report, if any. Bad lines never change
    /// actuator state or the heartbeat.
    pub fn handle_line(&mut self, line: &[u8], now_us: u64) -> Option<Diagnostic> {
        let command = Command::parse(line);
        if command.is_accepted() {
            self.state.watchdog.refresh(now_us);
        }

        match command {
            Command::Heartbeat => None,
            Command::Move { linear, angular } => {
                let targets = mix(linear, angular, &self.config);
                self.apply(targets);
                Some(Diagnostic::Drive(targets))
            }
            Command::Unknown => Some(Diagnostic::UnknownCommand(line_text(line))),
            Command::Invalid(error) => Some(Diagnostic::ParseError {
                line: line_text(line),
                error,
            }),
        }
    }

    /// Run the watchdog check
    ///
    /// On the first check after the heartbeat window expires, zeroes both
    /// duties (directions untouched) and reports [`Diagnostic::HeartbeatLost`].
    /// Subsequent checks during the same outage do nothing.
    pub fn tick(&mut self, now_us: u64) -> Option<Diagnostic> {
        match self.state.watchdog.check(now_us)? {
            WatchdogEvent::Tripped => {
                let blanked = self.state.targets.blanked();
                for track in Track::ALL {
                    self.actuator.set_duty(track, 0);
                }
                self.state.targets = blanked;
                Some(Diagnostic::HeartbeatLost)
            }
        }
    }

    /// Stop both tracks and cut their supply
    pub fn shutdown(&mut self) -> Diagnostic {
        for track in Track::ALL {
            self.actuator.set_duty(track, 0);
            self.actuator.enable_power(track, false);
        }
        self.state.targets = self.state.targets.blanked();
        Diagnostic::Shutdown
    }

    /// Write targets to the actuator, direction before duty
    fn apply(&mut self, targets: DriveTargets) {
        for track in Track::ALL {
            let target = targets.get(track);
            self.actuator.set_direction(track, target.direction);
            self.actuator.set_duty(track, target.magnitude);
        }
        self.state.targets = targets;
    }

    /// Targets most recently written to the actuator
    pub fn targets(&self) -> DriveTargets {
        self.state.targets
    }

    /// Current host link state
    pub fn link_state(&self) -> LinkState {
        self.state.watchdog.state()
    }

    /// Get the controller state
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Get the configuration
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Get the actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Get the actuator mutably (for fault inspection by the caller)
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::HEARTBEAT_TIMEOUT_US;
    use crate::drive::TrackTarget;
    use crate::traits::Direction;
    use tracks_protocol::ParseError;

    /// Actuator write, in call order
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Write {
        Duty(Track, u16),
        Direction(Track, Direction),
        Power(Track, bool),
    }

    /// Actuator that records every write
    #[derive(Debug, Default)]
    pub struct RecordingActuator {
        pub writes: Vec<Write>,
    }

    impl RecordingActuator {
        pub fn last_duty(&self, track: Track) -> Option<u16> {
            self.writes.iter().rev().find_map(|w| match *w {
                Write::Duty(t, duty) if t == track => Some(duty),
                _ => None,
            })
        }

        pub fn last_direction(&self, track: Track) -> Option<Direction> {
            self.writes.iter().rev().find_map(|w| match *w {
                Write::Direction(t, dir) if t == track => Some(dir),
                _ => None,
            })
        }
    }

    impl Actuator for RecordingActuator {
        fn set_duty(&mut self, track: Track, duty: u16) {
            self.writes.push(Write::Duty(track, duty));
        }

        fn set_direction(&mut self, track: Track, direction: Direction) {
            self.writes.push(Write::Direction(track, direction));
        }

        fn enable_power(&mut self, track: Track, on: bool) {
            self.writes.push(Write::Power(track, on));
        }
    }

    fn controller() -> DriveController<RecordingActuator> {
        DriveController::new(RecordingActuator::default(), DriveConfig::default(), 0)
    }

    #[test]
    fn test_startup_powers_tracks_with_zero_duty() {
        let controller = controller();
        assert_eq!(
            controller.actuator().writes,
            vec![
                Write::Power(Track::Left, true),
                Write::Duty(Track::Left, 0),
                Write::Power(Track::Right, true),
                Write::Duty(Track::Right, 0),
            ]
        );
        assert_eq!(controller.link_state(), LinkState::Live);
    }

    #[test]
    fn test_move_straight() {
        let mut controller = controller();
        let diag = controller.handle_line(b"move 50 0", 1_000);

        // Positive mix drives the inverted direction line BACKWARD
        let expected = TrackTarget {
            magnitude: 500,
            direction: Direction::Backward,
        };
        assert_eq!(controller.targets().left, expected);
        assert_eq!(controller.targets().right, expected);
        assert_eq!(diag, Some(Diagnostic::Drive(controller.targets())));

        let actuator = controller.actuator();
        assert_eq!(actuator.last_duty(Track::Left), Some(500));
        assert_eq!(actuator.last_duty(Track::Right), Some(500));
        assert_eq!(actuator.last_direction(Track::Left), Some(Direction::Backward));

        controller.handle_line(b"move -50 0", 2_000);
        let expected = TrackTarget {
            magnitude: 500,
            direction: Direction::Forward,
        };
        assert_eq!(controller.targets().left, expected);
        assert_eq!(controller.targets().right, expected);
        assert_eq!(
            controller.actuator().last_direction(Track::Right),
            Some(Direction::Forward)
        );
    }

    #[test]
    fn test_direction_written_before_duty() {
        let mut controller = controller();
        controller.handle_line(b"move 0 50", 1_000);

        let writes = &controller.actuator().writes[4..];
        assert_eq!(
            writes,
            &[
                Write::Direction(Track::Left, Direction::Forward),
                Write::Duty(Track::Left, 500),
                Write::Direction(Track::Right, Direction::Backward),
                Write::Duty(Track::Right, 500),
            ]
        );
    }

    #[test]
    fn test_parse_error_changes_nothing() {
        let mut controller = controller();
        controller.handle_line(b"move 10 0", 0);
        let writes_before = controller.actuator().writes.len();

        let diag = controller.handle_line(b"move abc 1", 2_000_000);
        assert_eq!(
            diag,
            Some(Diagnostic::ParseError {
                line: line_text(b"move abc 1"),
                error: ParseError::InvalidNumber,
            })
        );
        assert_eq!(controller.actuator().writes.len(), writes_before);
        assert_eq!(controller.targets().left.magnitude, 100);

        // Heartbeat not refreshed: still measured from t=0
        assert_eq!(controller.state().watchdog.last_seen_us(), 0);
        assert_eq!(
            controller.tick(HEARTBEAT_TIMEOUT_US + 1),
            Some(Diagnostic::HeartbeatLost)
        );
    }

    #[test]
    fn test_unknown_command_changes_nothing() {
        let mut controller = controller();
        let writes_before = controller.actuator().writes.len();

        let diag = controller.handle_line(b"stop", 2_000_000);
        assert_eq!(diag, Some(Diagnostic::UnknownCommand(line_text(b"stop"))));
        assert_eq!(controller.actuator().writes.len(), writes_before);
        assert_eq!(controller.state().watchdog.last_seen_us(), 0);
    }

    #[test]
    fn test_heartbeat_is_idempotent() {
        let mut controller = controller();
        controller.handle_line(b"move 20 5", 0);
        let targets = controller.targets();
        let writes_before = controller.actuator().writes.len();

        for i in 1..20u64 {
            assert_eq!(controller.handle_line(b"heartbeat", i * 1_000_000), None);
            assert_eq!(controller.tick(i * 1_000_000 + 500), None);
        }

        assert_eq!(controller.targets(), targets);
        assert_eq!(controller.actuator().writes.len(), writes_before);
    }

    #[test]
    fn test_watchdog_trip_blanks_once() {
        let mut controller = controller();
        controller.handle_line(b"move 0 50", 0);

        let mut lost = 0;
        let mut now = 0;
        while now < 10_000_000 {
            if controller.tick(now) == Some(Diagnostic::HeartbeatLost) {
                lost += 1;
            }
            now += 10_000;
        }
        assert_eq!(lost, 1);
        assert_eq!(controller.link_state(), LinkState::TimedOut);

        // Magnitudes zeroed, directions kept
        let targets = controller.targets();
        assert_eq!(targets.left.magnitude, 0);
        assert_eq!(targets.right.magnitude, 0);
        assert_eq!(targets.left.direction, Direction::Forward);
        assert_eq!(targets.right.direction, Direction::Backward);
        assert_eq!(controller.actuator().last_duty(Track::Left), Some(0));
        assert_eq!(controller.actuator().last_duty(Track::Right), Some(0));
        assert_eq!(
            controller.actuator().last_direction(Track::Left),
            Some(Direction::Forward)
        );

        // Exactly two zero writes after the move
        let zero_writes = controller.actuator().writes[8..]
            .iter()
            .filter(|w| matches!(w, Write::Duty(_, 0)))
            .count();
        assert_eq!(zero_writes, 2);
    }

    #[test]
    fn test_move_recovers_from_timeout() {
        let mut controller = controller();
        controller.handle_line(b"move 30 0", 0);
        assert!(controller.tick(HEARTBEAT_TIMEOUT_US + 1).is_some());

        let diag = controller.handle_line(b"move 30 0", HEARTBEAT_TIMEOUT_US + 2);
        assert!(matches!(diag, Some(Diagnostic::Drive(_))));
        assert_eq!(controller.link_state(), LinkState::Live);
        assert_eq!(controller.actuator().last_duty(Track::Left), Some(300));
        assert_eq!(controller.actuator().last_duty(Track::Right), Some(300));
    }

    #[test]
    fn test_heartbeat_recovers_without_restoring_duty() {
        let mut controller = controller();
        controller.handle_line(b"move 30 0", 0);
        assert!(controller.tick(HEARTBEAT_TIMEOUT_US + 1).is_some());

        assert_eq!(controller.handle_line(b"heartbeat", 4_000_000), None);
        assert_eq!(controller.link_state(), LinkState::Live);
        assert_eq!(controller.targets().left.magnitude, 0);

        // A fresh outage is reported again
        assert_eq!(
            controller.tick(4_000_000 + HEARTBEAT_TIMEOUT_US + 1),
            Some(Diagnostic::HeartbeatLost)
        );
    }

    #[test]
    fn test_shutdown_cuts_power() {
        let mut controller = controller();
        controller.handle_line(b"move 30 0", 0);

        assert_eq!(controller.shutdown(), Diagnostic::Shutdown);
        let writes = &controller.actuator().writes;
        assert!(writes.contains(&Write::Power(Track::Left, false)));
        assert!(writes.contains(&Write::Power(Track::Right, false)));
        assert_eq!(controller.targets().left.magnitude, 0);
    }
}
