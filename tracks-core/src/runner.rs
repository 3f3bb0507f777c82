//! Non-blocking control loop
//!
//! One [`ControlLoop::step`] does a bounded amount of work:
//! 1. Drain pending bytes until a line completes, a line overflows, the
//!    source runs dry, or the byte budget is spent
//! 2. Interpret the completed line, if any
//! 3. Run the watchdog check
//!
//! The watchdog runs on every step regardless of serial traffic, so a
//! host that floods the link cannot starve it.

use heapless::Vec;
use tracks_protocol::{Line, LineAssembler, LineError, LINE_MAX};

use crate::config::DriveConfig;
use crate::controller::DriveController;
use crate::diagnostics::Diagnostic;
use crate::traits::{Actuator, ByteSource, Clock};

/// Most bytes consumed by a single step
pub const STEP_BYTE_BUDGET: usize = LINE_MAX + 1;

/// Diagnostics produced by one step: at most one from input, one from the watchdog
pub type StepDiagnostics = Vec<Diagnostic, 2>;

/// Control loop wiring a byte source and clock to the drive controller
pub struct ControlLoop<S: ByteSource, C: Clock, A: Actuator> {
    source: S,
    clock: C,
    assembler: LineAssembler,
    controller: DriveController<A>,
    /// Most recent complete line, kept for the caller's debug log
    last_line: Option<Line>,
}

impl<S: ByteSource, C: Clock, A: Actuator> ControlLoop<S, C, A> {
    /// Create the loop and initialize the drive
    pub fn new(source: S, clock: C, actuator: A, config: DriveConfig) -> Self {
        let controller = DriveController::new(actuator, config, clock.now_us());
        Self {
            source,
            clock,
            assembler: LineAssembler::new(),
            controller,
            last_line: None,
        }
    }

    /// Run one iteration of the loop
    pub fn step(&mut self) -> StepDiagnostics {
        let mut diagnostics = StepDiagnostics::new();

        if let Some(diag) = self.poll_input() {
            // Cannot fail: at most one input diagnostic per step
            let _ = diagnostics.push(diag);
        }

        if let Some(diag) = self.controller.tick(self.clock.now_us()) {
            let _ = diagnostics.push(diag);
        }

        diagnostics
    }

    fn poll_input(&mut self) -> Option<Diagnostic> {
        for _ in 0..STEP_BYTE_BUDGET {
            let byte = self.source.poll_byte()?;

            match self.assembler.feed(byte) {
                Ok(Some(line)) => {
                    let diag = self.controller.handle_line(&line, self.clock.now_us());
                    self.last_line = Some(line);
                    return diag;
                }
                Ok(None) => {}
                Err(LineError::Overflow) => return Some(Diagnostic::LineOverflow),
            }
        }
        None
    }

    /// Get the drive controller
    pub fn controller(&self) -> &DriveController<A> {
        &self.controller
    }

    /// Get the drive controller mutably
    pub fn controller_mut(&mut self) -> &mut DriveController<A> {
        &mut self.controller
    }

    /// Take the line interpreted by the most recent step, if any
    pub fn take_line(&mut self) -> Option<Line> {
        self.last_line.take()
    }

    /// Get the byte source mutably
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
