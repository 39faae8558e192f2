//! Kiosk controller coordinating display state, card reader and actuator
//!
//! The controller is the single owner of everything that changes at runtime:
//! - Current display state and its timers and cursors
//! - The display, actuator and card reader
//! - The observability stream sink
//!
//! It is driven by [`Kiosk::tick`] from one cooperative loop. Every state
//! entry re-initializes that state's timers and cursors.

use core::fmt;

use crate::card::Uid;
use crate::command::Command;
use crate::config::{KioskConfig, ShutdownPolicy};
use crate::dispatch::{Action, DispatchError};
use crate::display::{screens, DisplayExt, Frame};
use crate::state::{DisplayState, Event};
use crate::timer::{Periodic, Phase};
use crate::traits::{Actuator, CardReader, CharDisplay};

/// Display/state controller
pub struct Kiosk<D, A, R, L> {
    /// Runtime configuration
    config: KioskConfig,
    /// Two-line character display
    display: D,
    /// Servo motions
    actuator: A,
    /// RFID reader
    reader: R,
    /// Observability stream
    log: L,
    /// Current display state
    state: DisplayState,
    /// Window for timed states
    phase: Phase,
    /// Interval for welcome pages and thinking frames
    periodic: Periodic,
    /// Welcome page being shown
    welcome_index: usize,
    /// Thinking frame being shown
    thinking_frame: usize,
    /// Card shown by the scanned-card screen
    last_card: Option<Uid>,
}

impl<D, A, R, L> Kiosk<D, A, R, L>
where
    D: CharDisplay,
    A: Actuator,
    R: CardReader,
    L: fmt::Write,
{
    /// Create a controller; nothing is drawn until [`Kiosk::boot`]
    pub fn new(config: KioskConfig, display: D, actuator: A, reader: R, log: L) -> Self {
        let timing = config.timing;
        Self {
            config,
            display,
            actuator,
            reader,
            log,
            state: DisplayState::WelcomeSequence,
            phase: Phase::deferred(timing.action_display_ms),
            periodic: Periodic::new(timing.welcome_interval_ms, 0),
            welcome_index: 0,
            thinking_frame: 0,
            last_card: None,
        }
    }

    /// Start the welcome sequence
    pub fn boot(&mut self, now_ms: u32) {
        self.enter(DisplayState::WelcomeSequence, now_ms);
    }

    /// Get current state
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Check if the kiosk has halted after shutdown
    pub fn is_halted(&self) -> bool {
        self.state.is_terminal()
    }

    /// Welcome page currently shown
    pub fn welcome_index(&self) -> usize {
        self.welcome_index
    }

    /// Thinking animation frame currently shown
    pub fn thinking_frame(&self) -> usize {
        self.thinking_frame
    }

    /// Runtime configuration
    pub fn config(&self) -> &KioskConfig {
        &self.config
    }

    /// Display driver
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Observability stream sink
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Observability stream sink, for draining
    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    /// Periodic tick update
    ///
    /// Call this regularly with the current timestamp and at most one
    /// decoded host command. A command that changes state ends the tick, so
    /// a blocking action never shares a tick with timer checks. Returns the
    /// event behind a state change, if any.
    pub fn tick(&mut self, now_ms: u32, command: Option<Command>) -> Option<Event> {
        if let Some(command) = command {
            if let Ok(Some(event)) = self.command(command, now_ms) {
                return Some(event);
            }
        }

        self.step(now_ms)
    }

    /// Apply one host command
    pub fn command(
        &mut self,
        command: Command,
        now_ms: u32,
    ) -> Result<Option<Event>, DispatchError> {
        let event = match command {
            Command::Action(request) => {
                self.dispatch(&request.name, request.argument)?;
                return Ok(Some(Event::ActionStarted));
            }
            Command::ThinkingStart => Event::ThinkingStarted,
            Command::IdleState => Event::ThinkingStopped,
            Command::Reset => Event::ResetRequested,
            Command::Shutdown => Event::ShutdownRequested,
        };
        Ok(self.fire(event, now_ms))
    }

    /// Run a named action
    ///
    /// Shows the action's status screen, enters the action state and runs
    /// the action to completion. The status window starts on the first tick
    /// after the action returns. Unknown names, and any name outside the
    /// command-taking states, are logged and change nothing.
    pub fn dispatch(&mut self, name: &str, argument: i32) -> Result<Action, DispatchError> {
        if !self.state.accepts_commands() {
            let _ = writeln!(self.log, "Command ignored: {}", name);
            return Err(DispatchError::NotReady);
        }

        let action = match Action::resolve(name, argument) {
            Ok(action) => action,
            Err(e) => {
                let _ = writeln!(self.log, "Unknown command: {}", name);
                return Err(e);
            }
        };

        self.render(&action.banner(&self.config.servo));
        self.state = self.state.transition(Event::ActionStarted);
        self.phase = Phase::deferred(self.config.timing.action_display_ms);

        action.run(&mut self.actuator, &mut self.log);
        Ok(action)
    }

    /// Per-state behavior for one tick
    fn step(&mut self, now_ms: u32) -> Option<Event> {
        if self.state.polls_reader() {
            if let Some(uid) = self.reader.poll() {
                return self.card(uid, now_ms);
            }
        }

        if self.state.is_timed() {
            return self.expire(now_ms);
        }

        match self.state {
            DisplayState::WelcomeSequence => {
                if !self.periodic.due(now_ms) {
                    return None;
                }
                self.welcome_index += 1;
                match self.config.welcome.get(self.welcome_index) {
                    Some(page) => {
                        let frame = screens::welcome(page);
                        self.render(&frame);
                        None
                    }
                    None => self.fire(Event::WelcomeFinished, now_ms),
                }
            }
            DisplayState::Thinking => {
                if !self.periodic.due(now_ms) {
                    return None;
                }
                let count = self.config.thinking.frames.len();
                if count > 0 {
                    self.thinking_frame = (self.thinking_frame + 1) % count;
                }
                let (col, field) = screens::thinking_field(&self.config.thinking, self.thinking_frame);
                let _ = self.display.draw_field(0, col, &field);
                None
            }
            _ => None,
        }
    }

    /// Handle a card seen by the reader
    fn card(&mut self, uid: Uid, now_ms: u32) -> Option<Event> {
        if self.state == DisplayState::AwaitingAuth {
            let _ = writeln!(self.log, "Card detected for auth! UID:{}", uid);
            return if self.config.auth.verify(&uid) {
                self.fire(Event::CardAccepted, now_ms)
            } else if self.config.auth.failure_screen {
                self.fire(Event::CardRejected, now_ms)
            } else {
                None
            };
        }

        let _ = writeln!(self.log, "Card detected! UID: {}", uid);
        self.last_card = Some(uid);
        self.fire(Event::CardScanned, now_ms)
    }

    /// End a timed state once its window has run out
    fn expire(&mut self, now_ms: u32) -> Option<Event> {
        if !self.phase.expired(now_ms) {
            return None;
        }
        match (self.state, self.config.shutdown) {
            (DisplayState::ShuttingDown, ShutdownPolicy::Restart) => {
                self.fire(Event::Restart, now_ms)
            }
            _ => self.fire(Event::DisplayExpired, now_ms),
        }
    }

    /// Feed an event to the state machine and run entry on a change
    fn fire(&mut self, event: Event, now_ms: u32) -> Option<Event> {
        let next = self.state.transition(event);
        if next == self.state {
            return None;
        }
        self.enter(next, now_ms);
        Some(event)
    }

    /// Entry actions
    fn enter(&mut self, state: DisplayState, now_ms: u32) {
        self.state = state;
        let timing = self.config.timing;

        match state {
            DisplayState::WelcomeSequence => {
                self.welcome_index = 0;
                self.periodic = Periodic::new(timing.welcome_interval_ms, now_ms);
                let frame = self
                    .config
                    .welcome
                    .first()
                    .map(screens::welcome)
                    .unwrap_or_default();
                self.render(&frame);
            }
            DisplayState::AwaitingAuth => {
                self.render(&screens::awaiting_auth());
            }
            DisplayState::AuthFailure => {
                self.render(&screens::auth_failure());
                self.phase = Phase::started(timing.auth_fail_display_ms, now_ms);
            }
            DisplayState::Idle => {
                self.render(&screens::idle(self.actuator.current_angle()));
            }
            DisplayState::Thinking => {
                self.thinking_frame = 0;
                self.periodic = Periodic::new(timing.animation_interval_ms, now_ms);
                let frame = screens::thinking(&self.config.thinking, 0);
                self.render(&frame);
            }
            DisplayState::ExecutingAction => {
                self.phase = Phase::deferred(timing.action_display_ms);
            }
            DisplayState::RfidDetected => {
                if let Some(uid) = &self.last_card {
                    let frame = screens::card_scanned(uid);
                    self.render(&frame);
                }
                self.phase = Phase::started(timing.rfid_display_ms, now_ms);
                self.actuator.shake_silent(1);
            }
            DisplayState::ShuttingDown => {
                self.render(&screens::shutdown());
                self.phase = Phase::started(timing.shutdown_display_ms, now_ms);
            }
            DisplayState::Halted => {
                let _ = self.display.clear();
            }
        }
    }

    /// Full redraw; a failed write leaves the display stale until the next
    fn render(&mut self, frame: &Frame) {
        let _ = self.display.draw_frame(frame);
    }
}
