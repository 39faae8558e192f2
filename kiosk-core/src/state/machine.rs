//! Display state machine definition
//!
//! Exactly one state owns the display and the servo at any time. The
//! transition table here is pure; entry actions (rendering, arming timers,
//! running the feedback motion) belong to the controller.

use super::events::Event;

/// Display states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayState {
    /// Power-on greeting, paged through on a fixed interval
    WelcomeSequence,
    /// Waiting for a card to authenticate
    AwaitingAuth,
    /// Card rejected; shown for a fixed time
    AuthFailure,
    /// Ready for commands, current angle visible
    Idle,
    /// Host is working out a command; animated
    Thinking,
    /// Action status shown after a motion
    ExecutingAction,
    /// Card presented during a session; shown for a fixed time
    RfidDetected,
    /// Shutdown message shown for a fixed time
    ShuttingDown,
    /// Display blanked after shutdown; nothing more happens
    Halted,
}

impl DisplayState {
    /// Check if this state accepts action commands
    pub fn accepts_commands(&self) -> bool {
        matches!(
            self,
            DisplayState::Idle | DisplayState::Thinking | DisplayState::ExecutingAction
        )
    }

    /// Check if this state polls the card reader
    ///
    /// The scanned-card screen does not poll, so a card held on the reader
    /// is shown once.
    pub fn polls_reader(&self) -> bool {
        matches!(
            self,
            DisplayState::AwaitingAuth
                | DisplayState::Idle
                | DisplayState::Thinking
                | DisplayState::ExecutingAction
        )
    }

    /// Check if this state leaves when its window runs out
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            DisplayState::AuthFailure
                | DisplayState::ExecutingAction
                | DisplayState::RfidDetected
                | DisplayState::ShuttingDown
        )
    }

    /// Check if this state belongs to an authenticated session
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            DisplayState::Idle
                | DisplayState::Thinking
                | DisplayState::ExecutingAction
                | DisplayState::RfidDetected
        )
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, DisplayState::Halted)
    }

    /// Process an event and return the next state
    ///
    /// Pairs not listed leave the state unchanged.
    pub fn transition(self, event: Event) -> Self {
        use DisplayState::*;
        use Event::*;

        match (self, event) {
            // Shutdown is reachable from every live state
            (ShuttingDown | Halted, ShutdownRequested) => self,
            (_, ShutdownRequested) => ShuttingDown,

            // Welcome
            (WelcomeSequence, WelcomeFinished) => AwaitingAuth,
            (WelcomeSequence, ResetRequested) => AwaitingAuth,

            // Authentication
            (AwaitingAuth, CardAccepted) => Idle,
            (AwaitingAuth, CardRejected) => AuthFailure,
            (AuthFailure, DisplayExpired) => AwaitingAuth,

            // A card interrupts any session state but its own screen
            (Idle | Thinking | ExecutingAction, CardScanned) => RfidDetected,

            // Idle
            (Idle, ThinkingStarted) => Thinking,
            (Idle, ActionStarted) => ExecutingAction,

            // Thinking
            (Thinking, ThinkingStopped) => Idle,
            (Thinking, ActionStarted) => ExecutingAction,

            // Action status
            (ExecutingAction, DisplayExpired) => Idle,
            (ExecutingAction, ActionStarted) => ExecutingAction,
            (ExecutingAction, ThinkingStarted) => Thinking,
            (ExecutingAction, ThinkingStopped) => Idle,

            // Card scanned
            (RfidDetected, DisplayExpired) => Idle,

            // Session reset forces re-authentication
            (s, ResetRequested) if s.is_session() => AwaitingAuth,

            // Shutdown
            (ShuttingDown, DisplayExpired) => Halted,
            (ShuttingDown, Restart) => WelcomeSequence,

            // Default: stay in current state
            _ => self,
        }
    }
}
