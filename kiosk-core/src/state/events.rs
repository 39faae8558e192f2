//! Events that trigger display state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Last welcome page has been shown for its interval
    WelcomeFinished,
    /// Shutdown policy is restart and the shutdown message expired
    Restart,

    // Card reader events
    /// Authentication card matched the policy
    CardAccepted,
    /// Authentication card did not match the policy
    CardRejected,
    /// A card was presented during a session
    CardScanned,

    // Host control words
    /// Host started working out a command
    ThinkingStarted,
    /// Host went back to idle
    ThinkingStopped,
    /// Host dropped the session
    ResetRequested,
    /// Host asked for shutdown
    ShutdownRequested,

    // Actions
    /// A motion command was dispatched
    ActionStarted,

    // Timers
    /// The current timed screen ran out
    DisplayExpired,
}
