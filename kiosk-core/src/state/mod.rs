//! Display state machine
//!
//! The state machine is explicit, finite, and deterministic. Timing and
//! rendering live in the controller.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::DisplayState;
