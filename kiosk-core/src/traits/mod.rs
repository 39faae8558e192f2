//! Hardware abstraction traits
//!
//! These traits define the interface between the display/state controller
//! and hardware-specific implementations.

pub mod actuator;
pub mod display;
pub mod reader;

pub use actuator::{Actuator, ServoOutput};
pub use display::{CharDisplay, DisplayError};
pub use reader::CardReader;
