//! Configuration types
//!
//! Board-agnostic configuration structures plus the `kiosk.toml` parser.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError};
pub use types::*;
