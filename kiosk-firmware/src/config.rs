//! Embedded kiosk configuration
//!
//! kiosk.toml is compiled into the firmware and validated by build.rs, so a
//! parse failure here means the two parsers disagree. The kiosk then runs
//! on built-in defaults rather than refusing to boot.

use defmt::*;

use kiosk_core::config::{parse_config, KioskConfig};

/// Edit kiosk.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../kiosk.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> KioskConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Parsed embedded configuration: {} welcome pages, {} allowed cards",
                config.welcome.len(),
                config.auth.allowed.len()
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", defmt::Debug2Format(&e));
            error!("Using built-in defaults");
            KioskConfig::default()
        }
    }
}
