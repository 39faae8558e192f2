//! Build script for kiosk-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates kiosk.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Display width; every text row must fit
const LCD_COLS: usize = 16;

/// Capacities of the firmware's fixed-size config tables
const MAX_WELCOME_PAGES: usize = 8;
const MAX_THINKING_FRAMES: usize = 8;
const MAX_ALLOWED_CARDS: usize = 8;

/// Timing keys under [timing]
const TIMING_KEYS: [&str; 6] = [
    "welcome_interval_ms",
    "animation_interval_ms",
    "action_display_ms",
    "shutdown_display_ms",
    "rfid_display_ms",
    "auth_fail_display_ms",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate kiosk.toml configuration at compile time
fn validate_config() {
    // Re-run if kiosk.toml changes
    println!("cargo:rerun-if-changed=kiosk.toml");

    let config_path = Path::new("kiosk.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: kiosk.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a kiosk.toml configuration file.            ║\n\
            ║  Please create one in the kiosk-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read kiosk.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in kiosk.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_servo(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_auth(&config, &mut errors);
    validate_shutdown(&config, &mut errors);
    validate_text(&config, &mut errors);
    report("Invalid kiosk configuration", &errors);

    println!("cargo:warning=kiosk.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with every collected error
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Only known sections; the firmware parser rejects anything else
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let known = ["servo", "timing", "auth", "shutdown", "welcome", "thinking"];
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !known.contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a [section]", name));
        }
    }
}

fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn validate_servo(config: &toml::Value, errors: &mut Vec<String>) {
    let min = int(config, "servo", "min_angle").unwrap_or(0);
    let max = int(config, "servo", "max_angle").unwrap_or(180);
    let initial = int(config, "servo", "initial_angle").unwrap_or(90);

    if !(0..=180).contains(&min) || !(0..=180).contains(&max) {
        errors.push("[servo] angles must be 0-180".to_string());
    }
    if min > max {
        errors.push("[servo] min_angle must not exceed max_angle".to_string());
    }
    if initial < min || initial > max {
        errors.push("[servo] initial_angle must lie within min..max".to_string());
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = config.get("timing").and_then(|t| t.as_table()) else {
        return;
    };
    for (key, value) in timing {
        if !TIMING_KEYS.contains(&key.as_str()) {
            errors.push(format!("[timing] unknown key '{}'", key));
            continue;
        }
        match value.as_integer() {
            Some(ms) if (0..=u32::MAX as i64).contains(&ms) => {}
            _ => errors.push(format!("[timing] {} must be a millisecond count", key)),
        }
    }
}

fn validate_auth(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(auth) = config.get("auth") else {
        return;
    };

    if let Some(policy) = auth.get("policy") {
        if !matches!(policy.as_str(), Some("allow-list" | "accept-any")) {
            errors.push("[auth] policy must be 'allow-list' or 'accept-any'".to_string());
        }
    }

    if let Some(failure_screen) = auth.get("failure_screen") {
        if !failure_screen.is_bool() {
            errors.push("[auth] failure_screen must be true or false".to_string());
        }
    }

    match auth.get("allowed").map(|a| a.as_array()) {
        None => {}
        Some(None) => errors.push("[auth] allowed must be an array".to_string()),
        Some(Some(allowed)) => {
            if allowed.len() > MAX_ALLOWED_CARDS {
                errors.push(format!("[auth] at most {} allowed cards", MAX_ALLOWED_CARDS));
            }
            for uid in allowed {
                let valid = uid.as_str().is_some_and(|hex| {
                    !hex.is_empty()
                        && hex.len() % 2 == 0
                        && hex.len() <= 20
                        && hex.chars().all(|c| c.is_ascii_hexdigit())
                });
                if !valid {
                    errors.push(format!("[auth] '{}' is not a hex UID", uid));
                }
            }
        }
    }
}

fn validate_shutdown(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(policy) = config.get("shutdown").and_then(|s| s.get("policy")) {
        if !matches!(policy.as_str(), Some("halt" | "restart")) {
            errors.push("[shutdown] policy must be 'halt' or 'restart'".to_string());
        }
    }
}

/// Check a string array: type, count and row width
fn check_rows(
    value: Option<&toml::Value>,
    what: &str,
    max_items: usize,
    errors: &mut Vec<String>,
) -> usize {
    let Some(value) = value else {
        return 0;
    };
    let Some(rows) = value.as_array() else {
        errors.push(format!("{} must be an array of strings", what));
        return 0;
    };
    if rows.len() > max_items {
        errors.push(format!("{} has more than {} entries", what, max_items));
    }
    for row in rows {
        match row.as_str() {
            Some(text) if text.chars().count() <= LCD_COLS => {}
            Some(text) => errors.push(format!("{} '{}' is over {} chars", what, text, LCD_COLS)),
            None => errors.push(format!("{} entries must be strings", what)),
        }
    }
    rows.len()
}

fn validate_text(config: &toml::Value, errors: &mut Vec<String>) {
    let welcome = config.get("welcome").and_then(|w| w.get("lines"));
    check_rows(welcome, "[welcome] lines", MAX_WELCOME_PAGES * 2, errors);

    let thinking = config.get("thinking");
    if let Some(text) = thinking.and_then(|t| t.get("text")) {
        match text.as_str() {
            Some(text) if text.chars().count() <= LCD_COLS => {}
            _ => errors.push(format!("[thinking] text must be a string of <= {} chars", LCD_COLS)),
        }
    }
    let frames = thinking.and_then(|t| t.get("frames"));
    if frames.is_some() && check_rows(frames, "[thinking] frames", MAX_THINKING_FRAMES, errors) == 0 {
        errors.push("[thinking] frames cannot be empty".to_string());
    }
}
