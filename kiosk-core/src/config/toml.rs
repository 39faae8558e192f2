//! Minimal TOML parser for kiosk configuration
//!
//! This handles only the subset `kiosk.toml` needs. It does NOT support the
//! full TOML spec, and it does not allocate.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - String arrays, including arrays spread over several lines
//! - Comments (# ...)
//!
//! NOT supported:
//! - Escape sequences inside strings
//! - Inline tables and nested arrays
//! - Dotted keys and dotted section headers
//!
//! Unknown keys are skipped so newer files still load on older firmware.
//! Unknown sections are an error.

use heapless::{String, Vec};

use super::types::{
    AuthPolicy, KioskConfig, ShutdownPolicy, WelcomePage, MAX_THINKING_FRAMES, MAX_WELCOME_PAGES,
};
use crate::card::Uid;
use crate::display::line;

/// Longest array text, summed over all its lines
const MAX_ARRAY_TEXT: usize = 512;

/// Longest key name
const MAX_KEY_LEN: usize = 32;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value type or out-of-range value
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Allow-list entry is not a hex UID
    InvalidUid,
    /// Array opened but never closed
    UnterminatedArray,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Servo,
    Timing,
    Auth,
    Shutdown,
    Welcome,
    Thinking,
}

/// Parse TOML configuration into [`KioskConfig`]
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<KioskConfig, ConfigError> {
    let mut config = KioskConfig::default();
    let mut section = Section::Root;

    // Multi-line array being collected: key and text so far
    let mut pending: Option<(String<MAX_KEY_LEN>, String<MAX_ARRAY_TEXT>)> = None;

    for raw in input.lines() {
        let line = strip_comment(raw).trim();

        if let Some((key, mut text)) = pending.take() {
            if !line.is_empty() {
                text.push(' ').map_err(|_| ConfigError::TooManyItems)?;
                text.push_str(line).map_err(|_| ConfigError::TooManyItems)?;
            }
            if array_closed(&text) {
                apply_value(section, &key, &text, &mut config)?;
            } else {
                pending = Some((key, text));
            }
            continue;
        }

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            if value.starts_with('[') && !array_closed(value) {
                let key = String::try_from(key).map_err(|_| ConfigError::InvalidValue)?;
                let text = String::try_from(value).map_err(|_| ConfigError::TooManyItems)?;
                pending = Some((key, text));
                continue;
            }
            apply_value(section, key, value, &mut config)?;
        }
    }

    if pending.is_some() {
        return Err(ConfigError::UnterminatedArray);
    }

    validate(&config)?;
    Ok(config)
}

/// Parse section header like "servo" or "timing"
fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "servo" => Ok(Section::Servo),
        "timing" => Ok(Section::Timing),
        "auth" => Ok(Section::Auth),
        "shutdown" => Ok(Section::Shutdown),
        "welcome" => Ok(Section::Welcome),
        "thinking" => Ok(Section::Thinking),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Cut a trailing `# comment`, ignoring `#` inside strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Check whether an array's closing bracket has been seen
fn array_closed(text: &str) -> bool {
    let mut in_string = false;
    for c in text.chars() {
        match c {
            '"' => in_string = !in_string,
            ']' if !in_string => return true,
            _ => {}
        }
    }
    false
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Walk the quoted items of a string array like `["a", "b",]`
fn for_each_string<'a>(
    value: &'a str,
    mut f: impl FnMut(&'a str) -> Result<(), ConfigError>,
) -> Result<(), ConfigError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ConfigError::InvalidValue)?;

    let mut rest = inner.trim();
    while !rest.is_empty() {
        let body = rest.strip_prefix('"').ok_or(ConfigError::InvalidValue)?;
        let end = body.find('"').ok_or(ConfigError::InvalidValue)?;
        f(&body[..end])?;

        rest = body[end + 1..].trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
        } else if !rest.is_empty() {
            return Err(ConfigError::InvalidValue);
        }
    }
    Ok(())
}

/// Parse auth policy
fn parse_auth_policy(value: &str) -> Result<AuthPolicy, ConfigError> {
    match parse_string(value)? {
        "allow-list" | "allow_list" | "AllowList" => Ok(AuthPolicy::AllowList),
        "accept-any" | "accept_any" | "AcceptAny" => Ok(AuthPolicy::AcceptAny),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse shutdown policy
fn parse_shutdown_policy(value: &str) -> Result<ShutdownPolicy, ConfigError> {
    match parse_string(value)? {
        "halt" | "Halt" => Ok(ShutdownPolicy::Halt),
        "restart" | "Restart" => Ok(ShutdownPolicy::Restart),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Pair a flat list of rows into welcome pages
fn parse_welcome_lines(value: &str) -> Result<Vec<WelcomePage, MAX_WELCOME_PAGES>, ConfigError> {
    let mut pages = Vec::new();
    let mut top: Option<&str> = None;

    for_each_string(value, |row| {
        match top.take() {
            None => top = Some(row),
            Some(first) => pages
                .push(WelcomePage::new(first, row))
                .map_err(|_| ConfigError::TooManyItems)?,
        }
        Ok(())
    })?;

    // Odd row count: last page has an empty bottom row
    if let Some(first) = top {
        pages
            .push(WelcomePage::new(first, ""))
            .map_err(|_| ConfigError::TooManyItems)?;
    }

    Ok(pages)
}

/// Apply a value to the configuration
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut KioskConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Servo => match key {
            "min_angle" => config.servo.min = parse_int(value)?,
            "max_angle" => config.servo.max = parse_int(value)?,
            "initial_angle" => config.servo.initial = parse_int(value)?,
            _ => {}
        },
        Section::Timing => match key {
            "welcome_interval_ms" => config.timing.welcome_interval_ms = parse_int(value)?,
            "animation_interval_ms" => config.timing.animation_interval_ms = parse_int(value)?,
            "action_display_ms" => config.timing.action_display_ms = parse_int(value)?,
            "shutdown_display_ms" => config.timing.shutdown_display_ms = parse_int(value)?,
            "rfid_display_ms" => config.timing.rfid_display_ms = parse_int(value)?,
            "auth_fail_display_ms" => config.timing.auth_fail_display_ms = parse_int(value)?,
            _ => {}
        },
        Section::Auth => match key {
            "policy" => config.auth.policy = parse_auth_policy(value)?,
            "failure_screen" => config.auth.failure_screen = parse_bool(value)?,
            "allowed" => {
                config.auth.allowed.clear();
                let allowed = &mut config.auth.allowed;
                for_each_string(value, |hex| {
                    let uid = Uid::parse_hex(hex).map_err(|_| ConfigError::InvalidUid)?;
                    allowed.push(uid).map_err(|_| ConfigError::TooManyItems)
                })?;
            }
            _ => {}
        },
        Section::Shutdown => {
            if key == "policy" {
                config.shutdown = parse_shutdown_policy(value)?;
            }
        }
        Section::Welcome => {
            if key == "lines" {
                config.welcome = parse_welcome_lines(value)?;
            }
        }
        Section::Thinking => match key {
            "text" => config.thinking.text = line(parse_string(value)?),
            "frames" => {
                let mut frames: Vec<_, MAX_THINKING_FRAMES> = Vec::new();
                for_each_string(value, |frame| {
                    frames.push(line(frame)).map_err(|_| ConfigError::TooManyItems)
                })?;
                config.thinking.frames = frames;
            }
            _ => {}
        },
        Section::Root => {}
    }
    Ok(())
}

/// Range checks that span several keys
fn validate(config: &KioskConfig) -> Result<(), ConfigError> {
    let servo = &config.servo;
    if servo.min < 0 || servo.max > 180 || servo.min > servo.max {
        return Err(ConfigError::InvalidValue);
    }
    if servo.initial < servo.min || servo.initial > servo.max {
        return Err(ConfigError::InvalidValue);
    }
    if config.thinking.frames.is_empty() {
        return Err(ConfigError::InvalidValue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIOSK_TOML: &str = r#"
# ServoBot kiosk
[servo]
min_angle = 10
max_angle = 170
initial_angle = 90

[timing]
welcome_interval_ms = 2000   # faster greeting
rfid_display_ms = 5000

[auth]
policy = "allow-list"
allowed = ["0496c72b", "DEADBEEF"]
failure_screen = false

[shutdown]
policy = "restart"

[welcome]
lines = [
    "Hello, human!",
    "I am ServoBot",   # first page
    "Scan to start",
]

[thinking]
text = "Hmm"
frames = ["-", "--", "---"]
"#;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("servo"), Ok(Section::Servo));
        assert_eq!(parse_section_header(" thinking "), Ok(Section::Thinking));
        assert_eq!(
            parse_section_header("stepper.x"),
            Err(ConfigError::InvalidSection)
        );
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("a = 1 # note"), "a = 1 ");
        assert_eq!(strip_comment(r##"a = "#1" # note"##), r##"a = "#1" "##);
    }

    #[test]
    fn test_for_each_string() {
        let mut seen: Vec<&str, 4> = Vec::new();
        for_each_string(r#"[ "a", "b c" ,]"#, |s| {
            seen.push(s).map_err(|_| ConfigError::TooManyItems)
        })
        .unwrap();
        assert_eq!(seen.as_slice(), &["a", "b c"]);

        assert_eq!(
            for_each_string(r#"["a" "b"]"#, |_| Ok(())),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(KIOSK_TOML).unwrap();

        assert_eq!(config.servo.min, 10);
        assert_eq!(config.servo.max, 170);
        assert_eq!(config.timing.welcome_interval_ms, 2000);
        assert_eq!(config.timing.rfid_display_ms, 5000);
        // Untouched keys keep defaults
        assert_eq!(config.timing.animation_interval_ms, 350);

        assert_eq!(config.auth.policy, AuthPolicy::AllowList);
        assert_eq!(config.auth.allowed.len(), 2);
        assert!(config.auth.verify(&Uid::parse_hex("DEADBEEF").unwrap()));
        assert!(!config.auth.failure_screen);

        assert_eq!(config.shutdown, ShutdownPolicy::Restart);

        assert_eq!(config.welcome.len(), 2);
        assert_eq!(config.welcome[0].top.as_str(), "Hello, human!");
        assert_eq!(config.welcome[0].bottom.as_str(), "I am ServoBot");
        assert_eq!(config.welcome[1].top.as_str(), "Scan to start");
        assert_eq!(config.welcome[1].bottom.as_str(), "");

        assert_eq!(config.thinking.text.as_str(), "Hmm");
        assert_eq!(config.thinking.frames.len(), 3);
        assert_eq!(config.thinking.frames[2].as_str(), "---");
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), KioskConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let config = parse_config("[timing]\nfuture_knob = 7\nrfid_display_ms = 100\n").unwrap();
        assert_eq!(config.timing.rfid_display_ms, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            parse_config("[servo]\nmax_angle = 270\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[servo]\nmin_angle = 100\nmax_angle = 50\ninitial_angle = 75\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[timing]\naction_display_ms = soon\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[auth]\nallowed = [\"XYZ\"]\n"),
            Err(ConfigError::InvalidUid)
        );
        assert_eq!(
            parse_config("[shutdown]\npolicy = \"reboot\"\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[thinking]\nframes = []\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(parse_config("[motors]\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unterminated_array() {
        assert_eq!(
            parse_config("[welcome]\nlines = [\n\"a\",\n"),
            Err(ConfigError::UnterminatedArray)
        );
    }

    #[test]
    fn test_too_many_frames() {
        let input = "[thinking]\nframes = [\"1\",\"2\",\"3\",\"4\",\"5\",\"6\",\"7\",\"8\",\"9\"]\n";
        assert_eq!(parse_config(input), Err(ConfigError::TooManyItems));
    }
}
