//! Configuration type definitions
//!
//! These types represent the kiosk configuration. Defaults match the stock
//! ServoBot build, so a missing or broken `kiosk.toml` still boots.

use heapless::{String, Vec};

use crate::card::Uid;
use crate::display::LCD_COLS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum welcome pages
pub const MAX_WELCOME_PAGES: usize = 8;

/// Maximum thinking animation frames
pub const MAX_THINKING_FRAMES: usize = 8;

/// Maximum cards on the allow-list
pub const MAX_ALLOWED_CARDS: usize = 8;

/// Servo travel limits in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleLimits {
    /// Lowest commandable angle
    pub min: i32,
    /// Highest commandable angle
    pub max: i32,
    /// Angle assumed at power-on
    pub initial: i32,
}

impl AngleLimits {
    /// Clamp an angle into `[min, max]`
    pub fn clamp(&self, angle: i32) -> i32 {
        angle.clamp(self.min, self.max)
    }

    /// Midpoint of the travel, used as the nod/shake center
    pub fn center(&self) -> i32 {
        self.min + (self.max - self.min) / 2
    }
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self {
            min: 0,
            max: 180,
            initial: 90,
        }
    }
}

/// Display timings in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Time each welcome page stays up
    pub welcome_interval_ms: u32,
    /// Time between thinking animation frames
    pub animation_interval_ms: u32,
    /// Time the action status stays up after the action returns
    pub action_display_ms: u32,
    /// Time the shutdown message stays up
    pub shutdown_display_ms: u32,
    /// Time the scanned card stays up
    pub rfid_display_ms: u32,
    /// Time the rejection message stays up
    pub auth_fail_display_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            welcome_interval_ms: 3000,
            animation_interval_ms: 350,
            action_display_ms: 3000,
            shutdown_display_ms: 3000,
            rfid_display_ms: 4000,
            auth_fail_display_ms: 2500,
        }
    }
}

/// Which cards unlock the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuthPolicy {
    /// Only cards listed in `allowed`
    #[default]
    AllowList,
    /// Any card that reads
    AcceptAny,
}

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuthConfig {
    /// Acceptance policy
    pub policy: AuthPolicy,
    /// Allowed cards (allow-list policy)
    pub allowed: Vec<Uid, MAX_ALLOWED_CARDS>,
    /// Show the rejection screen; when off a rejected card is ignored
    pub failure_screen: bool,
}

impl AuthConfig {
    /// Check a card against the policy
    pub fn verify(&self, uid: &Uid) -> bool {
        match self.policy {
            AuthPolicy::AcceptAny => true,
            AuthPolicy::AllowList => self.allowed.iter().any(|allowed| allowed == uid),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut allowed = Vec::new();
        if let Ok(uid) = Uid::new(&[0x04, 0x96, 0xC7, 0x2B]) {
            let _ = allowed.push(uid);
        }
        Self {
            policy: AuthPolicy::AllowList,
            allowed,
            failure_screen: true,
        }
    }
}

/// What happens once the shutdown message expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShutdownPolicy {
    /// Blank the display and stop
    #[default]
    Halt,
    /// Start over from the welcome sequence
    Restart,
}

/// One welcome page (two display rows)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WelcomePage {
    /// Top row
    pub top: String<LCD_COLS>,
    /// Bottom row
    pub bottom: String<LCD_COLS>,
}

impl WelcomePage {
    /// Create a page; rows longer than the display are cut
    pub fn new(top: &str, bottom: &str) -> Self {
        Self {
            top: crate::display::line(top),
            bottom: crate::display::line(bottom),
        }
    }
}

/// Thinking animation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThinkingConfig {
    /// Static text on the top row
    pub text: String<LCD_COLS>,
    /// Frames drawn after the text, cycled in order
    pub frames: Vec<String<LCD_COLS>, MAX_THINKING_FRAMES>,
}

impl Default for ThinkingConfig {
    fn default() -> Self {
        let mut frames = Vec::new();
        for frame in [".  ", ".. ", "...", "   "] {
            let _ = frames.push(crate::display::line(frame));
        }
        Self {
            text: crate::display::line("Thinking"),
            frames,
        }
    }
}

/// Complete kiosk configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KioskConfig {
    /// Servo travel
    pub servo: AngleLimits,
    /// Display timings
    pub timing: Timing,
    /// Card authentication
    pub auth: AuthConfig,
    /// Shutdown behavior
    pub shutdown: ShutdownPolicy,
    /// Welcome pages, shown in order
    pub welcome: Vec<WelcomePage, MAX_WELCOME_PAGES>,
    /// Thinking animation
    pub thinking: ThinkingConfig,
}

impl Default for KioskConfig {
    fn default() -> Self {
        let mut welcome = Vec::new();
        for (top, bottom) in [
            ("Hello, human!", "I am ServoBot"),
            ("I can spin, nod", "sweep and shake"),
            ("Tell me what", "to do next..."),
        ] {
            let _ = welcome.push(WelcomePage::new(top, bottom));
        }
        Self {
            servo: AngleLimits::default(),
            timing: Timing::default(),
            auth: AuthConfig::default(),
            shutdown: ShutdownPolicy::default(),
            welcome,
            thinking: ThinkingConfig::default(),
        }
    }
}
