//! Which message the status bar shows when more than one condition holds.

/// Shown while the Wi-Fi link is down.
pub const OFFLINE: &str = "Offline";

/// Shown while the app registry cannot be loaded.
pub const APPS_UNAVAILABLE: &str = "Apps unavailable";

/// Conditions that override the greeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Notices {
    pub offline: bool,
    pub apps_unavailable: bool,
}

impl Notices {
    /// Offline wins over a missing app list; with neither, `greeting`.
    pub fn message<'a>(&self, greeting: &'a str) -> &'a str {
        if self.offline {
            OFFLINE
        } else if self.apps_unavailable {
            APPS_UNAVAILABLE
        } else {
            greeting
        }
    }
}
