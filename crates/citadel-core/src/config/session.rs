//! Session lifetime and cookie configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours. Also used as the cookie Max-Age.
    #[serde(default = "default_duration_hours")]
    pub duration_hours: u64,
    /// Name of the cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Emit the `Secure` cookie attribute. Must be on behind HTTPS.
    #[serde(default)]
    pub cookie_secure: bool,
    /// `SameSite` cookie attribute.
    #[serde(default)]
    pub same_site: SameSitePolicy,
    /// Interval for expired session purging in minutes (0 disables it).
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl SessionConfig {
    /// Session lifetime in seconds.
    pub fn duration_seconds(&self) -> i64 {
        (self.duration_hours * 3600) as i64
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_hours: default_duration_hours(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            same_site: SameSitePolicy::default(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

/// Allowed `SameSite` values for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// Cookie is only sent on same-site requests.
    Strict,
    /// Cookie is also sent on top-level cross-site navigations.
    #[default]
    Lax,
}

fn default_duration_hours() -> u64 {
    24
}

fn default_cookie_name() -> String {
    "TOKEN".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}
