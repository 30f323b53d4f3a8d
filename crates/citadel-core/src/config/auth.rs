//! Credential hashing configuration.

use serde::{Deserialize, Serialize};

/// Password hashing and validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// scrypt cost parameter as a power of two (N = 2^log_n).
    ///
    /// Stored hashes carry no parameters, so changing this invalidates
    /// every existing credential.
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,
    /// Minimum accepted password length in characters.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scrypt_log_n: default_scrypt_log_n(),
            password_min_length: default_password_min_length(),
        }
    }
}

fn default_scrypt_log_n() -> u8 {
    15
}

fn default_password_min_length() -> usize {
    6
}
