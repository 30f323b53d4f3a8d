//! scrypt password hashing and verification.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::TryRngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use citadel_core::config::AuthConfig;
use citadel_core::error::AppError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;

/// Salt and hash used when the account being checked does not exist.
const ABSENT_SALT: [u8; SALT_LEN] = [0u8; SALT_LEN];
const ABSENT_HASH: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Hashes and verifies passwords with scrypt (`N = 2^log_n, r = 8, p = 1`).
///
/// The derived key is stored base64-encoded next to its raw salt.
#[derive(Debug)]
pub struct CredentialStore {
    params: scrypt::Params,
    derivations: AtomicU64,
}

impl CredentialStore {
    /// Creates a credential store using the configured work factor.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Self::with_log_n(config.scrypt_log_n)
    }

    /// Creates a credential store with an explicit `log2(N)`.
    pub fn with_log_n(log_n: u8) -> Result<Self, AppError> {
        let params = scrypt::Params::new(log_n, BLOCK_SIZE, PARALLELISM, KEY_LEN)
            .map_err(|e| AppError::configuration(format!("Invalid scrypt parameters: {e}")))?;
        Ok(Self {
            params,
            derivations: AtomicU64::new(0),
        })
    }

    /// Hashes `password`, generating a fresh salt when none is given.
    ///
    /// Returns the encoded hash and the salt that produced it.
    pub fn hash(&self, password: &str, salt: Option<&[u8]>) -> Result<(String, Vec<u8>), AppError> {
        let salt = match salt {
            Some(salt) => salt.to_vec(),
            None => generate_salt()?,
        };
        let key = self.derive(password, &salt)?;
        Ok((STANDARD.encode(key), salt))
    }

    /// Checks `password` against a stored hash and salt in constant time.
    pub fn verify(&self, password: &str, stored_hash: &str, salt: &[u8]) -> Result<bool, AppError> {
        let key = self.derive(password, salt)?;
        let encoded = STANDARD.encode(key);
        Ok(encoded.as_bytes().ct_eq(stored_hash.as_bytes()).into())
    }

    /// Spends the same work as [`verify`](Self::verify) for an account
    /// that does not exist. Always rejects.
    pub fn verify_absent(&self, password: &str) -> Result<bool, AppError> {
        self.verify(password, ABSENT_HASH, &ABSENT_SALT)?;
        Ok(false)
    }

    /// Number of key derivations run so far.
    pub fn derivations(&self) -> u64 {
        self.derivations.load(Ordering::Relaxed)
    }

    fn derive(&self, password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], AppError> {
        self.derivations.fetch_add(1, Ordering::Relaxed);
        let mut key = [0u8; KEY_LEN];
        scrypt::scrypt(password.as_bytes(), salt, &self.params, &mut key)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(key)
    }
}

fn generate_salt() -> Result<Vec<u8>, AppError> {
    let mut salt = vec![0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| AppError::internal(format!("Failed to generate salt: {e}")))?;
    Ok(salt)
}
