//! # citadel-auth
//!
//! Authentication primitives for Citadel.
//!
//! ## Modules
//!
//! - `password`: scrypt credential hashing and password policy
//! - `session`: session token lifecycle and expired-row cleanup

pub mod password;
pub mod session;

pub use password::{CredentialStore, PasswordPolicy};
pub use session::{SessionCleanup, SessionManager};
