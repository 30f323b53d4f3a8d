//! Password hashing and policy enforcement.

pub mod hasher;
pub mod validator;

pub use hasher::CredentialStore;
pub use validator::PasswordPolicy;
