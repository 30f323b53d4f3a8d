//! Session lifecycle management: creation, validation, revocation and
//! expired-row cleanup.

pub mod cleanup;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use manager::SessionManager;
