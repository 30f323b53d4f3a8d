//! # citadel-core
//!
//! Core crate for Citadel. Contains configuration schemas, the unified
//! error system, and the sorting types shared by list endpoints.
//!
//! This crate has **no** internal dependencies on other Citadel crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
