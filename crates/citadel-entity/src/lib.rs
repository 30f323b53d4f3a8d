//! # citadel-entity
//!
//! Domain entity models for Citadel. Every struct in this crate
//! represents a database table row, a joined read model, or the input
//! of a store operation. Row types additionally derive `sqlx::FromRow`.

pub mod post;
pub mod session;
pub mod user;
