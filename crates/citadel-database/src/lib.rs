//! # citadel-database
//!
//! Persistence for Citadel. The [`store`] module defines one trait per
//! aggregate; [`repositories`] implements them on PostgreSQL and
//! [`memory`] implements them in process for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{PostStore, SessionStore, Stores, UserStore};
