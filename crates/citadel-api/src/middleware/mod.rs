//! Axum middleware stages and their composition into chains.

pub mod admin;
pub mod auth;
pub mod chain;
pub mod cors;
pub mod logging;

pub use chain::{AuthenticatedChain, Chain, PublicChain, Stage};
