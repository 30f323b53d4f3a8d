//! # citadel-api
//!
//! HTTP API layer for Citadel built on Axum.
//!
//! Requests pass through an ordered [`middleware::chain`] of stages
//! (logger, CORS, authentication, admin) before reaching a handler.
//! Handlers translate service results into JSON, and every failure is
//! rendered as `{"error": "..."}` by [`error::ApiError`].

pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
