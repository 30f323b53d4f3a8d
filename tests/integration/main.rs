//! HTTP-level tests against the full router on in-memory stores.

mod helpers;

mod auth_test;
mod post_test;
mod session_test;
mod user_test;
