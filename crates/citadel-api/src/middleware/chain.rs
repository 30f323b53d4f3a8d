//! Ordered middleware chains.
//!
//! A chain lists its stages outermost first. Every chain starts with the
//! edge stages (`Logger`, `Cors`), which the root router installs once so
//! that they also cover preflight requests and unmatched paths. The guard
//! stages after them are installed per route group by [`Chain::apply`].
//!
//! Chains are only built by composition: [`Chain::public`] gives the
//! base, [`PublicChain::authenticated`] adds `Authentication`, and the
//! `Admin` stage is only reachable through [`AuthenticatedChain::admin`].

use std::fmt;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};

use super::{admin, auth, cors, logging};
use crate::state::AppState;

/// One interceptor in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Request/response logging.
    Logger,
    /// CORS headers and preflight handling.
    Cors,
    /// Attach a session when a valid token is present.
    OptionalAuthentication,
    /// Require a valid session.
    Authentication,
    /// Require the admin capability.
    Admin,
}

impl Stage {
    /// Whether the stage is installed on the root router.
    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Logger | Self::Cors)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logger => write!(f, "Logger"),
            Self::Cors => write!(f, "CORS"),
            Self::OptionalAuthentication => write!(f, "OptionalAuthentication"),
            Self::Authentication => write!(f, "Authentication"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// A finished chain, ready to guard a route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    stages: Vec<Stage>,
}

/// The base chain: edge stages only.
#[derive(Debug, Clone)]
pub struct PublicChain(Chain);

/// The base chain plus `Authentication`.
#[derive(Debug, Clone)]
pub struct AuthenticatedChain(Chain);

impl Chain {
    /// Logger then CORS.
    pub fn public() -> PublicChain {
        PublicChain(Self {
            stages: vec![Stage::Logger, Stage::Cors],
        })
    }

    fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stages, outermost first.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Wrap every route of `router` in this chain's guard stages.
    ///
    /// `route_layer` makes the last applied layer the outermost, so the
    /// guards are applied innermost first.
    pub fn apply(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        self.stages
            .iter()
            .rev()
            .filter(|stage| !stage.is_edge())
            .fold(router, |router, stage| match stage {
                Stage::OptionalAuthentication => router.route_layer(from_fn_with_state(
                    state.clone(),
                    auth::optional_authentication,
                )),
                Stage::Authentication => router.route_layer(from_fn_with_state(
                    state.clone(),
                    auth::require_authentication,
                )),
                Stage::Admin => {
                    router.route_layer(from_fn_with_state(state.clone(), admin::require_admin))
                }
                Stage::Logger | Stage::Cors => router,
            })
    }

    /// Install the edge stages on the root router.
    pub fn apply_edge(router: Router, state: &AppState) -> Router {
        // Outermost last: logging sees the CORS short-circuit for preflights.
        router
            .layer(cors::build_cors_layer(&state.config.server.cors))
            .layer(from_fn(logging::request_logging))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.stages.iter().map(Stage::to_string).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

impl PublicChain {
    /// Add `OptionalAuthentication`.
    pub fn with_optional_authentication(self) -> Chain {
        self.0.then(Stage::OptionalAuthentication)
    }

    /// Add `Authentication`.
    pub fn authenticated(self) -> AuthenticatedChain {
        AuthenticatedChain(self.0.then(Stage::Authentication))
    }
}

impl AuthenticatedChain {
    /// Add `Admin` after `Authentication`.
    pub fn admin(self) -> Chain {
        self.0.then(Stage::Admin)
    }
}

impl From<PublicChain> for Chain {
    fn from(chain: PublicChain) -> Self {
        chain.0
    }
}

impl From<AuthenticatedChain> for Chain {
    fn from(chain: AuthenticatedChain) -> Self {
        chain.0
    }
}
