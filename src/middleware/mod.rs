//! Session guard and login routes for Axum front-end servers.
//!
//! The guard keeps every page except the login route behind a structurally
//! valid, unexpired `auth_token` cookie. It never checks the token's
//! signature; the backend API does that on each call.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shoefast_client::middleware::{SessionAuthConfig, session_guard, session_routes};
//!
//! // 1. Configure from environment
//! let config = SessionAuthConfig::from_env()?;
//!
//! // 2. Protect pages and mount login/logout
//! let app = axum::Router::new()
//!     .route("/", get(home))
//!     .route("/login", get(login_page))
//!     .layer(axum::middleware::from_fn_with_state(config.guard_state(), session_guard))
//!     .merge(session_routes(config));
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod guard;
mod routes;
mod state;

pub use config::{DEFAULT_LOGIN_PATH, EMAIL_COOKIE_NAME, SessionAuthConfig, TOKEN_COOKIE_NAME};
pub use error::AuthError;
pub use extractor::SessionUser;
pub use guard::{GuardDecision, GuardState, session_guard};
pub use routes::session_routes;
