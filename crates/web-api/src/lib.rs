//! Web API layer.
//!
//! Axum routes delegating HTTP and WebSocket traffic to the application
//! layer's use-case services.

mod auth;
mod error;
mod routes;
mod state;
mod ws;

pub use auth::{Identity, JwtService};
pub use config::JwtConfig;
pub use routes::router;
pub use state::AppState;
pub use ws::ConnectionRegistry;
