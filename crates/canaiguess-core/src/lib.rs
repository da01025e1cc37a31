//! Core library for the CanAIGuess client.
//!
//! Everything that does not depend on a particular front end lives here:
//! the HTTP client and its models, session persistence, route guards and
//! the lazy per-tab loader.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod loader;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionData, SessionStore};
pub use config::Config;
pub use guard::{Access, Guard, Route, Viewer};
pub use loader::{LazyLoader, LoadError, LoadState};
