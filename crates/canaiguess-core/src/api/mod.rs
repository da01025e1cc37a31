//! REST API client module for the CanAIGuess backend.
//!
//! This module provides the `ApiClient` with one method per backend
//! endpoint: authentication, game sessions, leaderboards, user history
//! and the administrative actions.
//!
//! Protected endpoints use a bearer token obtained from `login`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{user_message, ApiError};
