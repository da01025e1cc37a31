//! Authentication state for the client.
//!
//! This module provides:
//! - `SessionStore`: the single owner of the persisted `token`/`username`/`role`
//! - `CredentialStore`: optional "remember me" password storage via keyring
//!
//! The backend is the only authority on permissions; the session is only
//! used to pick screens and attach the bearer token.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{SessionData, SessionStore, ADMIN_ROLE};
