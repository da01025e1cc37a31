//! Data models for CanAIGuess entities.
//!
//! This module contains the request and response shapes exchanged with
//! the CanAIGuess backend:
//!
//! - Auth payloads: `LoginRequest`, `RegisterRequest`, `AuthResponse`
//! - Game types: `Game`, `ImageBatch`, `GuessRequest`, `GuessOutcome`, `GameResults`
//! - Leaderboard types: `LeaderboardEntry`, `AccuracyEntry`
//! - User types: `UserStats`, `GameSummary`, `UserSummary`, `UpdateUserRequest`
//! - Admin types: `Report`, `ImageInfo`

pub mod admin;
pub mod auth;
pub mod game;
pub mod leaderboard;
pub mod user;

pub use admin::{ImageInfo, Report};
pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use game::{Game, GameImage, GameResults, GuessOutcome, GuessRequest, ImageAnswer, ImageBatch, ImageGuess};
pub use leaderboard::{AccuracyEntry, LeaderboardEntry};
pub use user::{GameSummary, UpdateUserRequest, UserStats, UserSummary};
