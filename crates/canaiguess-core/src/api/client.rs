//! API client for communicating with the CanAIGuess backend.
//!
//! This module provides the `ApiClient` struct. Every service method issues
//! exactly one HTTP request, attaches the bearer token when one is set, and
//! returns the parsed body or an `ApiError` carrying the response text.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{header, multipart, Client, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AccuracyEntry, AuthResponse, Game, GameResults, GameSummary, GuessOutcome, GuessRequest,
    ImageBatch, ImageGuess, ImageInfo, LeaderboardEntry, LoginRequest, RegisterRequest, Report,
    UpdateUserRequest, UserStats, UserSummary,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Parallel stats requests when building the accuracy leaderboard.
const MAX_CONCURRENT_STATS_REQUESTS: usize = 5;

/// API client for the CanAIGuess backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry a path: {}", base_url));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Set or clear the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        let mut api = self.clone();
        api.set_token(token);
        api
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded,
    /// so usernames can be passed as-is.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    fn require_token(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(ApiError::Unauthorized.into());
        }
        Ok(())
    }

    /// Check if response is successful, returning an error with body if not.
    /// A 429 is reported as `RateLimited` like any other failure; nothing is resent.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            warn!(status = %status, "Rate limited by the server");
        }
        Err(ApiError::from_status(status, &body).into())
    }

    /// Send exactly one request with the auth headers attached.
    async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send request: {}", what))?;

        Self::check_response(response).await
    }

    async fn parse_json<T: DeserializeOwned>(what: &str, response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response: {}", what))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse response: {}", what))
    }

    async fn get<T: DeserializeOwned>(&self, what: &str, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.send(what, self.client.get(url)).await?;
        Self::parse_json(what, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, what: &str, segments: &[&str], body: &B) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = self
            .send(what, self.client.post(url).json(body))
            .await?;
        Self::parse_json(what, response).await
    }

    // ===== Auth =====

    /// Log in and return the token, username and role for the session
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        debug!(username, "Logging in");
        self.post("login", &["api", "auth", "login"], &LoginRequest { username, password })
            .await
    }

    /// Register a new account. The caller logs in afterwards.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint(&["api", "auth", "register"])?;
        let body = RegisterRequest { username, email, password };
        self.send("register", self.client.post(url).json(&body))
            .await?;
        Ok(())
    }

    // ===== Game =====

    /// Start a new game. Guests may play; the token is attached when present.
    pub async fn create_game(&self) -> Result<Game> {
        self.post("create game", &["api", "game"], &serde_json::json!({}))
            .await
    }

    pub async fn fetch_game(&self, game_id: i64) -> Result<Game> {
        let id = game_id.to_string();
        self.get("fetch game", &["api", "game", &id]).await
    }

    /// Fetch the next batch of images to judge
    pub async fn fetch_batch(&self, game_id: i64) -> Result<ImageBatch> {
        let id = game_id.to_string();
        self.get("fetch batch", &["api", "game", &id, "batch"]).await
    }

    /// Submit one guess covering every image of the current batch
    pub async fn submit_guess(&self, game_id: i64, guesses: &[ImageGuess]) -> Result<GuessOutcome> {
        let id = game_id.to_string();
        let body = GuessRequest {
            guesses: guesses.to_vec(),
        };
        self.post("submit guess", &["api", "game", &id, "guess"], &body)
            .await
    }

    pub async fn fetch_results(&self, game_id: i64) -> Result<GameResults> {
        let id = game_id.to_string();
        self.post("fetch results", &["api", "game", &id, "results"], &serde_json::json!({}))
            .await
    }

    // ===== Leaderboard & history =====

    /// Fetch the score leaderboard, validating the shape of every entry
    pub async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let raw: serde_json::Value = self.get("fetch leaderboard", &["api", "leaderboard"]).await?;
        let entries = LeaderboardEntry::parse_list(raw).context("Failed to validate leaderboard")?;
        debug!(count = entries.len(), "Leaderboard fetched");
        Ok(entries)
    }

    /// Build the accuracy leaderboard: the score leaderboard's players,
    /// ranked by their stats. Players whose stats fail to load are skipped.
    pub async fn fetch_accuracy_leaderboard(&self) -> Result<Vec<AccuracyEntry>> {
        let players = self.fetch_leaderboard().await?;

        let mut entries = Vec::with_capacity(players.len());
        for chunk in players.chunks(MAX_CONCURRENT_STATS_REQUESTS) {
            let futures: Vec<_> = chunk
                .iter()
                .map(|player| {
                    let api = self.clone();
                    let username = player.username.clone();
                    async move {
                        let stats = api.fetch_user_stats(&username).await;
                        (username, stats)
                    }
                })
                .collect();

            for (username, stats) in futures::future::join_all(futures).await {
                match stats {
                    Ok(stats) => entries.push(AccuracyEntry {
                        accuracy_percent: stats.accuracy_percent(),
                        total_guesses: stats.total_guesses,
                        username,
                    }),
                    Err(e) => warn!(user = %username, error = %e, "Skipping player without stats"),
                }
            }
        }

        AccuracyEntry::rank(&mut entries);
        Ok(entries)
    }

    /// The signed-in player's last ten games
    pub async fn fetch_last_games(&self) -> Result<Vec<GameSummary>> {
        self.require_token()?;
        self.get("fetch last games", &["api", "history", "last10"]).await
    }

    // ===== Users =====

    pub async fn fetch_user_stats(&self, username: &str) -> Result<UserStats> {
        self.get("fetch user stats", &["api", "user", username, "stats"])
            .await
    }

    /// Change email and/or password of an account
    pub async fn update_user(&self, username: &str, update: &UpdateUserRequest) -> Result<()> {
        self.require_token()?;
        let url = self.endpoint(&["api", "user", username, "update"])?;
        self.send("update user", self.client.patch(url).json(update))
            .await?;
        Ok(())
    }

    pub async fn promote_user(&self, username: &str) -> Result<()> {
        self.require_token()?;
        let url = self.endpoint(&["api", "user", username, "promote"])?;
        self.send("promote user", self.client.patch(url))
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> Result<()> {
        self.require_token()?;
        let url = self.endpoint(&["api", "user", username, "delete"])?;
        self.send("delete user", self.client.delete(url))
            .await?;
        Ok(())
    }

    pub async fn fetch_all_users(&self) -> Result<Vec<UserSummary>> {
        self.require_token()?;
        self.get("fetch users", &["api", "user", "all"]).await
    }

    // ===== Moderation =====

    pub async fn fetch_unresolved_reports(&self) -> Result<Vec<Report>> {
        self.require_token()?;
        self.get("fetch reports", &["api", "reports", "unresolved"])
            .await
    }

    pub async fn resolve_report(&self, report_id: i64) -> Result<()> {
        self.require_token()?;
        let id = report_id.to_string();
        let url = self.endpoint(&["api", "reports", &id, "resolve"])?;
        self.send("resolve report", self.client.post(url))
            .await?;
        Ok(())
    }

    /// Upload a local image file, labelled as AI-generated (`fake`) or not.
    /// Returns the stored image when the server describes it.
    pub async fn upload_image(&self, path: &Path, fake: bool) -> Result<Option<ImageInfo>> {
        self.require_token()?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let url = self.endpoint(&["api", "image", "upload"])?;

        debug!(file = %file_name, size = bytes.len(), fake, "Uploading image");
        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new()
            .part("file", part)
            .text("fake", fake.to_string());
        let response = self
            .send("upload image", self.client.post(url).multipart(form))
            .await?;

        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).ok())
    }

    pub async fn delete_image(&self, image_id: i64) -> Result<()> {
        self.require_token()?;
        let id = image_id.to_string();
        let url = self.endpoint(&["api", "image", &id, "delete"])?;
        self.send("delete image", self.client.delete(url))
            .await?;
        Ok(())
    }
}
