use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub total_guesses: u32,
    #[serde(default)]
    pub correct_guesses: u32,
    #[serde(default)]
    pub high_score: i64,
    /// Ratio in `0.0..=1.0` when the server computes it.
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl UserStats {
    /// Accuracy as a percentage, preferring the server's figure.
    pub fn accuracy_percent(&self) -> f64 {
        match self.accuracy {
            Some(ratio) => ratio * 100.0,
            None if self.total_guesses == 0 => 0.0,
            None => f64::from(self.correct_guesses) * 100.0 / f64::from(self.total_guesses),
        }
    }
}

/// A finished game in the player's recent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(alias = "id")]
    pub game_id: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub correct_guesses: u32,
    #[serde(default)]
    pub total_guesses: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// User row in the admin user list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserSummary {
    pub fn role_display(&self) -> &str {
        self.role.as_deref().unwrap_or("USER")
    }
}

/// Partial update; absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_prefers_server_ratio() {
        let stats = UserStats { total_guesses: 10, correct_guesses: 5, accuracy: Some(0.9), ..Default::default() };
        assert!((stats.accuracy_percent() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_computed_from_counts() {
        let stats = UserStats { total_guesses: 8, correct_guesses: 6, ..Default::default() };
        assert!((stats.accuracy_percent() - 75.0).abs() < 1e-9);
        assert_eq!(UserStats::default().accuracy_percent(), 0.0);
    }

    #[test]
    fn test_parse_game_summary() {
        let json = r#"{"id": 9, "score": 40, "correctGuesses": 4, "totalGuesses": 5, "finishedAt": "2026-03-01T12:00:00Z"}"#;
        let summary: GameSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.game_id, 9);
        assert!(summary.finished_at.is_some());
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let req = UpdateUserRequest { email: Some("a@b.c".into()), password: None };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"email":"a@b.c"}"#);
        assert!(UpdateUserRequest::default().is_empty());
    }
}
