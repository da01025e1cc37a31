use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;

/// One row of the score leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
}

impl LeaderboardEntry {
    /// Validate a raw leaderboard body.
    ///
    /// The body must be a JSON array whose items each carry a string
    /// `username` and an integer `score`. Anything else is reported as
    /// `ApiError::MalformedResponse` naming the offending index.
    pub fn parse_list(value: Value) -> Result<Vec<Self>, ApiError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::MalformedResponse(format!(
                    "leaderboard must be an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let username = item
                    .get("username")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ApiError::MalformedResponse(format!("entry {} has no string username", i))
                    })?;
                let score = item.get("score").and_then(Value::as_i64).ok_or_else(|| {
                    ApiError::MalformedResponse(format!("entry {} has no integer score", i))
                })?;
                Ok(LeaderboardEntry {
                    username: username.to_string(),
                    score,
                })
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One row of the accuracy leaderboard, derived from per-user stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyEntry {
    pub username: String,
    pub accuracy_percent: f64,
    pub total_guesses: u32,
}

impl AccuracyEntry {
    /// Sort best accuracy first; ties go to the player with more guesses,
    /// then alphabetically.
    pub fn rank(entries: &mut [AccuracyEntry]) {
        entries.sort_by(|a, b| {
            b.accuracy_percent
                .total_cmp(&a.accuracy_percent)
                .then_with(|| b.total_guesses.cmp(&a.total_guesses))
                .then_with(|| a.username.cmp(&b.username))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_valid() {
        let entries = LeaderboardEntry::parse_list(json!([
            {"username": "alice", "score": 300},
            {"username": "bob", "score": 120, "extra": true}
        ]))
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], LeaderboardEntry { username: "alice".into(), score: 300 });
    }

    #[test]
    fn test_parse_list_rejects_non_array() {
        let err = LeaderboardEntry::parse_list(json!({"entries": []})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(ref m) if m.contains("object")));
    }

    #[test]
    fn test_parse_list_rejects_bad_field_types() {
        let err = LeaderboardEntry::parse_list(json!([
            {"username": "alice", "score": 300},
            {"username": 5, "score": 10}
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(ref m) if m.contains("entry 1")));

        let err = LeaderboardEntry::parse_list(json!([{"username": "a", "score": "high"}])).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(ref m) if m.contains("score")));
    }

    #[test]
    fn test_parse_list_empty_is_ok() {
        assert!(LeaderboardEntry::parse_list(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_accuracy_rank_order() {
        let mut entries = vec![
            AccuracyEntry { username: "c".into(), accuracy_percent: 50.0, total_guesses: 10 },
            AccuracyEntry { username: "a".into(), accuracy_percent: 80.0, total_guesses: 5 },
            AccuracyEntry { username: "b".into(), accuracy_percent: 80.0, total_guesses: 20 },
        ];
        AccuracyEntry::rank(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
