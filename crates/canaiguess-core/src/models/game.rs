//! Game session types.
//!
//! A game is a sequence of batches. Each batch holds one or more images and
//! the player answers the whole batch with a single guess submission, marking
//! every image as human-made or AI-generated.

use serde::{Deserialize, Serialize};

/// Game state as returned by `POST /api/game` and `GET /api/game/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(alias = "gameId")]
    pub id: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub current_round: Option<u32>,
    #[serde(default)]
    pub total_rounds: Option<u32>,
    #[serde(default)]
    pub finished: bool,
}

impl Game {
    /// "Round 3/10", or just "Round 3" when the total is unknown.
    pub fn round_display(&self) -> String {
        match (self.current_round, self.total_rounds) {
            (Some(current), Some(total)) => format!("Round {}/{}", current, total),
            (Some(current), None) => format!("Round {}", current),
            _ => "Round -".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameImage {
    #[serde(alias = "imageId")]
    pub id: i64,
    pub url: String,
}

/// The next group of images to judge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBatch {
    #[serde(default)]
    pub images: Vec<GameImage>,
    #[serde(default)]
    pub round: Option<u32>,
}

impl ImageBatch {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGuess {
    pub image_id: i64,
    /// `true` when the player thinks the image is AI-generated.
    pub fake: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessRequest {
    pub guesses: Vec<ImageGuess>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnswer {
    pub image_id: i64,
    pub fake: bool,
}

/// Response to a guess submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    pub correct: bool,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub answers: Vec<ImageAnswer>,
    #[serde(default)]
    pub game_over: bool,
}

impl GuessOutcome {
    /// Look up the true answer for one image, if the server revealed it.
    pub fn answer_for(&self, image_id: i64) -> Option<bool> {
        self.answers.iter().find(|a| a.image_id == image_id).map(|a| a.fake)
    }
}

/// Final results for a finished game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResults {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub correct_guesses: u32,
    #[serde(default)]
    pub total_guesses: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl GameResults {
    /// Accuracy as a percentage in `0.0..=100.0`.
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_guesses == 0 {
            0.0
        } else {
            f64::from(self.correct_guesses) * 100.0 / f64::from(self.total_guesses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_with_alias() {
        let json = r#"{"gameId": 42, "score": 150, "currentRound": 3, "totalRounds": 10}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, 42);
        assert_eq!(game.score, 150);
        assert!(!game.finished);
        assert_eq!(game.round_display(), "Round 3/10");
    }

    #[test]
    fn test_round_display_without_total() {
        let game = Game { id: 1, current_round: Some(2), ..Default::default() };
        assert_eq!(game.round_display(), "Round 2");
        assert_eq!(Game::default().round_display(), "Round -");
    }

    #[test]
    fn test_guess_request_wire_format() {
        let req = GuessRequest {
            guesses: vec![ImageGuess { image_id: 7, fake: true }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"guesses": [{"imageId": 7, "fake": true}]}));
    }

    #[test]
    fn test_guess_outcome_answer_lookup() {
        let json = r#"{"correct": false, "score": 20, "answers": [{"imageId": 1, "fake": true}, {"imageId": 2, "fake": false}], "gameOver": true}"#;
        let outcome: GuessOutcome = serde_json::from_str(json).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.answer_for(1), Some(true));
        assert_eq!(outcome.answer_for(2), Some(false));
        assert_eq!(outcome.answer_for(3), None);
    }

    #[test]
    fn test_results_accuracy() {
        let results = GameResults { correct_guesses: 7, total_guesses: 10, ..Default::default() };
        assert!((results.accuracy_percent() - 70.0).abs() < f64::EPSILON);
        assert_eq!(GameResults::default().accuracy_percent(), 0.0);
    }
}
