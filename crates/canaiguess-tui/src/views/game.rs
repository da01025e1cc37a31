//! A running game and its final results.
//!
//! Each round shows one batch of images. The player marks every image as
//! human-made or AI-generated and submits the whole batch as one guess.

use anyhow::{anyhow, Result};

use canaiguess_core::models::{Game, GameResults, GuessOutcome, ImageBatch, ImageGuess};
use canaiguess_core::ApiClient;

use crate::app::{TaskResult, TaskSender};

use super::step_selection;

#[derive(Debug)]
pub struct GameView {
    pub game_id: i64,
    pub game: Option<Game>,
    pub batch: Option<ImageBatch>,
    /// One mark per image of the batch: `Some(true)` means AI-generated
    pub marks: Vec<Option<bool>>,
    pub selection: usize,
    pub last_outcome: Option<GuessOutcome>,
    /// A request for this game is in flight
    pub busy: bool,
}

impl GameView {
    /// Show game `game_id` and start loading its state and first batch.
    pub fn mount(game_id: i64, api: &ApiClient, tasks: &TaskSender) -> Self {
        let mut view = Self {
            game_id,
            game: None,
            batch: None,
            marks: Vec::new(),
            selection: 0,
            last_outcome: None,
            busy: false,
        };
        view.load(api, tasks);
        view
    }

    /// Fetch the game state together with its current batch.
    pub fn load(&mut self, api: &ApiClient, tasks: &TaskSender) {
        self.busy = true;
        let game_id = self.game_id;
        let api = api.clone();
        tasks.spawn("Load game", async move {
            let game = api.fetch_game(game_id).await?;
            let batch = api.fetch_batch(game_id).await?;
            Ok(TaskResult::GameLoaded { game, batch })
        });
    }

    /// Nothing is in flight and the round has no images to mark
    pub fn needs_reload(&self) -> bool {
        !self.busy && self.batch.is_none()
    }

    pub fn set_loaded(&mut self, game: Game, batch: ImageBatch) {
        self.game = Some(game);
        self.set_batch(batch);
    }

    pub fn set_batch(&mut self, batch: ImageBatch) {
        self.marks = vec![None; batch.images.len()];
        self.selection = 0;
        self.batch = Some(batch);
        self.busy = false;
    }

    pub fn image_count(&self) -> usize {
        self.batch.as_ref().map(|b| b.images.len()).unwrap_or(0)
    }

    pub fn move_selection(&mut self, down: bool) {
        self.selection = step_selection(self.selection, self.image_count(), down);
    }

    /// Mark the selected image and move on to the next one.
    pub fn mark(&mut self, fake: bool) {
        if let Some(mark) = self.marks.get_mut(self.selection) {
            *mark = Some(fake);
            self.move_selection(true);
        }
    }

    pub fn toggle(&mut self) {
        if let Some(mark) = self.marks.get_mut(self.selection) {
            *mark = Some(!mark.unwrap_or(false));
        }
    }

    pub fn marked_count(&self) -> usize {
        self.marks.iter().filter(|m| m.is_some()).count()
    }

    /// The guess for the whole batch. Every image must be marked.
    pub fn guesses(&self) -> Result<Vec<ImageGuess>> {
        let batch = self
            .batch
            .as_ref()
            .ok_or_else(|| anyhow!("no images loaded yet"))?;
        if batch.is_empty() {
            return Err(anyhow!("this round has no images"));
        }

        batch
            .images
            .iter()
            .zip(&self.marks)
            .map(|(image, mark)| match mark {
                Some(fake) => Ok(ImageGuess {
                    image_id: image.id,
                    fake: *fake,
                }),
                None => Err(anyhow!("mark every image before submitting")),
            })
            .collect()
    }

    /// Record the server's verdict; the score shown follows the server.
    /// The answered batch is dropped so it can never be submitted twice.
    pub fn apply_outcome(&mut self, outcome: GuessOutcome) {
        if let Some(game) = self.game.as_mut() {
            game.score = outcome.score;
            game.current_round = game.current_round.map(|r| r + 1);
            game.finished = outcome.game_over;
        }
        self.batch = None;
        self.marks.clear();
        self.selection = 0;
        self.last_outcome = Some(outcome);
    }
}

#[derive(Debug)]
pub struct ResultsView {
    pub game_id: i64,
    pub results: Option<GameResults>,
    pub starting: bool,
}

impl ResultsView {
    pub fn mount(game_id: i64, api: &ApiClient, tasks: &TaskSender) -> Self {
        let api = api.clone();
        tasks.spawn("Load results", async move {
            let results = api.fetch_results(game_id).await?;
            Ok(TaskResult::ResultsLoaded(results))
        });

        Self {
            game_id,
            results: None,
            starting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canaiguess_core::models::GameImage;

    fn view_with_batch(ids: &[i64]) -> GameView {
        let mut view = GameView {
            game_id: 1,
            game: None,
            batch: None,
            marks: Vec::new(),
            selection: 0,
            last_outcome: None,
            busy: true,
        };
        view.set_loaded(
            Game {
                id: 1,
                current_round: Some(1),
                total_rounds: Some(5),
                ..Default::default()
            },
            ImageBatch {
                images: ids
                    .iter()
                    .map(|&id| GameImage {
                        id,
                        url: format!("https://img.example/{}.png", id),
                    })
                    .collect(),
                round: Some(1),
            },
        );
        view
    }

    #[test]
    fn test_guess_requires_every_mark() {
        let mut view = view_with_batch(&[10, 11]);
        assert!(!view.busy);
        view.mark(true);
        assert_eq!(view.selection, 1);
        assert!(view.guesses().is_err());

        view.mark(false);
        let guesses = view.guesses().unwrap();
        assert_eq!(
            guesses,
            vec![
                ImageGuess { image_id: 10, fake: true },
                ImageGuess { image_id: 11, fake: false },
            ]
        );
    }

    #[test]
    fn test_toggle_flips_mark() {
        let mut view = view_with_batch(&[1]);
        view.toggle();
        assert_eq!(view.marks[0], Some(true));
        view.toggle();
        assert_eq!(view.marks[0], Some(false));
        assert_eq!(view.marked_count(), 1);
    }

    #[test]
    fn test_empty_batch_cannot_be_submitted() {
        let view = view_with_batch(&[]);
        assert!(view.guesses().is_err());
    }

    #[test]
    fn test_outcome_updates_score_and_round() {
        let mut view = view_with_batch(&[1]);
        view.apply_outcome(GuessOutcome {
            correct: true,
            score: 25,
            answers: Vec::new(),
            game_over: false,
        });
        let game = view.game.as_ref().unwrap();
        assert_eq!(game.score, 25);
        assert_eq!(game.current_round, Some(2));
        assert!(view.last_outcome.as_ref().unwrap().correct);
    }

    #[test]
    fn test_outcome_drops_answered_batch() {
        let mut view = view_with_batch(&[10, 11]);
        view.mark(true);
        view.mark(false);
        view.busy = true;
        view.apply_outcome(GuessOutcome {
            correct: false,
            score: 0,
            answers: Vec::new(),
            game_over: false,
        });

        assert!(view.batch.is_none());
        assert!(view.marks.is_empty());
        assert!(view.guesses().is_err());

        // The next batch failed to load
        view.busy = false;
        assert!(view.needs_reload());
    }

    #[test]
    fn test_new_batch_resets_marks() {
        let mut view = view_with_batch(&[1, 2]);
        view.mark(true);
        view.set_batch(ImageBatch {
            images: vec![GameImage { id: 3, url: String::new() }],
            round: Some(2),
        });
        assert_eq!(view.marks, vec![None]);
        assert_eq!(view.selection, 0);
    }
}
