//! Interfaces to the world outside the engine.

use crate::{Card, Deck};

/// Shows cards to the player.
pub trait Renderer {
    /// Draws a freshly dealt deck, one visual unit per card.
    fn render_deck(&mut self, deck: &Deck);

    /// Updates the visual unit of a card whose state changed.
    fn update_card(&mut self, card: &Card);
}

/// Durable storage for the best score.
///
/// The store is the only state that outlives a session. An empty store is
/// normal on first run.
pub trait BestScoreStore {
    fn get(&self) -> Option<usize>;
    fn set(&mut self, value: usize);
}

/// Asks the player whether to play another round.
pub trait ReplayPrompt {
    fn confirm(&mut self, message: &str, best_score: usize) -> bool;
}

/// Asks the player how many pairs the next round should have.
pub trait RoundSizeInput {
    /// Returns `None` when the player gave no usable answer.
    fn request_size(&mut self) -> Option<usize>;
}

/// Best score kept in memory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryBestScoreStore(Option<usize>);

impl MemoryBestScoreStore {
    #[must_use]
    pub const fn new(best_score: Option<usize>) -> Self {
        Self(best_score)
    }
}

impl BestScoreStore for MemoryBestScoreStore {
    fn get(&self) -> Option<usize> {
        self.0
    }

    fn set(&mut self, value: usize) {
        self.0 = Some(value);
    }
}
