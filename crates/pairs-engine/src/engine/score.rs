use serde::{Deserialize, Serialize};

/// Score of the current round and the best score across rounds.
///
/// - **Guesses**: number of cards turned face up, two per attempt
/// - **Matches**: number of pairs found
/// - **Target matches**: number of pairs in the deck
/// - **Best score**: lowest guess count of any completed round, if any
///
/// Guesses and matches are reset for every round; the best score is kept.
///
/// # Example
///
/// ```
/// use pairs_engine::ScoreTracker;
///
/// let mut score = ScoreTracker::new(2);
/// score.register_guess();
/// score.register_guess();
/// score.register_match();
/// assert_eq!(score.progress_percent(), 50);
///
/// score.register_guess();
/// score.register_guess();
/// score.register_match();
/// assert_eq!(score.finalize(score.guesses()), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    guesses: usize,
    matches: usize,
    target_matches: usize,
    best_score: Option<usize>,
}

/// Point-in-time copy of a [`ScoreTracker`] for renderers and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub guesses: usize,
    pub matches: usize,
    pub target_matches: usize,
    pub progress_percent: usize,
    pub best_score: Option<usize>,
}

impl ScoreTracker {
    /// Creates a tracker for a round of `target_matches` pairs with no best score.
    #[must_use]
    pub const fn new(target_matches: usize) -> Self {
        Self {
            guesses: 0,
            matches: 0,
            target_matches,
            best_score: None,
        }
    }

    #[must_use]
    pub const fn guesses(&self) -> usize {
        self.guesses
    }

    #[must_use]
    pub const fn matches(&self) -> usize {
        self.matches
    }

    #[must_use]
    pub const fn target_matches(&self) -> usize {
        self.target_matches
    }

    #[must_use]
    pub const fn best_score(&self) -> Option<usize> {
        self.best_score
    }

    /// Replaces the best score, e.g. with a value read from storage.
    pub const fn set_best_score(&mut self, best_score: Option<usize>) {
        self.best_score = best_score;
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.matches == self.target_matches
    }

    pub const fn register_guess(&mut self) {
        self.guesses += 1;
    }

    pub const fn register_match(&mut self) {
        self.matches += 1;
    }

    /// Percentage of pairs found, rounded up.
    #[must_use]
    pub fn progress_percent(&self) -> usize {
        if self.target_matches == 0 {
            return 100;
        }
        (self.matches * 100).div_ceil(self.target_matches)
    }

    /// Best score `finalize` would record for `current_guesses`, without
    /// recording it.
    #[must_use]
    pub fn projected_best(&self, current_guesses: usize) -> Option<usize> {
        if !self.is_complete() {
            return self.best_score;
        }
        Some(
            self.best_score
                .map_or(current_guesses, |best| best.min(current_guesses)),
        )
    }

    /// Records the result of a completed round and returns the new best score.
    ///
    /// A missing best score counts as unbounded, so the first completed round
    /// always sets it. Rounds that are not complete leave it unchanged.
    pub fn finalize(&mut self, current_guesses: usize) -> Option<usize> {
        self.best_score = self.projected_best(current_guesses);
        self.best_score
    }

    /// Clears the round counters for a new round of `target_matches` pairs.
    pub const fn reset(&mut self, target_matches: usize) {
        self.guesses = 0;
        self.matches = 0;
        self.target_matches = target_matches;
    }

    #[must_use]
    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            guesses: self.guesses,
            matches: self.matches,
            target_matches: self.target_matches,
            progress_percent: self.progress_percent(),
            best_score: self.best_score,
        }
    }
}
