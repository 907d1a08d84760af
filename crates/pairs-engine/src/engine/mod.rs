//! Game engine logic and state management.
//!
//! This module orchestrates the [core](crate::core) data structures into a
//! playable memory-matching game:
//!
//! - [`GameSession`] - Rounds of play sharing one best score
//! - [`SelectionEngine`] - Two-card reveal/compare state machine
//! - [`ScoreTracker`] - Guess and match counters, progress and best score
//! - [`Scheduler`] / [`TimerQueue`] - Delayed hiding of mismatched pairs
//! - [`SessionConfig`] / [`DeckSeed`] - Round size, delay and deterministic decks
//! - [`Renderer`], [`BestScoreStore`], [`ReplayPrompt`], [`RoundSizeInput`] -
//!   Interfaces implemented by front-ends
//!
//! # Game Flow
//!
//! 1. Start a [`GameSession`], which deals a shuffled deck of hidden pairs
//! 2. Feed card activations into [`GameSession::on_card_activated`]
//! 3. Matching pairs stay face up; mismatches are hidden again when their
//!    [`RevertTask`] comes due and is passed to [`GameSession::on_revert`]
//! 4. Once every pair is found, [`GameSession::on_round_won`] records the
//!    best score and asks whether to replay
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use pairs_engine::{GameSession, SessionConfig, TimerQueue};
//!
//! let mut session = GameSession::start(&SessionConfig::default().with_colors(3)).unwrap();
//! let mut timers = TimerQueue::new();
//!
//! for index in 0..session.deck().len() {
//!     session.on_card_activated(index, &mut timers).unwrap();
//!
//!     // Let any mismatch settle before the next card
//!     timers.advance_by(Duration::from_secs(1));
//!     while let Some(task) = timers.pop_due() {
//!         session.on_revert(task).unwrap();
//!     }
//! }
//! ```

pub use self::{
    collaborator::*, config::*, game_session::*, scheduler::*, score::*, seed::*, selection::*,
};

mod collaborator;
mod config;
mod game_session;
mod scheduler;
mod score;
mod seed;
mod selection;
