use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{CardState, Deck, GameError, Generation, RevertTask, Scheduler, ScoreTracker};

/// How many cards are face up and waiting for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum SelectionState {
    /// No card is waiting.
    #[default]
    Idle,
    /// One card is face up, waiting for the second.
    OnePending { first: usize },
    /// Two different cards are face up until the revert delay elapses.
    Resolving { first: usize, second: usize },
}

/// Why an activation was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The card is already part of a found pair.
    AlreadyMatched,
    /// The card is the one already waiting for a partner.
    AlreadyPending,
    /// A mismatched pair is still face up.
    Resolving,
}

/// Outcome of a single step of the selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GameEvent {
    /// A hidden card was turned face up.
    CardRevealed { index: usize },
    /// Two revealed cards share a color and stay face up.
    MatchFound { first: usize, second: usize },
    /// Two revealed cards differ; they are hidden again after the delay.
    MismatchPending { first: usize, second: usize },
    /// A mismatched pair was hidden again.
    MismatchResolved { first: usize, second: usize },
    /// All pairs have been found.
    RoundWon { guesses: usize },
    /// An activation had no effect.
    Ignored { index: usize, reason: IgnoreReason },
}

impl GameEvent {
    /// Cards whose state changed with this event.
    #[must_use]
    pub fn changed_cards(&self) -> ArrayVec<usize, 2> {
        let mut cards = ArrayVec::new();
        match *self {
            GameEvent::CardRevealed { index } => cards.push(index),
            GameEvent::MatchFound { first, second }
            | GameEvent::MismatchResolved { first, second } => {
                cards.push(first);
                cards.push(second);
            }
            GameEvent::MismatchPending { .. }
            | GameEvent::RoundWon { .. }
            | GameEvent::Ignored { .. } => {}
        }
        cards
    }
}

/// The two-card selection state machine.
///
/// At most two cards are face up and unmatched at any time:
///
/// ```text
///            reveal              reveal, same color
///   Idle ───────────▶ OnePending ───────────────────▶ Idle (MatchFound)
///    ▲                    │
///    │                    │ reveal, other color
///    │                    ▼
///    └───────────────  Resolving   (activations ignored)
///     revert after delay
/// ```
///
/// Every accepted reveal counts as one guess on the [`ScoreTracker`]; ignored
/// activations change nothing.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    state: SelectionState,
    revert_delay: Duration,
}

impl SelectionEngine {
    #[must_use]
    pub const fn new(revert_delay: Duration) -> Self {
        Self {
            state: SelectionState::Idle,
            revert_delay,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    #[must_use]
    pub const fn revert_delay(&self) -> Duration {
        self.revert_delay
    }

    /// Indices of the cards currently face up and unresolved.
    #[must_use]
    pub fn pending(&self) -> ArrayVec<usize, 2> {
        let mut pending = ArrayVec::new();
        match self.state {
            SelectionState::Idle => {}
            SelectionState::OnePending { first } => pending.push(first),
            SelectionState::Resolving { first, second } => {
                pending.push(first);
                pending.push(second);
            }
        }
        pending
    }

    /// Drops any selection, e.g. when a new deck is dealt.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Handles a card activation and appends the resulting events.
    ///
    /// A mismatch schedules a [`RevertTask`] for `generation` on `scheduler`.
    /// Fails with [`GameError::OutOfRange`] without touching any state if
    /// `index` is not a card of `deck`.
    pub fn activate<S>(
        &mut self,
        deck: &mut Deck,
        score: &mut ScoreTracker,
        index: usize,
        generation: Generation,
        scheduler: &mut S,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError>
    where
        S: Scheduler + ?Sized,
    {
        let card = *deck.card(index)?;

        let ignored = match self.state {
            SelectionState::Resolving { .. } => Some(IgnoreReason::Resolving),
            _ if card.state().is_matched() => Some(IgnoreReason::AlreadyMatched),
            SelectionState::OnePending { first } if first == index => {
                Some(IgnoreReason::AlreadyPending)
            }
            SelectionState::Idle | SelectionState::OnePending { .. } => None,
        };
        if let Some(reason) = ignored {
            log::debug!("ignored activation of card {index}: {reason:?}");
            events.push(GameEvent::Ignored { index, reason });
            return Ok(());
        }

        deck.set_state(index, CardState::Revealed);
        score.register_guess();
        events.push(GameEvent::CardRevealed { index });

        let SelectionState::OnePending { first } = self.state else {
            self.state = SelectionState::OnePending { first: index };
            return Ok(());
        };

        let second = index;
        if deck.cards()[first].color() == card.color() {
            deck.set_state(first, CardState::Matched);
            deck.set_state(second, CardState::Matched);
            score.register_match();
            self.state = SelectionState::Idle;
            events.push(GameEvent::MatchFound { first, second });
            if score.is_complete() {
                events.push(GameEvent::RoundWon {
                    guesses: score.guesses(),
                });
            }
        } else {
            log::debug!("mismatch between cards {first} and {second}");
            self.state = SelectionState::Resolving { first, second };
            scheduler.schedule_after(
                self.revert_delay,
                RevertTask {
                    generation,
                    first,
                    second,
                },
            );
            events.push(GameEvent::MismatchPending { first, second });
        }
        Ok(())
    }

    /// Hides the mismatched pair again.
    ///
    /// Returns `None` if the engine is not resolving exactly this pair, which
    /// happens when the task was already delivered.
    pub fn revert(&mut self, deck: &mut Deck, first: usize, second: usize) -> Option<GameEvent> {
        if self.state != (SelectionState::Resolving { first, second }) {
            return None;
        }
        deck.set_state(first, CardState::Hidden);
        deck.set_state(second, CardState::Hidden);
        self.state = SelectionState::Idle;
        Some(GameEvent::MismatchResolved { first, second })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Color, TimerQueue};

    use super::*;

    const RED: Color = Color::from_rgb(255, 0, 0);
    const BLUE: Color = Color::from_rgb(0, 0, 255);

    struct Fixture {
        deck: Deck,
        score: ScoreTracker,
        engine: SelectionEngine,
        timers: TimerQueue,
    }

    impl Fixture {
        /// Deck layout: RED BLUE RED BLUE
        fn new() -> Self {
            Self {
                deck: Deck::from_colors([RED, BLUE, RED, BLUE]),
                score: ScoreTracker::new(2),
                engine: SelectionEngine::new(Duration::from_millis(1000)),
                timers: TimerQueue::new(),
            }
        }

        fn activate(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
            let mut events = vec![];
            self.engine.activate(
                &mut self.deck,
                &mut self.score,
                index,
                Generation::default(),
                &mut self.timers,
                &mut events,
            )?;
            Ok(events)
        }

        fn state_of(&self, index: usize) -> CardState {
            self.deck.cards()[index].state()
        }
    }

    #[test]
    fn test_first_reveal() {
        let mut fx = Fixture::new();
        let events = fx.activate(1).unwrap();

        assert_eq!(events, [GameEvent::CardRevealed { index: 1 }]);
        assert_eq!(fx.engine.state(), SelectionState::OnePending { first: 1 });
        assert_eq!(fx.state_of(1), CardState::Revealed);
        assert_eq!(fx.score.guesses(), 1);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        let events = fx.activate(0).unwrap();

        assert_eq!(
            events,
            [GameEvent::Ignored {
                index: 0,
                reason: IgnoreReason::AlreadyPending
            }]
        );
        assert_eq!(fx.engine.state(), SelectionState::OnePending { first: 0 });
        assert_eq!(fx.score.guesses(), 1);
        assert_eq!(fx.score.matches(), 0);
    }

    #[test]
    fn test_match_resolves_immediately() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        let events = fx.activate(2).unwrap();

        assert_eq!(
            events,
            [
                GameEvent::CardRevealed { index: 2 },
                GameEvent::MatchFound {
                    first: 0,
                    second: 2
                },
            ]
        );
        assert!(fx.engine.state().is_idle());
        assert_eq!(fx.state_of(0), CardState::Matched);
        assert_eq!(fx.state_of(2), CardState::Matched);
        assert_eq!(fx.score.matches(), 1);
        assert!(fx.timers.is_empty());
    }

    #[test]
    fn test_mismatch_waits_for_revert() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        let events = fx.activate(1).unwrap();

        assert_eq!(
            events.last(),
            Some(&GameEvent::MismatchPending {
                first: 0,
                second: 1
            })
        );
        assert_eq!(
            fx.engine.state(),
            SelectionState::Resolving {
                first: 0,
                second: 1
            }
        );
        assert_eq!(fx.state_of(0), CardState::Revealed);
        assert_eq!(fx.state_of(1), CardState::Revealed);
        assert_eq!(fx.timers.len(), 1);

        // Not yet due
        fx.timers.advance_by(Duration::from_millis(999));
        assert_eq!(fx.timers.pop_due(), None);

        fx.timers.advance_by(Duration::from_millis(1));
        let task = fx.timers.pop_due().unwrap();
        let event = fx.engine.revert(&mut fx.deck, task.first, task.second);

        assert_eq!(
            event,
            Some(GameEvent::MismatchResolved {
                first: 0,
                second: 1
            })
        );
        assert!(fx.engine.state().is_idle());
        assert_eq!(fx.state_of(0), CardState::Hidden);
        assert_eq!(fx.state_of(1), CardState::Hidden);
    }

    #[test]
    fn test_third_card_ignored_while_resolving() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        fx.activate(1).unwrap();
        let events = fx.activate(2).unwrap();

        assert_eq!(
            events,
            [GameEvent::Ignored {
                index: 2,
                reason: IgnoreReason::Resolving
            }]
        );
        assert_eq!(fx.state_of(2), CardState::Hidden);
        assert_eq!(fx.score.guesses(), 2);
        assert_eq!(fx.engine.pending().as_slice(), [0, 1]);
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        fx.activate(2).unwrap();

        let events = fx.activate(0).unwrap();
        assert_eq!(
            events,
            [GameEvent::Ignored {
                index: 0,
                reason: IgnoreReason::AlreadyMatched
            }]
        );

        fx.activate(1).unwrap();
        let events = fx.activate(2).unwrap();
        assert_eq!(
            events,
            [GameEvent::Ignored {
                index: 2,
                reason: IgnoreReason::AlreadyMatched
            }]
        );
        assert_eq!(fx.engine.state(), SelectionState::OnePending { first: 1 });
        assert_eq!(fx.score.guesses(), 3);
    }

    #[test]
    fn test_out_of_range_changes_nothing() {
        let mut fx = Fixture::new();
        fx.activate(3).unwrap();
        let before = fx.deck.clone();

        assert_eq!(
            fx.activate(4),
            Err(GameError::OutOfRange { index: 4, len: 4 })
        );
        assert_eq!(fx.deck, before);
        assert_eq!(fx.engine.state(), SelectionState::OnePending { first: 3 });
        assert_eq!(fx.score.guesses(), 1);
    }

    #[test]
    fn test_last_match_wins_round() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        fx.activate(2).unwrap();
        fx.activate(1).unwrap();
        let events = fx.activate(3).unwrap();

        assert_eq!(
            events,
            [
                GameEvent::CardRevealed { index: 3 },
                GameEvent::MatchFound {
                    first: 1,
                    second: 3
                },
                GameEvent::RoundWon { guesses: 4 },
            ]
        );
        assert!(fx.score.is_complete());
    }

    #[test]
    fn test_revert_twice_is_rejected() {
        let mut fx = Fixture::new();
        fx.activate(0).unwrap();
        fx.activate(1).unwrap();

        assert!(fx.engine.revert(&mut fx.deck, 0, 1).is_some());
        assert!(fx.engine.revert(&mut fx.deck, 0, 1).is_none());
    }

    #[test]
    fn test_changed_cards() {
        assert_eq!(
            GameEvent::MatchFound {
                first: 1,
                second: 5
            }
            .changed_cards()
            .as_slice(),
            [1, 5]
        );
        assert!(
            GameEvent::MismatchPending {
                first: 1,
                second: 5
            }
            .changed_cards()
            .is_empty()
        );
    }
}
