use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{
    BestScoreStore, Color, ColorPairGenerator, Deck, DeckSeed, GameError, GameEvent, Generation,
    Renderer, ReplayPrompt, RevertTask, RoundSizeInput, Scheduler, ScoreSnapshot, ScoreTracker,
    SelectionEngine, SelectionState, SessionConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// Cards can be activated.
    Playing,
    /// All pairs are found; the result has not been recorded yet.
    Won,
    /// The result is recorded and the player chose not to replay.
    Finished,
}

/// Result of feeding one input into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub events: Vec<GameEvent>,
    pub score: ScoreSnapshot,
}

impl Activation {
    #[must_use]
    pub fn is_round_won(&self) -> bool {
        self.events.iter().any(GameEvent::is_round_won)
    }
}

/// What happened after a won round was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RoundOutcome {
    /// A new round was dealt.
    Replay { best_score: usize },
    /// The player declined another round.
    Finished { best_score: usize },
}

impl RoundOutcome {
    #[must_use]
    pub const fn best_score(self) -> usize {
        match self {
            RoundOutcome::Replay { best_score } | RoundOutcome::Finished { best_score } => {
                best_score
            }
        }
    }
}

/// A game of rounds sharing one best score.
///
/// The session owns the deck, the selection state machine and the score of
/// the current round. Inputs arrive one at a time:
///
/// - [`on_card_activated`](Self::on_card_activated) for each card the player picks
/// - [`on_revert`](Self::on_revert) for each delayed task that comes due
/// - [`on_round_won`](Self::on_round_won) once the round is won
///
/// Restarting or resizing begins a new [`Generation`], which turns every
/// delayed task of the previous round into a stale event.
///
/// # Example
///
/// ```
/// use pairs_engine::{GameSession, SessionConfig, TimerQueue};
///
/// let config = SessionConfig::default().with_colors(2);
/// let mut session = GameSession::start(&config).unwrap();
/// let mut timers = TimerQueue::new();
///
/// let first = 0;
/// let partner = session.deck().partner_of(first).unwrap();
/// session.on_card_activated(first, &mut timers).unwrap();
/// let activation = session.on_card_activated(partner, &mut timers).unwrap();
///
/// assert_eq!(activation.score.matches, 1);
/// assert_eq!(activation.score.progress_percent, 50);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: DeckSeed,
    rng: Pcg32,
    colors: Vec<Color>,
    deck: Deck,
    selection: SelectionEngine,
    score: ScoreTracker,
    generation: Generation,
    session_state: SessionState,
}

impl GameSession {
    /// Deals the first round.
    ///
    /// Fails with [`GameError::InvalidArgument`] if `config.colors` is zero.
    pub fn start(config: &SessionConfig) -> Result<Self, GameError> {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = seed.rng();
        let colors = ColorPairGenerator::generate(&mut rng, config.colors)?;
        let deck = Deck::shuffled(&colors, &mut rng);
        let revert_delay = config.revert_delay.max(SessionConfig::MIN_REVERT_DELAY);
        let generation = Generation::default();

        log::info!(
            "round started: {} pairs, generation {generation}, seed {seed}",
            deck.pairs()
        );

        Ok(Self {
            seed,
            rng,
            score: ScoreTracker::new(deck.pairs()),
            colors,
            deck,
            selection: SelectionEngine::new(revert_delay),
            generation,
            session_state: SessionState::Playing,
        })
    }

    /// Like [`Self::start`], with the best score taken from `store`.
    pub fn start_with_store<S>(config: &SessionConfig, store: &S) -> Result<Self, GameError>
    where
        S: BestScoreStore + ?Sized,
    {
        let mut session = Self::start(config)?;
        session.score.set_best_score(store.get());
        Ok(session)
    }

    #[must_use]
    pub fn seed(&self) -> DeckSeed {
        self.seed
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Deals a new shuffle of the same colors.
    ///
    /// Counters are cleared, the best score is kept, and pending delayed
    /// tasks become stale.
    pub fn restart(&mut self) {
        self.deck = Deck::shuffled(&self.colors, &mut self.rng);
        self.begin_round();
    }

    /// Deals a round with `colors` new colors.
    ///
    /// On [`GameError::InvalidArgument`] the current round is left as it is.
    pub fn resize(&mut self, colors: usize) -> Result<(), GameError> {
        let colors = ColorPairGenerator::generate(&mut self.rng, colors)?;
        self.deck = Deck::shuffled(&colors, &mut self.rng);
        self.colors = colors;
        self.begin_round();
        Ok(())
    }

    /// Asks `input` for the size of the next round and deals it.
    ///
    /// Returns `Ok(false)`, keeping the current round, if the player gave no
    /// answer.
    pub fn resize_from<I>(&mut self, input: &mut I) -> Result<bool, GameError>
    where
        I: RoundSizeInput + ?Sized,
    {
        let Some(colors) = input.request_size() else {
            log::debug!("round size request cancelled");
            return Ok(false);
        };
        self.resize(colors)?;
        Ok(true)
    }

    fn begin_round(&mut self) {
        self.generation = self.generation.next();
        self.score.reset(self.deck.pairs());
        self.selection.reset();
        self.session_state = SessionState::Playing;
        log::info!(
            "round started: {} pairs, generation {}",
            self.deck.pairs(),
            self.generation
        );
    }

    /// Feeds a card activation into the selection state machine.
    pub fn on_card_activated<S>(
        &mut self,
        index: usize,
        scheduler: &mut S,
    ) -> Result<Activation, GameError>
    where
        S: Scheduler + ?Sized,
    {
        let mut events = vec![];
        if let Err(err) = self.selection.activate(
            &mut self.deck,
            &mut self.score,
            index,
            self.generation,
            scheduler,
            &mut events,
        ) {
            log::warn!("rejected activation: {err}");
            return Err(err);
        }

        if events.iter().any(GameEvent::is_round_won) {
            log::info!("round won with {} guesses", self.score.guesses());
            self.session_state = SessionState::Won;
        }
        Ok(self.activation(events))
    }

    /// Hides a mismatched pair once its delay has elapsed.
    ///
    /// Tasks from an earlier generation, or tasks that were already handled,
    /// fail with [`GameError::StaleEvent`] and change nothing.
    pub fn on_revert(&mut self, task: RevertTask) -> Result<Activation, GameError> {
        let stale = GameError::StaleEvent {
            event: task.generation,
            current: self.generation,
        };
        if task.generation != self.generation {
            log::debug!("dropped revert task: {stale}");
            return Err(stale);
        }
        let Some(event) = self.selection.revert(&mut self.deck, task.first, task.second) else {
            log::debug!("dropped revert task for cards {} and {}", task.first, task.second);
            return Err(stale);
        };
        Ok(self.activation(vec![event]))
    }

    /// Records a won round and asks whether to play again.
    ///
    /// The best score is read from `store`, lowered to this round's guess
    /// count if that is better, and written back. A new round is dealt only
    /// if `prompt` answers yes.
    pub fn on_round_won<S, P>(
        &mut self,
        store: &mut S,
        prompt: &mut P,
    ) -> Result<RoundOutcome, GameError>
    where
        S: BestScoreStore + ?Sized,
        P: ReplayPrompt + ?Sized,
    {
        if !self.session_state.is_won() {
            return Err(GameError::RoundNotWon);
        }

        let stored = store.get();
        let known = match (stored, self.score.best_score()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.score.set_best_score(known);
        let best_score = self
            .score
            .finalize(self.score.guesses())
            .ok_or(GameError::RoundNotWon)?;
        store.set(best_score);

        let message = replay_message(best_score);
        if prompt.confirm(&message, best_score) {
            self.restart();
            Ok(RoundOutcome::Replay { best_score })
        } else {
            self.session_state = SessionState::Finished;
            Ok(RoundOutcome::Finished { best_score })
        }
    }

    /// Draws the whole deck.
    pub fn render<R>(&self, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        renderer.render_deck(&self.deck);
    }

    /// Pushes the cards changed by `events` to `renderer`.
    ///
    /// Cards missing from the current deck, as left by events from before a
    /// resize, are skipped.
    pub fn apply_events<R>(&self, renderer: &mut R, events: &[GameEvent])
    where
        R: Renderer + ?Sized,
    {
        for index in events.iter().flat_map(GameEvent::changed_cards) {
            match self.deck.card(index) {
                Ok(card) => renderer.update_card(card),
                Err(err) => log::debug!("skipped card update: {err}"),
            }
        }
    }

    fn activation(&self, events: Vec<GameEvent>) -> Activation {
        Activation {
            events,
            score: self.score.snapshot(),
        }
    }
}

/// Text shown by the replay prompt.
#[must_use]
pub fn replay_message(best_score: usize) -> String {
    format!("You Rock! Your best score so far is {best_score}. Do you want to play again?")
}
