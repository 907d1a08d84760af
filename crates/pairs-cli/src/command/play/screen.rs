use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use pairs_engine::{
    BestScoreStore, Card, Deck, GameError, GameEvent, GameSession, Renderer, ReplayPrompt,
    RoundOutcome, RoundSizeInput, TimerQueue, replay_message, round_size_from_input,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    widgets::{Block, Padding},
};

use crate::ui::widgets::{self, GameDisplay, KeyBinding, KeyBindingDisplay, PromptDisplay, style};

/// Longest text accepted by the round size input.
const MAX_SIZE_INPUT: usize = 3;

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "↑", "↓", "→"], "Move"),
    (&["Space", "Enter"], "Flip"),
    (&["r"], "Restart"),
    (&["s"], "Size"),
    (&["q"], "Quit"),
];
const SIZE_INPUT_KEYS: &[KeyBinding] = &[
    (&["0-9"], "Type"),
    (&["Enter"], "Deal"),
    (&["Esc"], "Cancel"),
];
const ASK_REPLAY_KEYS: &[KeyBinding] = &[
    (&["y", "Enter"], "Play again"),
    (&["n", "Esc"], "Stop"),
    (&["q"], "Quit"),
];
const FINISHED_KEYS: &[KeyBinding] = &[(&["r"], "New round"), (&["q"], "Quit")];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Playing,
    SizeInput(String),
    AskReplay { best_score: usize },
    Finished { best_score: usize },
}

/// Cards changed by the last input, drawn with emphasis.
#[derive(Debug, Default)]
struct CardHighlights(Vec<usize>);

impl Renderer for CardHighlights {
    fn render_deck(&mut self, _deck: &Deck) {
        self.0.clear();
    }

    fn update_card(&mut self, card: &Card) {
        if !self.0.contains(&card.index()) {
            self.0.push(card.index());
        }
    }
}

/// Answer already given by a key press.
struct KeyAnswer(bool);

impl ReplayPrompt for KeyAnswer {
    fn confirm(&mut self, message: &str, best_score: usize) -> bool {
        log::info!("{message} (best {best_score}): {}", if self.0 { "yes" } else { "no" });
        self.0
    }
}

/// Text typed into the round size input, or `None` if it was cancelled.
struct TypedSize<'a>(Option<&'a str>);

impl RoundSizeInput for TypedSize<'_> {
    fn request_size(&mut self) -> Option<usize> {
        self.0.take().map(round_size_from_input)
    }
}

/// The interactive game screen.
///
/// Time is passed in as the duration since the screen started, which drives
/// the revert timers.
#[derive(Debug)]
pub struct PlayScreen<S> {
    session: GameSession,
    store: S,
    timers: TimerQueue,
    highlights: CardHighlights,
    cursor: usize,
    phase: Phase,
    is_exiting: bool,
}

impl<S> PlayScreen<S>
where
    S: BestScoreStore,
{
    pub fn new(session: GameSession, store: S) -> Self {
        Self {
            session,
            store,
            timers: TimerQueue::new(),
            highlights: CardHighlights::default(),
            cursor: 0,
            phase: Phase::Playing,
            is_exiting: false,
        }
    }

    pub fn into_parts(self) -> (GameSession, S) {
        (self.session, self.store)
    }

    pub fn should_exit(&self) -> bool {
        self.is_exiting
    }

    /// Time at which [`Self::update`] has work to do.
    pub fn next_wake(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Hides mismatched pairs whose delay has elapsed.
    pub fn update(&mut self, now: Duration) {
        self.timers.advance_to(now);
        while let Some(task) = self.timers.pop_due() {
            match self.session.on_revert(task) {
                Ok(activation) => self.apply(&activation.events),
                Err(GameError::StaleEvent { .. }) => {}
                Err(err) => log::warn!("revert failed: {err}"),
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event, now: Duration) {
        // Settle due reverts first, so the key sees the current cards
        self.update(now);

        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.phase.clone() {
            Phase::Playing => self.handle_playing_key(key),
            Phase::SizeInput(text) => self.handle_size_input_key(key, text),
            Phase::AskReplay { .. } => self.handle_ask_replay_key(key),
            Phase::Finished { .. } => self.handle_finished_key(key),
        }
    }

    fn handle_playing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.move_cursor(-1, 0),
            KeyCode::Right => self.move_cursor(1, 0),
            KeyCode::Up => self.move_cursor(0, -1),
            KeyCode::Down => self.move_cursor(0, 1),
            KeyCode::Char(' ') | KeyCode::Enter => self.activate(),
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('s') => self.phase = Phase::SizeInput(String::new()),
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn handle_size_input_key(&mut self, key: KeyEvent, mut text: String) {
        match key.code {
            KeyCode::Char(c) if text.len() < MAX_SIZE_INPUT && !c.is_control() => {
                text.push(c);
                self.phase = Phase::SizeInput(text);
            }
            KeyCode::Backspace => {
                text.pop();
                self.phase = Phase::SizeInput(text);
            }
            KeyCode::Enter => self.resize(TypedSize(Some(&text))),
            KeyCode::Esc => self.resize(TypedSize(None)),
            _ => {}
        }
    }

    fn handle_ask_replay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.record_win(true),
            KeyCode::Char('n') | KeyCode::Esc => self.record_win(false),
            KeyCode::Char('q') => {
                self.record_win(false);
                self.is_exiting = true;
            }
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        self.cursor = widgets::move_cursor(self.cursor, self.session.deck().len(), dx, dy);
    }

    fn activate(&mut self) {
        match self.session.on_card_activated(self.cursor, &mut self.timers) {
            Ok(activation) => {
                self.apply(&activation.events);
                if activation.is_round_won() {
                    self.phase = Phase::AskReplay {
                        best_score: self.projected_best(),
                    };
                }
            }
            Err(err) => log::warn!("card {} not activated: {err}", self.cursor),
        }
    }

    /// Best score the replay question shows before the result is recorded.
    fn projected_best(&self) -> usize {
        let score = self.session.score();
        let guesses = score.guesses();
        let projected = score.projected_best(guesses).unwrap_or(guesses);
        self.store.get().map_or(projected, |stored| stored.min(projected))
    }

    fn record_win(&mut self, replay: bool) {
        match self
            .session
            .on_round_won(&mut self.store, &mut KeyAnswer(replay))
        {
            Ok(RoundOutcome::Replay { .. }) => self.new_deck(),
            Ok(RoundOutcome::Finished { best_score }) => {
                self.phase = Phase::Finished { best_score };
            }
            Err(err) => {
                log::warn!("round result not recorded: {err}");
                self.phase = Phase::Playing;
            }
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.new_deck();
    }

    fn resize(&mut self, mut input: TypedSize<'_>) {
        match self.session.resize_from(&mut input) {
            Ok(true) => self.new_deck(),
            Ok(false) => self.phase = Phase::Playing,
            Err(err) => {
                log::warn!("round size rejected: {err}");
                self.phase = Phase::Playing;
            }
        }
    }

    fn new_deck(&mut self) {
        self.session.render(&mut self.highlights);
        self.cursor = self.cursor.min(self.session.deck().len().saturating_sub(1));
        self.phase = Phase::Playing;
    }

    fn apply(&mut self, events: &[GameEvent]) {
        self.highlights.0.clear();
        self.session.apply_events(&mut self.highlights, events);
    }

    pub fn draw(&self, frame: &mut Frame) {
        let (prompt, bindings) = match &self.phase {
            Phase::Playing => (None, PLAYING_KEYS),
            Phase::SizeInput(text) => (
                Some(
                    PromptDisplay::new("NEW ROUND", style::PROMPT)
                        .line("How many color pairs?")
                        .line(format!("{text}_")),
                ),
                SIZE_INPUT_KEYS,
            ),
            Phase::AskReplay { best_score } => (
                Some(
                    PromptDisplay::new("ROUND WON", style::WON)
                        .line(replay_message(*best_score)),
                ),
                ASK_REPLAY_KEYS,
            ),
            Phase::Finished { best_score } => (
                Some(
                    PromptDisplay::new("GAME OVER", style::FINISHED)
                        .line(format!("Your best score is {best_score}.")),
                ),
                FINISHED_KEYS,
            ),
        };

        let game = GameDisplay::new(&self.session, self.cursor).changed(&self.highlights.0);
        let game = match prompt {
            Some(prompt) => game.prompt(prompt),
            None => game,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(frame.area());
        frame.render_widget(game, main_area);
        let help =
            KeyBindingDisplay::new(bindings).block(Block::new().padding(Padding::horizontal(1)));
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pairs_engine::{CardState, DeckSeed, MemoryBestScoreStore, SessionConfig};

    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn screen(colors: usize) -> PlayScreen<MemoryBestScoreStore> {
        let config = SessionConfig::default()
            .with_colors(colors)
            .with_revert_delay(DELAY)
            .with_seed(DeckSeed::from_bytes([3; 16]));
        let session = GameSession::start(&config).unwrap();
        PlayScreen::new(session, MemoryBestScoreStore::default())
    }

    fn press(screen: &mut PlayScreen<MemoryBestScoreStore>, code: KeyCode, now: Duration) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        screen.handle_event(&event, now);
    }

    fn flip(screen: &mut PlayScreen<MemoryBestScoreStore>, index: usize, now: Duration) {
        screen.cursor = index;
        press(screen, KeyCode::Enter, now);
    }

    fn solve(screen: &mut PlayScreen<MemoryBestScoreStore>) {
        for index in 0..screen.session.deck().len() {
            if screen.session.deck().cards()[index].state().is_hidden() {
                let partner = screen.session.deck().partner_of(index).unwrap();
                flip(screen, index, Duration::ZERO);
                flip(screen, partner, Duration::ZERO);
            }
        }
    }

    #[test]
    fn test_mismatch_hides_after_delay() {
        let mut screen = screen(3);
        let first = 0;
        let color = screen.session.deck().cards()[first].color();
        let other = screen
            .session
            .deck()
            .cards()
            .iter()
            .find(|card| card.color() != color)
            .unwrap()
            .index();

        flip(&mut screen, first, Duration::ZERO);
        flip(&mut screen, other, Duration::ZERO);
        assert_eq!(screen.next_wake(), Some(DELAY));
        assert_eq!(screen.highlights.0, vec![other]);

        screen.update(DELAY - Duration::from_millis(1));
        assert!(screen.session.deck().cards()[other].state().is_revealed());

        screen.update(DELAY);
        assert!(screen.session.deck().cards()[first].state().is_hidden());
        assert!(screen.session.deck().cards()[other].state().is_hidden());
        assert_eq!(screen.next_wake(), None);
    }

    #[test]
    fn test_win_asks_and_replays() {
        let mut screen = screen(2);
        solve(&mut screen);
        // Every revealed card counts as a guess
        assert_eq!(screen.phase, Phase::AskReplay { best_score: 4 });

        press(&mut screen, KeyCode::Char('y'), Duration::ZERO);
        assert_eq!(screen.phase, Phase::Playing);
        assert_eq!(screen.store.get(), Some(4));
        assert_eq!(screen.session.score().guesses(), 0);
        assert!(
            screen
                .session
                .deck()
                .cards()
                .iter()
                .all(|card| card.state() == CardState::Hidden)
        );
    }

    #[test]
    fn test_win_declined_finishes() {
        let mut screen = screen(2);
        solve(&mut screen);

        press(&mut screen, KeyCode::Char('n'), Duration::ZERO);
        assert_eq!(screen.phase, Phase::Finished { best_score: 4 });
        assert!(screen.session.session_state().is_finished());

        press(&mut screen, KeyCode::Char('r'), Duration::ZERO);
        assert_eq!(screen.phase, Phase::Playing);
        assert!(screen.session.session_state().is_playing());
    }

    #[test]
    fn test_quit_while_asked_records_result() {
        let mut screen = screen(1);
        solve(&mut screen);

        press(&mut screen, KeyCode::Char('q'), Duration::ZERO);
        assert!(screen.should_exit());
        assert_eq!(screen.store.get(), Some(2));
    }

    #[test]
    fn test_size_input_deals_new_round() {
        let mut screen = screen(4);
        press(&mut screen, KeyCode::Char('s'), Duration::ZERO);
        press(&mut screen, KeyCode::Char('6'), Duration::ZERO);
        assert_eq!(screen.phase, Phase::SizeInput("6".to_owned()));

        press(&mut screen, KeyCode::Enter, Duration::ZERO);
        assert_eq!(screen.phase, Phase::Playing);
        assert_eq!(screen.session.deck().len(), 12);
    }

    #[test]
    fn test_size_input_falls_back_to_default() {
        let mut screen = screen(4);
        press(&mut screen, KeyCode::Char('s'), Duration::ZERO);
        press(&mut screen, KeyCode::Char('x'), Duration::ZERO);
        press(&mut screen, KeyCode::Enter, Duration::ZERO);
        assert_eq!(
            screen.session.deck().len(),
            2 * SessionConfig::DEFAULT_COLORS
        );
    }

    #[test]
    fn test_size_input_cancel_keeps_round() {
        let mut screen = screen(4);
        flip(&mut screen, 0, Duration::ZERO);
        press(&mut screen, KeyCode::Char('s'), Duration::ZERO);
        press(&mut screen, KeyCode::Esc, Duration::ZERO);

        assert_eq!(screen.phase, Phase::Playing);
        assert_eq!(screen.session.deck().len(), 8);
        assert!(screen.session.deck().cards()[0].state().is_revealed());
    }

    #[test]
    fn test_restart_makes_pending_revert_stale() {
        let mut screen = screen(3);
        let color = screen.session.deck().cards()[0].color();
        let other = screen
            .session
            .deck()
            .cards()
            .iter()
            .find(|card| card.color() != color)
            .unwrap()
            .index();
        flip(&mut screen, 0, Duration::ZERO);
        flip(&mut screen, other, Duration::ZERO);
        press(&mut screen, KeyCode::Char('r'), Duration::ZERO);
        flip(&mut screen, 0, Duration::from_millis(100));

        screen.update(DELAY);
        assert!(screen.session.deck().cards()[0].state().is_revealed());
    }

    #[test]
    fn test_cursor_stays_on_deck() {
        let mut screen = screen(2);
        press(&mut screen, KeyCode::Left, Duration::ZERO);
        assert_eq!(screen.cursor, 0);
        for _ in 0..5 {
            press(&mut screen, KeyCode::Right, Duration::ZERO);
            press(&mut screen, KeyCode::Down, Duration::ZERO);
        }
        assert_eq!(screen.cursor, 3);
    }
}
