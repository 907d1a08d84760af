use pairs_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::Line,
    widgets::{Block, Padding, Widget},
};

use crate::ui::widgets::{DeckDisplay, PromptDisplay, ScoreDisplay, color, style};

/// Deck and score panel side by side, with an optional popup on top.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    session: &'a GameSession,
    cursor: usize,
    changed: &'a [usize],
    prompt: Option<PromptDisplay<'a>>,
}

impl<'a> GameDisplay<'a> {
    pub fn new(session: &'a GameSession, cursor: usize) -> Self {
        Self {
            session,
            cursor,
            changed: &[],
            prompt: None,
        }
    }

    pub fn changed(self, changed: &'a [usize]) -> Self {
        Self { changed, ..self }
    }

    pub fn prompt(self, prompt: PromptDisplay<'a>) -> Self {
        Self {
            prompt: Some(prompt),
            ..self
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::horizontal(1);
        let border_style = match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Won => color::GREEN,
            SessionState::Finished => color::RED,
        };

        let deck = DeckDisplay::new(self.session.deck())
            .cursor(self.cursor)
            .changed(self.changed)
            .block(
                Block::bordered()
                    .title(Line::from("DECK").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let score = ScoreDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("SCORE").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(score.width()),
            Constraint::Length(deck.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [score_area] =
            Layout::vertical([Constraint::Length(score.height())]).areas(left_column);
        let [deck_area] = Layout::vertical([Constraint::Length(deck.height())]).areas(center_column);

        score.render(score_area, buf);
        deck.render(deck_area, buf);

        if let Some(prompt) = self.prompt {
            prompt.render(area, buf);
        }
    }
}
