use pairs_engine::{Card, CardState};
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::ui::widgets::{color, style};

/// One card cell of the deck grid.
#[derive(Debug)]
pub struct CardDisplay {
    style: Style,
    symbol: &'static str,
    border_style: Style,
    selected: bool,
}

impl CardDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self {
            style,
            symbol,
            border_style: style::DEFAULT,
            selected: false,
        }
    }

    pub const fn width() -> u16 {
        6
    }

    pub const fn height() -> u16 {
        3
    }

    pub fn from_card(card: &Card) -> Self {
        match (card.state(), card.visible_color()) {
            (CardState::Hidden, _) | (_, None) => Self::new(style::HIDDEN_CARD, "?"),
            (state, Some(face)) => {
                let (r, g, b) = face.rgb();
                let style = Style::new()
                    .bg(Color::Rgb(r, g, b))
                    .fg(style::text_on((r, g, b)));
                let symbol = if state.is_matched() { "OK" } else { "" };
                Self::new(style, symbol)
            }
        }
    }

    /// Marks the card under the cursor.
    pub fn selected(self, selected: bool) -> Self {
        Self {
            border_style: if selected {
                style::CURSOR
            } else {
                self.border_style
            },
            selected,
            ..self
        }
    }

    /// Emphasizes a card whose state changed with the last input.
    pub fn changed(self, changed: bool) -> Self {
        if changed {
            Self {
                border_style: self.border_style.patch(style::CHANGED),
                ..self
            }
        } else {
            self
        }
    }
}

impl Widget for CardDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CardDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_type = if self.selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        let block = Block::bordered()
            .border_type(border_type)
            .border_style(self.border_style)
            .style(Style::new().bg(color::BLACK));
        let inner = block.inner(area);
        block.render(area, buf);

        // Use a Paragraph to fill the whole face, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(inner, buf);
    }
}
