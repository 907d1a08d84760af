use std::iter;

use pairs_engine::Deck;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CardDisplay;

/// The deck laid out as a grid of cards, row by row in deck order.
#[derive(Debug)]
pub struct DeckDisplay<'a> {
    deck: &'a Deck,
    cursor: Option<usize>,
    changed: &'a [usize],
    block: Option<BlockWidget<'a>>,
}

impl<'a> DeckDisplay<'a> {
    pub fn new(deck: &'a Deck) -> Self {
        Self {
            deck,
            cursor: None,
            changed: &[],
            block: None,
        }
    }

    pub fn cursor(self, cursor: usize) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    pub fn changed(self, changed: &'a [usize]) -> Self {
        Self { changed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn columns(&self) -> usize {
        columns_for(self.deck.len())
    }

    pub fn rows(&self) -> usize {
        self.deck.len().div_ceil(self.columns())
    }

    pub fn width(&self) -> u16 {
        grid_len(self.columns()) * CardDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        grid_len(self.rows()) * CardDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Number of grid columns for `cards` cards.
///
/// The grid is as close to square as possible, wider rather than taller.
pub fn columns_for(cards: usize) -> usize {
    if cards == 0 {
        return 1;
    }
    let mut columns = cards.isqrt();
    if columns * columns < cards {
        columns += 1;
    }
    columns
}

/// Moves `cursor` by `(dx, dy)` cells on a grid of `cards` cards.
///
/// The cursor stops at the edges and never lands past the last card.
pub fn move_cursor(cursor: usize, cards: usize, dx: isize, dy: isize) -> usize {
    if cards == 0 {
        return 0;
    }
    let columns = columns_for(cards);
    let rows = cards.div_ceil(columns);
    let col = (cursor % columns).saturating_add_signed(dx).min(columns - 1);
    let row = (cursor / columns).saturating_add_signed(dy).min(rows - 1);
    (row * columns + col).min(cards - 1)
}

fn grid_len(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Widget for DeckDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &DeckDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let columns = self.columns();
        let col_constraints = (0..columns).map(|_| Constraint::Length(CardDisplay::width()));
        let row_constraints = (0..self.rows()).map(|_| Constraint::Length(CardDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = vertical
            .split(area)
            .iter()
            .flat_map(|row| horizontal.split(*row).to_vec())
            .collect::<Vec<_>>();

        for (grid_cell, card) in iter::zip(grid_cells, self.deck.cards()) {
            let index = card.index();
            CardDisplay::from_card(card)
                .selected(self.cursor == Some(index))
                .changed(self.changed.contains(&index))
                .render(grid_cell, buf);
        }
    }
}
