use serde::{Deserialize, Serialize};

use crate::Color;

/// Face state of a card.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum CardState {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

/// A single card of a deck.
///
/// The index and color are fixed for the lifetime of the round; only the
/// state changes as the player reveals and matches cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    index: usize,
    color: Color,
    state: CardState,
}

impl Card {
    #[must_use]
    pub(crate) const fn new(index: usize, color: Color) -> Self {
        Self {
            index,
            color,
            state: CardState::Hidden,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the color if the card is face up.
    #[must_use]
    pub const fn visible_color(&self) -> Option<Color> {
        match self.state {
            CardState::Hidden => None,
            CardState::Revealed | CardState::Matched => Some(self.color),
        }
    }

    #[must_use]
    pub const fn state(&self) -> CardState {
        self.state
    }

    pub(crate) const fn set_state(&mut self, state: CardState) {
        self.state = state;
    }
}
