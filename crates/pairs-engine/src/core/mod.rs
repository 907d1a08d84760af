//! Cards, colors and decks.

pub use self::{card::*, color::*, deck::*};

pub(crate) mod card;
pub(crate) mod color;
pub(crate) mod deck;
