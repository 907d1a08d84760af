use rand::Rng;

use crate::{Card, CardState, Color, GameError};

/// Shuffles a slice in place with the Fisher–Yates algorithm.
///
/// For each position `i` from the end down to 1, a uniform index `j` in
/// `0..=i` is drawn and the two elements are swapped. Given a uniform random
/// source, every permutation is equally likely.
pub fn shuffle<T, R>(seq: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..seq.len()).rev() {
        let j = rng.random_range(0..=i);
        seq.swap(i, j);
    }
}

/// Cards of a single round.
///
/// The order and colors of the cards are fixed when the deck is created.
/// Only the state of each card changes during the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Lays out the given colors as a deck, in order.
    #[must_use]
    pub fn from_colors<I>(colors: I) -> Self
    where
        I: IntoIterator<Item = Color>,
    {
        let cards = colors
            .into_iter()
            .enumerate()
            .map(|(index, color)| Card::new(index, color))
            .collect();
        Self { cards }
    }

    /// Shuffles a copy of `colors` and lays it out as a deck.
    ///
    /// `colors` itself is left untouched so that it can be dealt again.
    #[must_use]
    pub fn shuffled<R>(colors: &[Color], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut colors = colors.to_vec();
        shuffle(&mut colors, rng);
        Self::from_colors(colors)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs in the deck.
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Result<&Card, GameError> {
        self.cards.get(index).ok_or(GameError::OutOfRange {
            index,
            len: self.cards.len(),
        })
    }

    pub(crate) fn set_state(&mut self, index: usize, state: CardState) {
        self.cards[index].set_state(state);
    }

    /// Iterates over the cards that are currently in the given state.
    pub fn cards_in(&self, state: CardState) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |card| card.state() == state)
    }

    /// Index of the other card with the same color.
    #[must_use]
    pub fn partner_of(&self, index: usize) -> Option<usize> {
        let color = self.cards.get(index)?.color();
        self.cards
            .iter()
            .position(|card| card.index() != index && card.color() == color)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(42);
        let original: Vec<u32> = (0..50).collect();
        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut rng);

        assert_ne!(shuffled, original);
        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_shuffle_handles_short_slices() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);
        let mut single = [9];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, [9]);
    }

    #[test]
    fn test_shuffle_positions_are_uniform() {
        const LEN: usize = 5;
        const TRIALS: usize = 50_000;

        let mut rng = Pcg32::seed_from_u64(2024);
        let mut counts = [[0_usize; LEN]; LEN];
        for _ in 0..TRIALS {
            let mut seq: [usize; LEN] = std::array::from_fn(|i| i);
            shuffle(&mut seq, &mut rng);
            for (position, value) in seq.into_iter().enumerate() {
                counts[value][position] += 1;
            }
        }

        let expected = TRIALS / LEN;
        let tolerance = expected / 20;
        for row in counts {
            for count in row {
                assert!(
                    count.abs_diff(expected) < tolerance,
                    "count {count} too far from {expected}"
                );
            }
        }
    }

    #[test]
    fn test_shuffled_leaves_source_untouched() {
        let mut rng = Pcg32::seed_from_u64(3);
        let colors: Vec<_> = (0..8).map(|i| Color::from_rgb(i, i, i)).collect();
        let before = colors.clone();
        let deck = Deck::shuffled(&colors, &mut rng);

        assert_eq!(colors, before);
        assert_eq!(deck.len(), 8);
        for (index, card) in deck.cards().iter().enumerate() {
            assert_eq!(card.index(), index);
            assert!(card.state().is_hidden());
        }
    }

    #[test]
    fn test_card_out_of_range() {
        let deck = Deck::from_colors([Color::from_rgb(1, 2, 3); 2]);
        assert!(deck.card(1).is_ok());
        assert_eq!(
            deck.card(2),
            Err(GameError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_partner_of() {
        let a = Color::from_rgb(1, 0, 0);
        let b = Color::from_rgb(0, 1, 0);
        let deck = Deck::from_colors([a, b, b, a]);
        assert_eq!(deck.partner_of(0), Some(3));
        assert_eq!(deck.partner_of(2), Some(1));
        assert_eq!(deck.partner_of(4), None);
    }
}
