use super::card::Card;
use super::error::CardError;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use std::sync::LazyLock;

/// The 52-card reference deck, built once and never mutated.
static REFERENCE: LazyLock<[Card; 52]> = LazyLock::new(|| std::array::from_fn(|i| Card::from(i as u8)));

/// A dealable deck: an owned card order and a cursor.
///
/// Dealt cards stay in place behind the cursor, so a deck can always account
/// for everything it has handed out. `reset` reshuffles a full copy of the
/// reference deck; drawing past the end is an error, never a panic.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// A freshly shuffled 52-card deck.
    pub fn new() -> Self {
        let mut deck = Self {
            cards: REFERENCE.to_vec(),
            cursor: 0,
        };
        deck.shuffle(&mut SmallRng::from_os_rng());
        deck
    }

    /// An unshuffled deck of every card NOT in `excluded`, in reference
    /// order. Used to enumerate the undealt cards of a live hand.
    pub fn without(excluded: &[Card]) -> Self {
        Self {
            cards: REFERENCE
                .iter()
                .copied()
                .filter(|c| !excluded.contains(c))
                .collect(),
            cursor: 0,
        }
    }

    /// Returns all cards to the deck and reshuffles.
    pub fn reset(&mut self) {
        self.reset_with(&mut SmallRng::from_os_rng());
    }

    /// Deterministic variant of [`Self::reset`] for reproducible deals.
    pub fn reset_with<R: Rng>(&mut self, rng: &mut R) {
        self.cards = REFERENCE.to_vec();
        self.cursor = 0;
        self.shuffle(rng);
    }

    fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals the next `n` cards, advancing the cursor.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, CardError> {
        let left = self.remaining();
        if n > left {
            return Err(CardError::OutOfCards { wanted: n, left });
        }
        let dealt = self.cards[self.cursor..self.cursor + n].to_vec();
        self.cursor += n;
        Ok(dealt)
    }

    /// Deals exactly one card.
    pub fn draw_one(&mut self) -> Result<Card, CardError> {
        self.draw(1).map(|cards| cards[0])
    }

    /// Cards not yet dealt, in deal order.
    pub fn undealt(&self) -> &[Card] {
        &self.cards[self.cursor..]
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
