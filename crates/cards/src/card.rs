use super::error::CardError;
use super::rank::Rank;
use super::suit::Suit;
use serde::Deserialize;
use serde::Serialize;

/// A playing card: a rank and a suit.
///
/// Ordering is rank-major (suit breaks the tie for determinism only).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub const fn rank(&self) -> Rank {
        self.rank
    }
    pub const fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self { rank, suit }
    }
}

/// u8 isomorphism (0..52, rank-major)
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4 + 2),
            suit: Suit::from(n % 4),
        }
    }
}
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        (u8::from(c.rank) - 2) * 4 + u8::from(c.suit)
    }
}

/// str isomorphism ("As", "Td", "2c")
impl TryFrom<&str> for Card {
    type Error = CardError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(|| CardError::ParseCard(s.to_string()))?;
        let rank = Rank::try_from(&s[..split]).map_err(|_| CardError::ParseCard(s.to_string()))?;
        let suit = Suit::try_from(&s[split..]).map_err(|_| CardError::ParseCard(s.to_string()))?;
        Ok(Self { rank, suit })
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses a whitespace-separated card list, e.g. "As Kd 7c".
pub fn cards(s: &str) -> Result<Vec<Card>, CardError> {
    s.split_whitespace().map(Card::try_from).collect()
}
