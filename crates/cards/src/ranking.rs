use serde::Deserialize;
use serde::Serialize;

/// The nine-plus-one hand categories, weakest to strongest.
///
/// Discriminants start at 1 and occupy the high bits of a packed
/// [`Strength`] score, so any stronger category beats any weaker one
/// regardless of kickers.
///
/// [`Strength`]: super::strength::Strength
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Ranking {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOAK = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOAK = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl Ranking {
    /// Human-readable name.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::OnePair => "One Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOAK => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOAK => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
