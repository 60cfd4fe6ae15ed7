use super::card::Card;
use super::error::CardError;
use super::rank::Rank;
use super::ranking::Ranking;
use serde::Serialize;

/// The evaluated strength of exactly five cards.
///
/// Cards are arranged group-first (pairs and sets before kickers, each
/// descending) so the packed score compares as a plain integer:
///
/// ```text
/// score = ranking << 20 | r0 << 16 | r1 << 12 | r2 << 8 | r3 << 4 | r4
/// ```
///
/// where `r0..r4` are the arranged face values. The wheel (A-5-4-3-2) is
/// arranged as 5-4-3-2-A so it scores below the six-high straight.
///
/// Equality and ordering go through the score alone: two hands of the same
/// shape in different suits tie.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Strength {
    cards: [Card; 5],
    ranking: Ranking,
    score: u32,
}

impl Strength {
    pub const fn ranking(&self) -> Ranking {
        self.ranking
    }
    pub const fn score(&self) -> u32 {
        self.score
    }
    /// The five cards in scoring order.
    pub const fn cards(&self) -> [Card; 5] {
        self.cards
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
}

impl TryFrom<&[Card]> for Strength {
    type Error = CardError;
    fn try_from(cards: &[Card]) -> Result<Self, Self::Error> {
        let five: [Card; 5] = cards
            .try_into()
            .map_err(|_| CardError::InvalidLength(cards.len()))?;
        let (cards, ranking) = arrange(five);
        let score = cards
            .iter()
            .fold(ranking as u32, |acc, c| acc << 4 | c.rank() as u32);
        Ok(Self {
            cards,
            ranking,
            score,
        })
    }
}

/// Sorts the five cards into scoring order and names the category.
fn arrange(mut cards: [Card; 5]) -> ([Card; 5], Ranking) {
    cards.sort_by(|a, b| b.cmp(a));
    // runs of equal rank in the descending sort
    let mut groups: Vec<Vec<Card>> = Vec::new();
    for c in cards {
        match groups.last_mut() {
            Some(g) if g[0].rank() == c.rank() => g.push(c),
            _ => groups.push(vec![c]),
        }
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then(b[0].rank().cmp(&a[0].rank())));
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let distinct = groups.len() == 5;
    let high = cards[0].rank();
    let low = cards[4].rank();
    let wheel = distinct && high == Rank::Ace && cards[1].rank() == Rank::Five;
    let straight = distinct && (wheel || u8::from(high) - u8::from(low) == 4);
    let ranking = match (groups[0].len(), groups.get(1).map_or(0, |g| g.len())) {
        (4, _) => Ranking::FourOAK,
        (3, 2) => Ranking::FullHouse,
        (3, _) => Ranking::ThreeOAK,
        (2, 2) => Ranking::TwoPair,
        (2, _) => Ranking::OnePair,
        _ => match (straight, flush) {
            (true, true) if wheel => Ranking::StraightFlush,
            (true, true) if high == Rank::Ace => Ranking::RoyalFlush,
            (true, true) => Ranking::StraightFlush,
            (true, false) => Ranking::Straight,
            (false, true) => Ranking::Flush,
            (false, false) => Ranking::HighCard,
        },
    };
    let arranged = if wheel {
        // ace scores last: 5 4 3 2 A
        [cards[1], cards[2], cards[3], cards[4], cards[0]]
    } else {
        let mut flat = groups.into_iter().flatten();
        std::array::from_fn(|_| flat.next().unwrap_or(cards[0]))
    };
    (arranged, ranking)
}

impl PartialEq for Strength {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}
impl Eq for Strength {}
impl PartialOrd for Strength {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Strength {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score.cmp(&other.score)
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in &self.cards {
            write!(f, "{} ", card)?;
        }
        write!(f, "({})", self.ranking)
    }
}
