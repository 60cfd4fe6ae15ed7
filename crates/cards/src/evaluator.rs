use super::card::Card;
use super::error::CardError;
use super::strength::Strength;

/// Picks the strongest five-card hand from 5, 6, or 7 cards.
///
/// Six and seven cards are searched exhaustively over every 5-subset (21
/// subsets at most), which is cheap enough that no precomputed lookup is
/// warranted at table pace. Any other length is an error.
pub fn evaluate(cards: &[Card]) -> Result<Strength, CardError> {
    match cards.len() {
        5 => Strength::try_from(cards),
        n @ (6 | 7) => {
            let mut best: Option<Strength> = None;
            for mask in 0u32..1 << n {
                if mask.count_ones() != 5 {
                    continue;
                }
                let five = (0..n)
                    .filter(|i| mask >> i & 1 == 1)
                    .map(|i| cards[i])
                    .collect::<Vec<_>>();
                let next = Strength::try_from(five.as_slice())?;
                best = match best {
                    Some(prev) if prev >= next => Some(prev),
                    _ => Some(next),
                };
            }
            best.ok_or(CardError::InvalidLength(n))
        }
        n => Err(CardError::InvalidLength(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::cards;
    use crate::ranking::Ranking;

    fn best(s: &str) -> Strength {
        evaluate(&cards(s).unwrap()).unwrap()
    }

    #[test]
    fn rejects_unusable_lengths() {
        for s in ["", "As", "As Ks Qs Js", "As Ks Qs Js Ts 9s 8s 7s"] {
            assert!(evaluate(&cards(s).unwrap()).is_err());
        }
    }

    #[test]
    fn finds_the_nut_five_of_seven() {
        // board pairs the seven but the flush is out there
        let s = best("Ah Kh 7c 7d 2h 9h Qh");
        assert!(s.ranking() == Ranking::Flush);
        // hole cards irrelevant, the board plays
        let s = best("2c 3d Ts Js Qs Ks As");
        assert!(s.ranking() == Ranking::RoyalFlush);
    }

    #[test]
    fn finds_the_nut_five_of_six() {
        let s = best("7c 7d 7h 2s 2d Ad");
        assert!(s.ranking() == Ranking::FullHouse);
    }

    #[test]
    fn straight_hiding_in_seven() {
        let s = best("9c 8d 2h 7s Kd 6c 5h");
        assert!(s.ranking() == Ranking::Straight);
    }

    #[test]
    fn seven_card_best_dominates_every_subset() {
        let seven = cards("Ah Kh 7c 7d 2h 9h Qh").unwrap();
        let best = evaluate(&seven).unwrap();
        for mask in 0u32..1 << 7 {
            if mask.count_ones() != 5 {
                continue;
            }
            let five = (0..7)
                .filter(|i| mask >> i & 1 == 1)
                .map(|i| seven[i])
                .collect::<Vec<_>>();
            assert!(best >= evaluate(&five).unwrap());
        }
    }
}
