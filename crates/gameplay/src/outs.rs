use super::GameError;
use super::Position;
use felt_cards::evaluate;
use felt_cards::Card;
use felt_cards::Deck;
use std::collections::BTreeMap;

/// The cards that would cost a run-out leader the pot.
///
/// An out is an undealt card whose arrival lets some trailing seat equal or
/// beat the leader's resulting hand. Each distinct card counts once no
/// matter how many seats it rescues; `beats` keeps the per-seat breakdown
/// for offer payloads.
#[derive(Debug, Clone)]
pub struct Outs {
    pub leader: Position,
    pub cards: Vec<Card>,
    pub beats: BTreeMap<Position, Vec<Card>>,
}

impl Outs {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// Enumerates outs against each current leader of a decided run-out.
///
/// `board` is the community cards so far (three or four), `holes` the face-up
/// hole cards of every seat eligible for the pot. All of those cards are
/// excluded from the candidate deck: in a run-out every contender's hand is
/// public. Tied co-leaders do not count as trailing each other — a card that
/// preserves their chop threatens neither.
pub fn outs(
    board: &[Card],
    holes: &BTreeMap<Position, [Card; 2]>,
) -> Result<Vec<Outs>, GameError> {
    let mut current = BTreeMap::new();
    for (seat, hole) in holes {
        let mut cards = board.to_vec();
        cards.extend(hole);
        current.insert(*seat, evaluate(&cards)?);
    }
    let best = match current.values().max() {
        Some(s) => *s,
        None => return Ok(Vec::new()),
    };
    let leaders = current
        .iter()
        .filter(|(_, s)| **s == best)
        .map(|(p, _)| *p)
        .collect::<Vec<_>>();
    let known = board
        .iter()
        .copied()
        .chain(holes.values().flatten().copied())
        .collect::<Vec<_>>();
    let undealt = Deck::without(&known);
    let mut all = Vec::new();
    for leader in leaders.iter().copied() {
        let mut cards = Vec::new();
        let mut beats = BTreeMap::<Position, Vec<Card>>::new();
        for candidate in undealt.undealt().iter().copied() {
            let leads = {
                let mut hand = board.to_vec();
                hand.push(candidate);
                hand.extend(holes[&leader]);
                evaluate(&hand)?
            };
            let mut saved = false;
            for (trailer, hole) in holes.iter().filter(|(p, _)| !leaders.contains(p)) {
                let mut hand = board.to_vec();
                hand.push(candidate);
                hand.extend(hole);
                if evaluate(&hand)? >= leads {
                    beats.entry(*trailer).or_default().push(candidate);
                    saved = true;
                }
            }
            if saved {
                cards.push(candidate);
            }
        }
        all.push(Outs {
            leader,
            cards,
            beats,
        });
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_cards::cards;

    fn hole(s: &str) -> [Card; 2] {
        let v = cards(s).unwrap();
        [v[0], v[1]]
    }

    #[test]
    fn no_contenders_no_outs() {
        assert!(outs(&cards("2c 7d Jh").unwrap(), &BTreeMap::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn set_under_set_draws_to_one_rank() {
        // turn run-out: top set leads bottom set, the case deuce saves it
        let board = cards("Qh 2d 7s 8c").unwrap();
        let holes = BTreeMap::from([(0, hole("Qs Qd")), (1, hole("2h 2s"))]);
        let result = outs(&board, &holes).unwrap();
        assert!(result.len() == 1);
        assert!(result[0].leader == 0);
        assert!(result[0].cards == cards("2c").unwrap());
        assert!(result[0].beats[&1] == cards("2c").unwrap());
    }

    #[test]
    fn flush_draw_against_an_overpair() {
        // flop run-out: overpair leads, nine hearts complete the flush
        let board = cards("Kh 7h 2c").unwrap();
        let holes = BTreeMap::from([(0, hole("Ac Ad")), (1, hole("Qh Jh"))]);
        let result = outs(&board, &holes).unwrap();
        assert!(result.len() == 1 && result[0].leader == 0);
        let hearts = result[0]
            .cards
            .iter()
            .filter(|c| c.suit() == felt_cards::Suit::H)
            .count();
        assert!(hearts == 9);
    }

    #[test]
    fn distinct_cards_count_once_across_trailers() {
        // two trailing flush draws share their suits' outs
        let board = cards("Kh 7h 2c Th").unwrap();
        let holes = BTreeMap::from([
            (0, hole("Kc Kd")),
            (1, hole("Ah 3h")),
            (2, hole("Qh Jh")),
        ]);
        let result = outs(&board, &holes).unwrap();
        // the ace-high flush leads; the set fills up on any board pair and
        // the lower flush needs the nine of hearts for a straight flush
        assert!(result.len() == 1);
        let top = &result[0];
        assert!(top.leader == 1);
        assert!(top.cards.contains(&cards("9h").unwrap()[0]));
        assert!(top.beats[&0].contains(&cards("Ks").unwrap()[0]));
        let shared: usize = top.beats.values().map(|v| v.len()).sum();
        assert!(top.count() <= shared);
    }

    #[test]
    fn drawing_dead_means_zero_outs() {
        // quads on the turn leave the trailer no river at all
        let board = cards("7c 7d 7h 7s").unwrap();
        let holes = BTreeMap::from([(0, hole("Ac Kd")), (1, hole("2c 3d"))]);
        let result = outs(&board, &holes).unwrap();
        assert!(result.len() == 1 && result[0].leader == 0);
        assert!(result[0].count() == 0);
    }

    #[test]
    fn co_leaders_do_not_threaten_each_other() {
        // identical straights chop; with no third player there are no outs
        let board = cards("9c 8d 7h 6s").unwrap();
        let holes = BTreeMap::from([(0, hole("Tc 2c")), (1, hole("Td 2d"))]);
        let result = outs(&board, &holes).unwrap();
        assert!(result.len() == 2);
        assert!(result.iter().all(|o| o.count() == 0));
    }
}
