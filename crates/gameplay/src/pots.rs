use super::Chips;
use super::Position;
use felt_cards::Strength;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A main or side pot: chips and the seats entitled to contest them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pot {
    pub chips: Chips,
    pub eligible: BTreeSet<Position>,
}

/// One still-contesting seat's total commitment for pot layering.
#[derive(Debug, Clone, Copy)]
pub struct Contribution {
    pub seat: Position,
    pub chips: Chips,
    pub shoved: bool,
}

/// Layers the contested chips into pots.
///
/// Walking the distinct all-in commitments in ascending order, each layer
/// collects every contribution between the previous threshold and this one;
/// eligibility shrinks as shorter stacks cap out. Chips nobody can contest —
/// antes and folded seats' bets, passed as `dead` — land in the first pot.
///
/// The sum over all pots always equals `dead` plus the live contributions.
pub fn build(live: &[Contribution], dead: Chips) -> Vec<Pot> {
    let mut levels = live
        .iter()
        .filter(|c| c.shoved)
        .map(|c| c.chips)
        .collect::<Vec<_>>();
    if let Some(max) = live.iter().map(|c| c.chips).max() {
        levels.push(max);
    }
    levels.sort();
    levels.dedup();
    levels.retain(|l| *l > 0);
    let mut pots = Vec::new();
    let mut prev = 0;
    for level in levels {
        let chips = live
            .iter()
            .map(|c| c.chips.min(level) - c.chips.min(prev))
            .sum::<Chips>();
        let eligible = live
            .iter()
            .filter(|c| c.chips >= level)
            .map(|c| c.seat)
            .collect::<BTreeSet<_>>();
        if chips > 0 {
            pots.push(Pot { chips, eligible });
        }
        prev = level;
    }
    match pots.first_mut() {
        Some(first) => first.chips += dead,
        None if dead > 0 => pots.push(Pot {
            chips: dead,
            eligible: live.iter().map(|c| c.seat).collect(),
        }),
        None => {}
    }
    pots
}

/// Splits every pot among the showdown winners.
///
/// Winners are decided globally: the strongest hands take each pot they are
/// eligible for, splitting evenly with any odd chip going to the first
/// winner clockwise from the button. A pot whose eligible seats all lost
/// outright falls through to the best remaining hands, repeating until
/// every pot is claimed.
///
/// `order` is the contending positions clockwise starting at the button.
pub fn distribute(
    pots: &[Pot],
    strengths: &BTreeMap<Position, Strength>,
    order: &[Position],
) -> BTreeMap<Position, Chips> {
    let mut rewards = BTreeMap::<Position, Chips>::new();
    let mut remaining = strengths.clone();
    let mut open = pots.to_vec();
    while !open.is_empty() && !remaining.is_empty() {
        let best = match remaining.values().max() {
            Some(s) => *s,
            None => break,
        };
        let winners = remaining
            .iter()
            .filter(|(_, s)| **s == best)
            .map(|(p, _)| *p)
            .collect::<BTreeSet<_>>();
        let mut unclaimed = Vec::new();
        for pot in open {
            let takers = order
                .iter()
                .copied()
                .filter(|p| winners.contains(p) && pot.eligible.contains(p))
                .collect::<Vec<_>>();
            if takers.is_empty() {
                unclaimed.push(pot);
                continue;
            }
            let share = pot.chips / takers.len() as Chips;
            let odd = pot.chips % takers.len() as Chips;
            for (i, taker) in takers.iter().enumerate() {
                *rewards.entry(*taker).or_default() += share + if i == 0 { odd } else { 0 };
            }
        }
        open = unclaimed;
        for winner in winners {
            remaining.remove(&winner);
        }
    }
    debug_assert!(open.is_empty(), "pot with no eligible showdown hand");
    rewards
}

impl std::fmt::Display for Pot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} chips among {:?}", self.chips, self.eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_cards::cards;
    use felt_cards::evaluate;

    fn contribution(seat: Position, chips: Chips, shoved: bool) -> Contribution {
        Contribution { seat, chips, shoved }
    }

    fn strength(s: &str) -> Strength {
        evaluate(&cards(s).unwrap()).unwrap()
    }

    fn conserved(pots: &[Pot], live: &[Contribution], dead: Chips) -> bool {
        pots.iter().map(|p| p.chips).sum::<Chips>()
            == live.iter().map(|c| c.chips).sum::<Chips>() + dead
    }

    #[test]
    fn single_pot_when_nobody_is_all_in() {
        let live = [contribution(0, 100, false), contribution(1, 100, false)];
        let pots = build(&live, 0);
        assert!(pots.len() == 1);
        assert!(pots[0].chips == 200);
        assert!(pots[0].eligible == BTreeSet::from([0, 1]));
    }

    #[test]
    fn short_all_in_caps_the_main_pot() {
        // seat 1 all-in for 40, seats 0 and 2 continue to 100
        let live = [
            contribution(0, 100, false),
            contribution(1, 40, true),
            contribution(2, 100, false),
        ];
        let pots = build(&live, 0);
        assert!(pots.len() == 2);
        assert!(pots[0].chips == 120 && pots[0].eligible == BTreeSet::from([0, 1, 2]));
        assert!(pots[1].chips == 120 && pots[1].eligible == BTreeSet::from([0, 2]));
        assert!(conserved(&pots, &live, 0));
    }

    #[test]
    fn stacked_all_ins_layer_in_order() {
        let live = [
            contribution(0, 20, true),
            contribution(1, 50, true),
            contribution(2, 90, false),
        ];
        let pots = build(&live, 0);
        assert!(pots.len() == 3);
        assert!(pots[0].chips == 60 && pots[0].eligible.len() == 3);
        assert!(pots[1].chips == 60 && pots[1].eligible == BTreeSet::from([1, 2]));
        assert!(pots[2].chips == 40 && pots[2].eligible == BTreeSet::from([2]));
        assert!(conserved(&pots, &live, 0));
    }

    #[test]
    fn dead_money_joins_the_first_pot() {
        let live = [contribution(0, 40, true), contribution(1, 40, false)];
        let pots = build(&live, 15);
        assert!(pots.len() == 1);
        assert!(pots[0].chips == 95);
        assert!(conserved(&pots, &live, 15));
    }

    #[test]
    fn equal_all_ins_collapse_into_one_layer() {
        let live = [contribution(0, 60, true), contribution(1, 60, true)];
        let pots = build(&live, 0);
        assert!(pots.len() == 1 && pots[0].chips == 120);
    }

    #[test]
    fn winner_takes_a_simple_pot() {
        let pots = build(&[contribution(0, 50, false), contribution(1, 50, false)], 0);
        let strengths = BTreeMap::from([
            (0, strength("Ac Ad Ah Ks Kd")),
            (1, strength("2c 3d 9h Js Kd")),
        ]);
        let rewards = distribute(&pots, &strengths, &[0, 1]);
        assert!(rewards == BTreeMap::from([(0, 100)]));
    }

    #[test]
    fn odd_chip_goes_clockwise_from_the_button() {
        let pots = vec![Pot {
            chips: 100,
            eligible: BTreeSet::from([0, 1, 2]),
        }];
        let tie = strength("Ac Kd 9h 6s 3d");
        let strengths = BTreeMap::from([(0, tie), (1, tie), (2, tie)]);
        // button on 1: order 1, 2, 0
        let rewards = distribute(&pots, &strengths, &[1, 2, 0]);
        assert!(rewards == BTreeMap::from([(1, 34), (2, 33), (0, 33)]));
    }

    #[test]
    fn side_pot_falls_through_past_the_all_in_winner() {
        // seat 1 (short all-in) has the best hand: takes the main pot only;
        // the side pot goes to the better of the remaining two
        let live = [
            contribution(0, 100, false),
            contribution(1, 40, true),
            contribution(2, 100, false),
        ];
        let pots = build(&live, 0);
        let strengths = BTreeMap::from([
            (0, strength("8c 8d Kh 7s 2d")),
            (1, strength("Ac Ad Ah Ks Kd")),
            (2, strength("Ac Jd 9h 6s 3d")),
        ]);
        let rewards = distribute(&pots, &strengths, &[0, 1, 2]);
        assert!(rewards == BTreeMap::from([(1, 120), (0, 120)]));
    }

    #[test]
    fn distribution_conserves_every_chip() {
        let live = [
            contribution(0, 75, true),
            contribution(1, 200, false),
            contribution(2, 130, true),
            contribution(3, 200, false),
        ];
        let dead = 35;
        let pots = build(&live, dead);
        assert!(conserved(&pots, &live, dead));
        let strengths = BTreeMap::from([
            (0, strength("Ac Ad Ah Ks Kd")),
            (1, strength("Kc Kd Ah Qs 2d")),
            (2, strength("Qc Qd Ah Js 2d")),
            (3, strength("Jc Jd Ah Qs 2d")),
        ]);
        let rewards = distribute(&pots, &strengths, &[2, 3, 0, 1]);
        let total = live.iter().map(|c| c.chips).sum::<Chips>() + dead;
        assert!(rewards.values().sum::<Chips>() == total);
        // the overall winner was the shortest stack: it takes only the
        // first layer, everything above falls to the next best hands
        assert!(rewards[&0] == 75 * 4 + dead);
    }
}
