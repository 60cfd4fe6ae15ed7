use super::Event;
use super::InsuranceMsg;
use super::Table;
use felt_cards::Card;
use felt_cards::Street;
use felt_gameplay::build;
use felt_gameplay::outs;
use felt_gameplay::Chips;
use felt_gameplay::GameError;
use felt_gameplay::Outs;
use felt_gameplay::Position;
use std::collections::BTreeMap;
use tokio::task::JoinSet;

/// A bought policy awaiting the next community card. The stakes live on
/// the seat; this records the terms. `paid` is the part of the premium the
/// stack could cover: an all-in buyer pays nothing at the table and the
/// full cost rides on the audit record instead.
#[derive(Debug, Clone)]
pub(crate) struct Policy {
    pub seat: Position,
    pub street: Street,
    pub odds: f64,
    pub paid: Chips,
}

struct Offer {
    seat: Position,
    outs: Outs,
    odds: f64,
}

impl Table {
    /// Runs one insurance phase after a run-out is locked in on `street`.
    ///
    /// Each per-pot leader with a priced out count gets a private offer and
    /// its own window; the windows run concurrently and the hand holds
    /// until every one answers or times out. Stakes are validated when the
    /// windows join: only offered outs, and a premium the stack can cover
    /// unless the buyer is all-in.
    pub(crate) async fn insurance_round(&mut self, street: Street) -> Result<(), GameError> {
        let offers = self.insurance_offers()?;
        if offers.is_empty() {
            return Ok(());
        }
        let deadline = self.config.insurance_timeout;
        let mut join = JoinSet::new();
        for offer in &offers {
            let Some(window) = self.windows.insurance(offer.seat) else {
                continue;
            };
            let mut rx = window.open(offer.seat);
            self.outbox.unicast(
                offer.seat,
                Event::InsuranceOffer {
                    hand: self.hand,
                    street,
                    seat: offer.seat,
                    outs: offer.outs.cards.clone(),
                    odds: offer.odds,
                    remaining_ms: deadline.as_millis() as u64,
                },
            );
            let seat = offer.seat;
            join.spawn(async move {
                match tokio::time::timeout(deadline, rx.recv()).await {
                    Ok(Some(msg)) => (seat, Some(msg)),
                    _ => (seat, None),
                }
            });
        }
        let mut answers = BTreeMap::new();
        while let Some(joined) = join.join_next().await {
            if let Ok((seat, msg)) = joined {
                if let Some(window) = self.windows.insurance(seat) {
                    window.close();
                }
                answers.insert(seat, msg);
            }
        }
        for offer in offers {
            match answers.remove(&offer.seat).flatten() {
                Some(msg) => self.accept_insurance(street, &offer, msg),
                None => self.outbox.broadcast(Event::InsuranceDeclined {
                    hand: self.hand,
                    street,
                    seat: offer.seat,
                }),
            }
        }
        Ok(())
    }

    /// Computes one offer per current leader: for a leader ahead in several
    /// pots, the pot with the fewest eligible seats prices the offer.
    fn insurance_offers(&mut self) -> Result<Vec<Offer>, GameError> {
        let (live, dead) = self.contributions();
        let pots = build(&live, dead);
        let holes = self
            .seats
            .iter()
            .filter(|s| s.contesting())
            .filter_map(|s| s.hole().map(|h| (s.position(), h)))
            .collect::<BTreeMap<_, _>>();
        let mut spots: BTreeMap<Position, (usize, Outs)> = BTreeMap::new();
        for pot in &pots {
            if pot.eligible.len() < 2 {
                continue;
            }
            let pot_holes = holes
                .iter()
                .filter(|(p, _)| pot.eligible.contains(p))
                .map(|(p, h)| (*p, *h))
                .collect::<BTreeMap<_, _>>();
            for result in outs(&self.board, &pot_holes)? {
                let seats = pot.eligible.len();
                match spots.get(&result.leader) {
                    Some((best, _)) if *best <= seats => {}
                    _ => {
                        spots.insert(result.leader, (seats, result));
                    }
                }
            }
        }
        let mut offers = Vec::new();
        for (seat, (_, result)) in spots {
            if result.count() == 0 {
                continue;
            }
            match self.config.insurance_odds.get(&result.count()) {
                Some(odds) => offers.push(Offer {
                    seat,
                    outs: result,
                    odds: *odds,
                }),
                None => self.outbox.unicast(
                    seat,
                    Event::InsuranceUnavailable {
                        hand: self.hand,
                        seat,
                        outs: result.count(),
                    },
                ),
            }
        }
        Ok(offers)
    }

    fn accept_insurance(&mut self, street: Street, offer: &Offer, msg: InsuranceMsg) {
        if msg.stakes.is_empty() {
            self.outbox.broadcast(Event::InsuranceDeclined {
                hand: self.hand,
                street,
                seat: offer.seat,
            });
            return;
        }
        let cost = msg.stakes.values().sum::<Chips>();
        // an all-in leader has no stack to cover the premium; the purchase
        // still stands, booked through the settlement record
        let covered = self
            .seats
            .get(offer.seat)
            .is_some_and(|s| cost > 0 && (s.stack() == 0 || cost <= s.stack()));
        let on_outs = msg.stakes.keys().all(|c| offer.outs.cards.contains(c));
        if !covered || !on_outs {
            self.outbox.unicast(
                offer.seat,
                Event::Rejected {
                    seat: offer.seat,
                    reason: GameError::IllegalInsurance(offer.seat).to_string(),
                },
            );
            return;
        }
        let mut paid = 0;
        if let Some(seat) = self.seats.get_mut(offer.seat) {
            paid = seat.charge(cost);
            seat.set_insurance(msg.stakes);
        }
        self.policies.push(Policy {
            seat: offer.seat,
            street,
            odds: offer.odds,
            paid,
        });
        self.outbox.broadcast(Event::InsuranceBought {
            hand: self.hand,
            street,
            seat: offer.seat,
            cost,
        });
    }

    /// Pays out pending policies against the card(s) just revealed. The
    /// premium is already gone; a stake on the revealed card returns
    /// stake times odds, floored to whole chips.
    pub(crate) fn settle_insurance(&mut self, revealed: Vec<Card>) {
        if self.policies.is_empty() {
            return;
        }
        for policy in std::mem::take(&mut self.policies) {
            let stakes = self
                .seats
                .get_mut(policy.seat)
                .map(|s| s.take_insurance())
                .unwrap_or_default();
            let cost = stakes.values().sum::<Chips>();
            let stake = revealed
                .iter()
                .filter_map(|c| stakes.get(c))
                .sum::<Chips>();
            let payout = (stake as f64 * policy.odds).floor() as Chips;
            if payout > 0 {
                if let Some(seat) = self.seats.get_mut(policy.seat) {
                    seat.win(payout);
                }
            }
            log::debug!(
                "[table] P{} insurance on {}: cost {} payout {}",
                policy.seat,
                policy.street,
                cost,
                payout
            );
            self.outbox.broadcast(Event::InsuranceSettled {
                hand: self.hand,
                street: policy.street,
                seat: policy.seat,
                cost,
                payout,
            });
            self.audit
                .insurance(self.hand, policy.street, policy.seat, cost, payout);
        }
    }
}
