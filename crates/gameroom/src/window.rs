use felt_cards::Card;
use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameplay::GameError;
use felt_gameplay::Position;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// A submission into the open betting window.
#[derive(Debug, Clone)]
pub enum BetMsg {
    Act(Action),
    Extend,
}

/// A submission into an open insurance window: stakes per out card.
/// An empty map declines the offer.
#[derive(Debug, Clone)]
pub struct InsuranceMsg {
    pub stakes: BTreeMap<Card, Chips>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Awaiting,
    Decided,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Bet,
    Insurance,
}

/// A single-slot decision window.
///
/// The table task is the only writer of the state machine: it opens the
/// window for one seat, receives at most one value per arming, and either
/// closes it or re-arms it after rejecting an invalid submission. Callers
/// submit from any thread; exactly one submission per arming wins the slot
/// (capacity-1 channel), everything else gets a state error:
///
/// - `Idle`/`Decided` — no decision is pending for anyone
/// - `Awaiting` for someone else — out of turn
struct Slot<T> {
    state: State,
    seat: Position,
    tx: Option<mpsc::Sender<T>>,
}

pub struct Window<T> {
    kind: Kind,
    slot: Mutex<Slot<T>>,
}

impl<T> Window<T> {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            slot: Mutex::new(Slot {
                state: State::Idle,
                seat: 0,
                tx: None,
            }),
        }
    }

    /// Arms the window for `seat` and hands the table the receiving end.
    pub(crate) fn open(&self, seat: Position) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel(1);
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.state = State::Awaiting;
        slot.seat = seat;
        slot.tx = Some(tx);
        rx
    }

    /// Accepts another submission on the same arming, deadline untouched.
    pub(crate) fn rearm(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.state == State::Decided {
            slot.state = State::Awaiting;
        }
    }

    pub(crate) fn close(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.state = State::Idle;
        slot.tx = None;
    }

    /// Races to fill the slot. The first valid submission flips the window
    /// to `Decided`; the table decides whether it was legal.
    pub fn submit(&self, seat: Position, value: T) -> Result<(), GameError> {
        let closed = match self.kind {
            Kind::Bet => GameError::NoOpenWindow(seat),
            Kind::Insurance => GameError::NoInsuranceOffer(seat),
        };
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.state {
            State::Idle | State::Decided => Err(closed),
            State::Awaiting if slot.seat != seat => Err(GameError::OutOfTurn(seat)),
            State::Awaiting => match slot.tx.as_ref().map(|tx| tx.try_send(value)) {
                Some(Ok(())) => {
                    slot.state = State::Decided;
                    Ok(())
                }
                _ => Err(closed),
            },
        }
    }
}

/// The decision surfaces shared between the table task and its handle: one
/// betting window (one turn at a time) and one insurance window per seat
/// (offers run concurrently).
pub struct Windows {
    bet: Window<BetMsg>,
    insurance: Vec<Window<InsuranceMsg>>,
    returning: Mutex<BTreeSet<Position>>,
}

impl Windows {
    pub(crate) fn new(seats: usize) -> Self {
        Self {
            bet: Window::new(Kind::Bet),
            insurance: (0..seats).map(|_| Window::new(Kind::Insurance)).collect(),
            returning: Mutex::new(BTreeSet::new()),
        }
    }
    pub(crate) fn bet(&self) -> &Window<BetMsg> {
        &self.bet
    }
    pub(crate) fn insurance(&self, seat: Position) -> Option<&Window<InsuranceMsg>> {
        self.insurance.get(seat)
    }

    /// Seats that knocked outside their window since the last drain. The
    /// table treats a knock as a sign of life and lifts the seat's
    /// auto-play before its next turn.
    pub(crate) fn take_returning(&self) -> Vec<Position> {
        std::mem::take(
            &mut *self.returning.lock().unwrap_or_else(|e| e.into_inner()),
        )
        .into_iter()
        .collect()
    }

    pub fn submit_bet(&self, seat: Position, msg: BetMsg) -> Result<(), GameError> {
        let result = self.bet.submit(seat, msg);
        if result.is_err() {
            self.returning
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(seat);
        }
        result
    }
    pub fn submit_insurance(&self, seat: Position, msg: InsuranceMsg) -> Result<(), GameError> {
        self.insurance
            .get(seat)
            .ok_or(GameError::NoSuchSeat(seat))?
            .submit(seat, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_window_rejects_everyone() {
        let windows = Windows::new(2);
        let err = windows.submit_bet(0, BetMsg::Act(Action::Fold));
        assert!(err == Err(GameError::NoOpenWindow(0)));
    }

    #[tokio::test]
    async fn only_the_armed_seat_may_submit() {
        let windows = Windows::new(2);
        let mut rx = windows.bet().open(1);
        assert!(windows.submit_bet(0, BetMsg::Act(Action::Fold)) == Err(GameError::OutOfTurn(0)));
        assert!(windows.submit_bet(1, BetMsg::Act(Action::Fold)).is_ok());
        assert!(matches!(rx.recv().await, Some(BetMsg::Act(Action::Fold))));
    }

    #[tokio::test]
    async fn second_submission_loses_the_race() {
        let windows = Windows::new(1);
        let mut rx = windows.bet().open(0);
        assert!(windows.submit_bet(0, BetMsg::Act(Action::Check)).is_ok());
        assert!(
            windows.submit_bet(0, BetMsg::Act(Action::Fold)) == Err(GameError::NoOpenWindow(0))
        );
        // the table drains the slot, rejects it, and re-arms the window
        assert!(matches!(rx.recv().await, Some(BetMsg::Act(Action::Check))));
        windows.bet().rearm();
        assert!(windows.submit_bet(0, BetMsg::Act(Action::Fold)).is_ok());
        assert!(matches!(rx.recv().await, Some(BetMsg::Act(Action::Fold))));
        windows.bet().close();
        assert!(
            windows.submit_bet(0, BetMsg::Act(Action::Check)) == Err(GameError::NoOpenWindow(0))
        );
    }

    #[test]
    fn rejected_submissions_register_a_return() {
        let windows = Windows::new(2);
        assert!(windows.submit_bet(1, BetMsg::Act(Action::Fold)).is_err());
        assert!(windows.take_returning() == vec![1]);
        assert!(windows.take_returning().is_empty());
    }

    #[test]
    fn accepted_submissions_do_not() {
        let windows = Windows::new(2);
        let _rx = windows.bet().open(0);
        assert!(windows.submit_bet(0, BetMsg::Act(Action::Check)).is_ok());
        assert!(windows.take_returning().is_empty());
    }

    #[test]
    fn insurance_windows_are_per_seat() {
        let windows = Windows::new(3);
        let _rx1 = windows.insurance(1).unwrap().open(1);
        let _rx2 = windows.insurance(2).unwrap().open(2);
        let empty = InsuranceMsg {
            stakes: BTreeMap::new(),
        };
        assert!(
            windows.submit_insurance(0, empty.clone()) == Err(GameError::NoInsuranceOffer(0))
        );
        assert!(windows.submit_insurance(1, empty.clone()).is_ok());
        assert!(windows.submit_insurance(2, empty).is_ok());
    }
}
