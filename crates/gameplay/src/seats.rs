use super::Chips;
use super::GameError;
use super::Position;
use super::Seat;
use rand::Rng;

/// The fixed ring of seats and its traversal order.
///
/// Positions never shift: a seat keeps its index for the whole session and
/// turn order is always clockwise by index, wrapping at the table size.
/// Folded, all-in, and undealt seats stay in the ring and are skipped by
/// predicate, so every traversal is O(table size) worst case.
#[derive(Debug)]
pub struct Seats {
    seats: Vec<Option<Seat>>,
    button: Position,
}

impl Seats {
    pub fn new(size: usize) -> Self {
        Self {
            seats: (0..size).map(|_| None).collect(),
            button: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.seats.len()
    }
    pub fn button(&self) -> Position {
        self.button
    }

    pub fn sit(&mut self, seat: Seat) -> Result<(), GameError> {
        let position = seat.position();
        let slot = self
            .seats
            .get_mut(position)
            .ok_or(GameError::NoSuchSeat(position))?;
        match slot {
            Some(_) => Err(GameError::SeatTaken(position)),
            None => {
                *slot = Some(seat);
                Ok(())
            }
        }
    }

    pub fn vacate(&mut self, position: Position) -> Option<Seat> {
        self.seats.get_mut(position).and_then(Option::take)
    }

    pub fn get(&self, position: Position) -> Option<&Seat> {
        self.seats.get(position).and_then(Option::as_ref)
    }
    pub fn get_mut(&mut self, position: Position) -> Option<&mut Seat> {
        self.seats.get_mut(position).and_then(Option::as_mut)
    }

    /// Occupied seats in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter_map(Option::as_ref)
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Seat> {
        self.seats.iter_mut().filter_map(Option::as_mut)
    }

    pub fn occupied(&self) -> usize {
        self.iter().count()
    }

    /// Seats that can be dealt into the next hand: funded and not waiting
    /// on a required post.
    pub fn playable(&self) -> usize {
        self.iter().filter(|s| Self::can_play(s)).count()
    }
    fn can_play(seat: &Seat) -> bool {
        seat.stack() > 0 && !seat.pending_post()
    }

    /// Positions clockwise from `from`, exclusive, one full lap.
    pub fn after(&self, from: Position) -> impl Iterator<Item = Position> + '_ {
        let size = self.seats.len();
        (1..=size).map(move |i| (from + i) % size)
    }

    /// Positions clockwise from `from`, inclusive, one full lap.
    pub fn from(&self, from: Position) -> impl Iterator<Item = Position> + '_ {
        let size = self.seats.len();
        (0..size).map(move |i| (from + i) % size)
    }

    /// Moves the button: a uniform draw over playable seats on the first
    /// hand, the next playable seat clockwise afterwards.
    pub fn rotate_button<R: Rng>(&mut self, first: bool, rng: &mut R) -> Option<Position> {
        let playable = self
            .from(self.button)
            .filter(|p| self.get(*p).is_some_and(Self::can_play))
            .collect::<Vec<_>>();
        let next = match (first, playable.len()) {
            (_, 0) => return None,
            (true, n) => playable[rng.random_range(0..n)],
            (false, _) => *playable
                .iter()
                .find(|p| **p != self.button)
                .unwrap_or(&self.button),
        };
        self.button = next;
        Some(next)
    }

    /// The next playable position strictly after `from`.
    pub fn next_playable(&self, from: Position) -> Option<Position> {
        self.after(from)
            .find(|p| self.get(*p).is_some_and(Self::can_play))
    }

    /// The `n`th playable position after the button (1 = small blind).
    pub fn nth_after_button(&self, n: usize) -> Option<Position> {
        self.after(self.button)
            .filter(|p| self.get(*p).is_some_and(Self::can_play))
            .nth(n - 1)
    }

    /// Seats still contesting the pot (dealt in, not folded).
    pub fn contenders(&self) -> Vec<Position> {
        self.iter()
            .filter(|s| s.contesting())
            .map(|s| s.position())
            .collect()
    }

    /// Contenders who can still act (not all-in).
    pub fn live(&self) -> Vec<Position> {
        self.iter()
            .filter(|s| s.live())
            .map(|s| s.position())
            .collect()
    }

    /// The next seat owed a decision, scanning clockwise from `from`
    /// inclusive: live, and either unasked this street or short of the
    /// table bet. `None` means the betting round is settled.
    pub fn next_actor(&self, from: Position, table_bet: Chips) -> Option<Position> {
        self.from(from).find(|p| {
            self.get(*p)
                .is_some_and(|s| s.live() && (!s.acted() || s.round_bet() < table_bet))
        })
    }

    /// True once no live contender is owed a turn. With a single contender
    /// left (everyone else folded) there is nothing to settle either.
    pub fn round_settled(&self, table_bet: Chips) -> bool {
        self.contenders().len() <= 1 || self.next_actor(0, table_bet).is_none()
    }

    /// True when betting can never reopen: at most one contender still has
    /// chips behind, the rest are all-in.
    pub fn runout(&self) -> bool {
        self.contenders().len() >= 2 && self.live().len() <= 1
    }

    /// Contending positions clockwise starting at the button.
    pub fn showdown_order(&self) -> Vec<Position> {
        self.from(self.button)
            .filter(|p| self.get(*p).is_some_and(|s| s.contesting()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;
    use felt_cards::cards;
    use felt_cards::Card;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn hole() -> [Card; 2] {
        let v = cards("2c 3d").unwrap();
        [v[0], v[1]]
    }

    fn table(stacks: &[(Position, Chips)]) -> Seats {
        let mut seats = Seats::new(9);
        for (p, stack) in stacks {
            seats.sit(Seat::new(*p, *stack)).unwrap();
        }
        seats
    }

    #[test]
    fn sit_rejects_taken_and_missing_seats() {
        let mut seats = table(&[(2, 100)]);
        assert!(seats.sit(Seat::new(2, 100)) == Err(GameError::SeatTaken(2)));
        assert!(seats.sit(Seat::new(9, 100)) == Err(GameError::NoSuchSeat(9)));
        assert!(seats.sit(Seat::new(3, 100)).is_ok());
        assert!(seats.occupied() == 2);
    }

    #[test]
    fn traversal_wraps_and_skips_gaps() {
        let seats = table(&[(1, 100), (4, 100), (7, 100)]);
        assert!(seats.next_playable(1) == Some(4));
        assert!(seats.next_playable(7) == Some(1));
        assert!(seats.next_playable(5) == Some(7));
    }

    #[test]
    fn button_rotates_to_next_playable() {
        let mut seats = table(&[(1, 100), (4, 100), (7, 100)]);
        let mut rng = SmallRng::seed_from_u64(7);
        let first = seats.rotate_button(true, &mut rng).unwrap();
        assert!([1, 4, 7].contains(&first));
        let second = seats.rotate_button(false, &mut rng).unwrap();
        assert!(second == seats.next_playable(first).unwrap());
    }

    #[test]
    fn button_skips_busted_seats() {
        let mut seats = table(&[(1, 100), (4, 0), (7, 100)]);
        seats.button = 1;
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(seats.rotate_button(false, &mut rng) == Some(7));
    }

    #[test]
    fn blinds_follow_the_button() {
        let mut seats = table(&[(0, 100), (3, 100), (6, 100)]);
        seats.button = 0;
        assert!(seats.nth_after_button(1) == Some(3));
        assert!(seats.nth_after_button(2) == Some(6));
        assert!(seats.nth_after_button(3) == Some(0));
    }

    #[test]
    fn next_actor_honors_acted_and_owed() {
        let mut seats = table(&[(0, 100), (1, 100), (2, 100)]);
        for seat in seats.iter_mut() {
            seat.deal(hole());
        }
        // everyone owes 20, nobody has acted
        seats.get_mut(1).unwrap().wager(20);
        seats.get_mut(1).unwrap().mark_acted();
        assert!(seats.next_actor(2, 20) == Some(2));
        seats.get_mut(2).unwrap().wager(20);
        seats.get_mut(2).unwrap().mark_acted();
        seats.get_mut(0).unwrap().wager(20);
        seats.get_mut(0).unwrap().mark_acted();
        assert!(seats.next_actor(0, 20).is_none());
        assert!(seats.round_settled(20));
    }

    #[test]
    fn a_checked_around_street_needs_everyone() {
        let mut seats = table(&[(0, 100), (1, 100)]);
        for seat in seats.iter_mut() {
            seat.deal(hole());
        }
        // nobody owes chips, but neither has acted
        assert!(!seats.round_settled(0));
        seats.get_mut(0).unwrap().mark_acted();
        assert!(!seats.round_settled(0));
        seats.get_mut(1).unwrap().mark_acted();
        assert!(seats.round_settled(0));
    }

    #[test]
    fn shoves_force_a_runout_only_after_calls_settle() {
        let mut seats = table(&[(0, 100), (1, 50)]);
        for seat in seats.iter_mut() {
            seat.deal(hole());
        }
        // seat 1 shoves 50, seat 0 still owes a decision
        seats.get_mut(1).unwrap().wager(50);
        seats.get_mut(1).unwrap().mark_acted();
        assert!(!seats.round_settled(50));
        assert!(seats.runout());
        seats.get_mut(0).unwrap().wager(50);
        seats.get_mut(0).unwrap().mark_acted();
        assert!(seats.round_settled(50));
    }

    #[test]
    fn folds_thin_the_contenders() {
        let mut seats = table(&[(0, 100), (1, 100), (2, 100)]);
        for seat in seats.iter_mut() {
            seat.deal(hole());
        }
        seats.get_mut(1).unwrap().set_status(Status::Fold);
        assert!(seats.contenders() == vec![0, 2]);
        seats.get_mut(2).unwrap().set_status(Status::Fold);
        assert!(seats.round_settled(0));
    }

    #[test]
    fn showdown_order_starts_at_the_button() {
        let mut seats = table(&[(0, 100), (3, 100), (6, 100)]);
        for seat in seats.iter_mut() {
            seat.deal(hole());
        }
        seats.button = 3;
        assert!(seats.showdown_order() == vec![3, 6, 0]);
    }
}
