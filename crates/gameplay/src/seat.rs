use super::Chips;
use super::GameError;
use super::Position;
use super::Status;
use felt_cards::evaluate;
use felt_cards::Card;
use felt_cards::Strength;
use std::collections::BTreeMap;

/// One player's complete state at the table.
///
/// Bets are split two ways: `round_bet` is what the seat has put in on the
/// current street (compared against the table bet to decide whether it still
/// owes chips) and `hand_bet` accumulates across streets (the basis for side
/// pot construction). Antes count toward neither; they are dead money.
///
/// The showdown strength is memoized per hand: the board is fixed once the
/// run-out completes, so the first evaluation is authoritative.
#[derive(Debug, Clone)]
pub struct Seat {
    position: Position,
    stack: Chips,
    hand_bet: Chips,
    round_bet: Chips,
    ante: Chips,
    status: Status,
    acted: bool,
    hole: Option<[Card; 2]>,
    strength: Option<Strength>,
    pending_post: bool,
    leaving: bool,
    auto_play: bool,
    auto_hands: u32,
    auto_folds: u8,
    auto_checks: u8,
    extensions: u8,
    insurance: BTreeMap<Card, Chips>,
}

impl Seat {
    pub fn new(position: Position, stack: Chips) -> Self {
        Self {
            position,
            stack,
            hand_bet: 0,
            round_bet: 0,
            ante: 0,
            status: Status::Waiting,
            acted: false,
            hole: None,
            strength: None,
            pending_post: false,
            leaving: false,
            auto_play: false,
            auto_hands: 0,
            auto_folds: 0,
            auto_checks: 0,
            extensions: 0,
            insurance: BTreeMap::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn hand_bet(&self) -> Chips {
        self.hand_bet
    }
    pub fn round_bet(&self) -> Chips {
        self.round_bet
    }
    /// Dead money paid as ante this hand.
    pub fn ante(&self) -> Chips {
        self.ante
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn hole(&self) -> Option<[Card; 2]> {
        self.hole
    }
    pub fn acted(&self) -> bool {
        self.acted
    }

    /// Was dealt in and has not folded.
    pub fn contesting(&self) -> bool {
        self.hole.is_some() && !self.status.is_folded()
    }
    /// Contesting and not all-in: can still act this hand.
    pub fn live(&self) -> bool {
        self.contesting() && !self.status.is_shoved()
    }

    pub fn deal(&mut self, hole: [Card; 2]) {
        self.hole = Some(hole);
        self.strength = None;
    }

    /// The best five-card hand from the seat's hole cards and the board,
    /// evaluated once per hand.
    pub fn strength(&mut self, board: &[Card]) -> Result<Strength, GameError> {
        if let Some(s) = self.strength {
            return Ok(s);
        }
        let hole = self.hole.ok_or(GameError::NoCards(self.position))?;
        let mut cards = board.to_vec();
        cards.extend(hole);
        let s = evaluate(&cards)?;
        self.strength = Some(s);
        Ok(s)
    }

    /// Moves up to `chips` from the stack into this street's bet, clamping
    /// at the stack. An emptied stack is an all-in. Returns what moved.
    pub fn wager(&mut self, chips: Chips) -> Chips {
        let moved = chips.min(self.stack);
        self.stack -= moved;
        self.round_bet += moved;
        self.hand_bet += moved;
        if self.stack == 0 {
            self.status = Status::Shove;
        }
        moved
    }

    /// Pays an ante: chips leave the stack as dead money, outside both bet
    /// counters. Returns what moved.
    pub fn pay_ante(&mut self, chips: Chips) -> Chips {
        let moved = chips.min(self.stack);
        self.stack -= moved;
        self.ante += moved;
        if self.stack == 0 {
            self.status = Status::Shove;
        } else {
            self.status = Status::Ante;
        }
        moved
    }

    pub fn win(&mut self, chips: Chips) {
        self.stack += chips;
    }

    /// Deducts an insurance premium straight from the stack, clamping at
    /// what is there (an all-in seat keeps its zero). Neither bet counter
    /// moves and the status is untouched. Returns what moved.
    pub fn charge(&mut self, chips: Chips) -> Chips {
        let moved = chips.min(self.stack);
        self.stack -= moved;
        moved
    }

    /// Overrides the status unless the seat is already all-in: a blind or
    /// call that empties the stack stays a shove.
    pub fn set_status(&mut self, status: Status) {
        if !self.status.is_shoved() {
            self.status = status;
        }
    }
    pub fn mark_acted(&mut self) {
        self.acted = true;
    }

    /// Opens a new street: round bets reset, everyone is owed a fresh turn.
    pub fn start_round(&mut self) {
        self.round_bet = 0;
        self.acted = false;
    }

    /// Clears all per-hand state, restoring the configured extension
    /// credits. The stack and auto-play counters survive.
    pub fn reset_for_hand(&mut self, extensions: u8) {
        self.hand_bet = 0;
        self.round_bet = 0;
        self.ante = 0;
        self.status = Status::Waiting;
        self.acted = false;
        self.hole = None;
        self.strength = None;
        self.extensions = extensions;
        self.insurance.clear();
    }

    /// Consumes one extension credit if any remain.
    pub fn use_extension(&mut self) -> bool {
        if self.extensions > 0 {
            self.extensions -= 1;
            true
        } else {
            false
        }
    }
    pub fn extensions(&self) -> u8 {
        self.extensions
    }

    /// Records an auto-played decision after a timeout. Crossing either
    /// configured threshold flips the seat into auto-play.
    pub fn note_timeout(&mut self, checked: bool, max_checks: u8, max_folds: u8) -> bool {
        if checked {
            self.auto_checks = self.auto_checks.saturating_add(1);
        } else {
            self.auto_folds = self.auto_folds.saturating_add(1);
        }
        if !self.auto_play && (self.auto_checks >= max_checks || self.auto_folds >= max_folds) {
            self.auto_play = true;
            log::debug!("[seat] P{} enters auto-play", self.position);
        }
        self.auto_play
    }
    /// An explicit action clears every timeout counter and leaves auto-play.
    pub fn note_manual(&mut self) {
        if self.auto_play {
            log::debug!("[seat] P{} leaves auto-play", self.position);
        }
        self.auto_checks = 0;
        self.auto_folds = 0;
        self.auto_hands = 0;
        self.auto_play = false;
    }
    pub fn auto_play(&self) -> bool {
        self.auto_play
    }
    /// Counts a completed hand spent in auto-play.
    pub fn tick_auto(&mut self) -> u32 {
        self.auto_hands += 1;
        self.auto_hands
    }

    pub fn request_leave(&mut self) {
        self.leaving = true;
    }
    pub fn leaving(&self) -> bool {
        self.leaving
    }

    pub fn set_pending_post(&mut self, pending: bool) {
        self.pending_post = pending;
    }
    pub fn pending_post(&self) -> bool {
        self.pending_post
    }

    pub fn set_insurance(&mut self, stakes: BTreeMap<Card, Chips>) {
        self.insurance = stakes;
    }
    pub fn insurance(&self) -> &BTreeMap<Card, Chips> {
        &self.insurance
    }
    pub fn take_insurance(&mut self) -> BTreeMap<Card, Chips> {
        std::mem::take(&mut self.insurance)
    }
    pub fn insurance_cost(&self) -> Chips {
        self.insurance.values().sum()
    }
}
