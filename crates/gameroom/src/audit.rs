use super::SeatResult;
use felt_cards::Street;
use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameplay::Position;

/// Write-only sink for the permanent record of a session.
///
/// The table calls these hooks from its own task, in order, exactly once
/// per occurrence. Implementations that persist should hand off quickly;
/// the table does not await them. Every method defaults to a no-op so a
/// collaborator implements only what it stores.
pub trait Audit: Send {
    fn game_start(&mut self) {}
    fn hand_start(&mut self, _hand: u64, _button: Position) {}
    fn ante(&mut self, _hand: u64, _seat: Position, _chips: Chips) {}
    fn action(&mut self, _hand: u64, _street: Street, _seat: Position, _action: Action, _pot: Chips) {
    }
    fn insurance(&mut self, _hand: u64, _street: Street, _seat: Position, _cost: Chips, _payout: Chips) {
    }
    fn hand_end(&mut self, _hand: u64, _results: &[SeatResult]) {}
    fn game_end(&mut self) {}
}

/// Discards everything.
pub struct NopAudit;

impl Audit for NopAudit {}
