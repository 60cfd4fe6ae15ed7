//! Table mechanics for No-Limit Texas Hold'em.
//!
//! Everything here is synchronous and deterministic: the async table loop in
//! the gameroom crate drives these types but never reimplements their rules.
//!
//! ## State
//!
//! - [`Seat`] — One player's chips, bets, status, and hole cards
//! - [`Seats`] — The fixed ring of seats and its traversal order
//! - [`Status`] — What a seat last did (posted, checked, raised, folded, ...)
//!
//! ## Decisions
//!
//! - [`Action`] — A player decision with its chip amount
//! - [`Menu`] — The exact legal actions and amounts for the seat to act
//!
//! ## Resolution
//!
//! - [`Pot`] — A main or side pot with its eligible seats
//! - [`build`] / [`distribute`] — Side-pot construction and settlement
//! - [`Outs`] / [`outs`] — Cards that flip a decided run-out, per leader
mod action;
mod error;
mod menu;
mod outs;
mod pots;
mod seat;
mod seats;

pub use action::*;
pub use error::*;
pub use menu::*;
pub use outs::*;
pub use pots::*;
pub use seat::*;
pub use seats::*;

/// Chip amounts. Stacks and pots fit comfortably in 32 bits.
pub type Chips = u32;

/// A seat index at the table, 0-based and fixed for the session.
pub type Position = usize;
