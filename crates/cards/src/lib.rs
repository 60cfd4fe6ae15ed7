//! Card primitives and hand evaluation for No-Limit Texas Hold'em.
//!
//! ## Representation
//!
//! - [`Rank`] — Face value, deuce through ace (discriminants 2..=14)
//! - [`Suit`] — Clubs, diamonds, hearts, spades (never breaks ties)
//! - [`Card`] — A rank and a suit, with str and u8 isomorphisms
//! - [`Street`] — The four betting rounds and their board sizes
//!
//! ## Dealing
//!
//! - [`Deck`] — Shuffled cursor deck; overdrawing is an error, never a panic
//!
//! ## Evaluation
//!
//! - [`Ranking`] — The hand categories, high card through royal flush
//! - [`Strength`] — Five arranged cards plus a packed integer score
//! - [`evaluate`] — Best five of 5, 6, or 7 cards by exhaustive subset search
mod card;
mod deck;
mod error;
mod evaluator;
mod rank;
mod ranking;
mod street;
mod strength;
mod suit;

pub use card::*;
pub use deck::*;
pub use error::*;
pub use evaluator::*;
pub use rank::*;
pub use ranking::*;
pub use street::*;
pub use strength::*;
pub use suit::*;
