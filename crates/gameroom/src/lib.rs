//! Asynchronous table orchestration for No-Limit Texas Hold'em.
//!
//! One tokio task per table owns every piece of game state; players and
//! observers talk to it through a cloneable [`Handle`]. Lobby operations
//! travel over a command channel, in-hand decisions go through shared
//! single-slot windows, and everything the table does comes back out as a
//! stream of [`Event`]s.
//!
//! ## Surfaces
//!
//! - [`Handle`] — Spawn a table, sit, act, extend, insure, watch
//! - [`TableConfig`] — Stakes, timeouts, auto-play thresholds, insurance odds
//! - [`Event`] — Everything broadcast to players and observers
//! - [`Audit`] — Write-only hooks for the permanent record
//!
//! ## Internals
//!
//! - [`Table`] — The owning task: hand flow, betting rounds, settlement
//! - [`Window`] — A single-slot decision window raced by submissions
//! - [`Timer`] — Decision deadlines and extension credits
//! - [`Audience`] — Spectator registry behind the broadcast fan-out
mod audience;
mod audit;
mod config;
mod event;
mod handle;
mod insurance;
mod table;
mod timer;
mod window;

pub use audience::*;
pub use audit::*;
pub use config::*;
pub use event::*;
pub use handle::*;
pub(crate) use insurance::*;
pub use table::*;
pub use timer::*;
pub use window::*;
