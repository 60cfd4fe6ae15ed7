use felt_cards::Card;
use felt_cards::Ranking;
use felt_cards::Street;
use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameplay::Menu;
use felt_gameplay::Position;
use felt_gameplay::Pot;
use felt_gameplay::Status;
use serde::Serialize;

/// Why a seat left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandUp {
    Requested,
    Busted,
    Idle,
}

/// One seat's line on the hand-end summary.
#[derive(Debug, Clone, Serialize)]
pub struct SeatResult {
    pub seat: Position,
    /// Chips taken from the pots this hand (0 for losers).
    pub reward: Chips,
    /// Stack after settlement, insurance included.
    pub stack: Chips,
    /// Showdown category, `None` when the hand never got there.
    pub ranking: Option<Ranking>,
    /// The winning five cards, shown only at showdown.
    pub cards: Option<[Card; 5]>,
}

/// Everything the table tells its players and observers.
///
/// Per-hand events carry the hand number for sequencing. `HoleCards` is the
/// only unicast deal; everything else players see, observers see too.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    GameStart,
    GameEnd,
    PlayerSat {
        seat: Position,
        stack: Chips,
    },
    PlayerStood {
        seat: Position,
        stack: Chips,
        reason: StandUp,
    },
    HandStart {
        hand: u64,
        button: Position,
        stacks: Vec<(Position, Chips)>,
    },
    AntePosted {
        hand: u64,
        seat: Position,
        chips: Chips,
    },
    BlindPosted {
        hand: u64,
        seat: Position,
        status: Status,
        chips: Chips,
    },
    /// Private deal, unicast to the seat.
    HoleCards {
        hand: u64,
        hole: [Card; 2],
    },
    Board {
        hand: u64,
        street: Street,
        board: Vec<Card>,
    },
    /// A seat holds the turn; the menu is exact and exhaustive.
    Turn {
        hand: u64,
        menu: Menu,
        remaining_ms: u64,
    },
    TurnExtended {
        hand: u64,
        seat: Position,
        remaining_ms: u64,
    },
    Action {
        hand: u64,
        seat: Position,
        action: Action,
        pot: Chips,
    },
    /// The seat timed out past its threshold and plays itself now.
    AutoPlay {
        hand: u64,
        seat: Position,
    },
    /// Face-up hole cards once betting can no longer reopen.
    Reveal {
        hand: u64,
        seat: Position,
        hole: [Card; 2],
    },
    Pots {
        hand: u64,
        street: Street,
        pots: Vec<Pot>,
    },
    /// Unicast to a run-out leader; stakes go on any subset of `outs`.
    InsuranceOffer {
        hand: u64,
        street: Street,
        seat: Position,
        outs: Vec<Card>,
        odds: f64,
        remaining_ms: u64,
    },
    /// The leader's out count has no odds entry; no offer this street.
    InsuranceUnavailable {
        hand: u64,
        seat: Position,
        outs: usize,
    },
    InsuranceBought {
        hand: u64,
        street: Street,
        seat: Position,
        cost: Chips,
    },
    InsuranceDeclined {
        hand: u64,
        street: Street,
        seat: Position,
    },
    InsuranceSettled {
        hand: u64,
        street: Street,
        seat: Position,
        cost: Chips,
        payout: Chips,
    },
    HandEnd {
        hand: u64,
        results: Vec<SeatResult>,
    },
    /// Unicast rejection of an invalid submission; the window re-arms.
    Rejected {
        seat: Position,
        reason: String,
    },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::GameStart => write!(f, "game start"),
            Event::GameEnd => write!(f, "game end"),
            Event::PlayerSat { seat, stack } => write!(f, "P{} sits with {}", seat, stack),
            Event::PlayerStood { seat, reason, .. } => {
                write!(f, "P{} stands ({:?})", seat, reason)
            }
            Event::HandStart { hand, button, .. } => {
                write!(f, "hand #{} (button P{})", hand, button)
            }
            Event::AntePosted { seat, chips, .. } => write!(f, "P{} antes {}", seat, chips),
            Event::BlindPosted {
                seat,
                status,
                chips,
                ..
            } => write!(f, "P{} posts {} {}", seat, status, chips),
            Event::HoleCards { hole, .. } => write!(f, "hole: {} {}", hole[0], hole[1]),
            Event::Board { street, board, .. } => {
                write!(f, "{}:", street)?;
                for card in board {
                    write!(f, " {}", card)?;
                }
                Ok(())
            }
            Event::Turn { menu, .. } => write!(f, "turn: {}", menu),
            Event::TurnExtended { seat, .. } => write!(f, "P{} extends", seat),
            Event::Action {
                seat, action, pot, ..
            } => write!(f, "P{}: {} (pot {})", seat, action, pot),
            Event::AutoPlay { seat, .. } => write!(f, "P{} is auto-played", seat),
            Event::Reveal { seat, hole, .. } => {
                write!(f, "P{} shows {} {}", seat, hole[0], hole[1])
            }
            Event::Pots { pots, .. } => write!(f, "{} pot(s)", pots.len()),
            Event::InsuranceOffer {
                seat, outs, odds, ..
            } => write!(f, "P{} offered insurance on {} outs at {}", seat, outs.len(), odds),
            Event::InsuranceUnavailable { seat, outs, .. } => {
                write!(f, "P{}: no insurance at {} outs", seat, outs)
            }
            Event::InsuranceBought { seat, cost, .. } => {
                write!(f, "P{} buys insurance for {}", seat, cost)
            }
            Event::InsuranceDeclined { seat, .. } => write!(f, "P{} declines insurance", seat),
            Event::InsuranceSettled {
                seat,
                cost,
                payout,
                ..
            } => write!(f, "P{} insurance settles: cost {} payout {}", seat, cost, payout),
            Event::HandEnd { hand, results } => {
                write!(f, "hand #{} over:", hand)?;
                for r in results.iter().filter(|r| r.reward > 0) {
                    write!(f, " P{} wins {}", r.seat, r.reward)?;
                }
                Ok(())
            }
            Event::Rejected { seat, reason } => write!(f, "P{} rejected: {}", seat, reason),
        }
    }
}
