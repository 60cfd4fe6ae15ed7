use super::Action;
use super::Chips;
use super::Position;
use felt_cards::CardError;

/// Everything that can go wrong at the table.
///
/// Configuration errors reject lobby operations, state errors reject
/// submissions that arrive at the wrong moment, and validation errors reject
/// actions outside the legal menu. Timeouts are never errors: an expired
/// decision window auto-plays instead. `Cards` failures (an exhausted deck)
/// are the one fatal case, aborting the hand.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("invalid buy-in: {0}")]
    InvalidBuyIn(Chips),
    #[error("seat {0} does not exist")]
    NoSuchSeat(Position),
    #[error("seat {0} is already taken")]
    SeatTaken(Position),
    #[error("seat {0} is not seated")]
    NotSeated(Position),
    #[error("seat {0} has no chips left")]
    InsufficientChips(Position),
    #[error("game is not accepting that right now")]
    BadLifecycle,
    #[error("seat {0} acted out of turn")]
    OutOfTurn(Position),
    #[error("no decision is pending for seat {0}")]
    NoOpenWindow(Position),
    #[error("no insurance offer is open for seat {0}")]
    NoInsuranceOffer(Position),
    #[error("no extension credits left for seat {0}")]
    NoExtensionsLeft(Position),
    #[error("illegal action for seat {seat}: {action}")]
    IllegalAction { seat: Position, action: Action },
    #[error("illegal insurance purchase for seat {0}")]
    IllegalInsurance(Position),
    #[error("seat {0} has no cards to evaluate")]
    NoCards(Position),
    #[error(transparent)]
    Cards(#[from] CardError),
}
