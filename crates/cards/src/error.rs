/// Failures in card parsing, dealing, and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("cannot evaluate {0} cards: want 5, 6, or 7")]
    InvalidLength(usize),
    #[error("deck exhausted: {wanted} wanted, {left} left")]
    OutOfCards { wanted: usize, left: usize },
    #[error("invalid card str: {0}")]
    ParseCard(String),
}
