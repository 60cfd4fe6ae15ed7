use super::Chips;
use serde::Deserialize;
use serde::Serialize;

/// A player decision at an open turn.
///
/// `Bet` and `Raise` carry the seat's TOTAL round bet after the action (a
/// raise to 40, not a raise by 20), matching how the amounts are announced.
/// `Call` carries the chips owed and `Shove` the seat's entire remaining
/// stack; both are echoed back exactly as the menu listed them.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    Shove(Chips),
}

impl Action {
    /// True if this is a bet, raise, or shove.
    pub fn is_aggro(&self) -> bool {
        matches!(self, Action::Bet(_) | Action::Raise(_) | Action::Shove(_))
    }
    /// True if this is a fold or check (no chips added).
    pub fn is_passive(&self) -> bool {
        matches!(self, Action::Fold | Action::Check)
    }
    /// Extracts the chip amount from betting actions.
    pub fn amount(&self) -> Option<Chips> {
        match *self {
            Action::Call(n) | Action::Bet(n) | Action::Raise(n) | Action::Shove(n) => Some(n),
            _ => None,
        }
    }
    /// Compact symbol for logs (e.g. "C10", "R40").
    pub fn symbol(&self) -> String {
        match self {
            Action::Fold => "F".to_string(),
            Action::Check => "X".to_string(),
            Action::Call(n) => format!("C{}", n),
            Action::Bet(n) => format!("B{}", n),
            Action::Raise(n) => format!("R{}", n),
            Action::Shove(n) => format!("S{}", n),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call(n) => write!(f, "call {}", n),
            Action::Bet(n) => write!(f, "bet {}", n),
            Action::Raise(n) => write!(f, "raise to {}", n),
            Action::Shove(n) => write!(f, "all-in {}", n),
        }
    }
}

/// What a seat last did this hand, including forced posts.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Waiting,
    Ante,
    SmallBlind,
    BigBlind,
    Check,
    Call,
    Bet,
    Raise,
    Fold,
    Shove,
}

impl Status {
    pub fn is_folded(&self) -> bool {
        matches!(self, Status::Fold)
    }
    pub fn is_shoved(&self) -> bool {
        matches!(self, Status::Shove)
    }
    /// Human-readable name.
    pub const fn label(&self) -> &'static str {
        match self {
            Status::Waiting => "waiting",
            Status::Ante => "ante",
            Status::SmallBlind => "small blind",
            Status::BigBlind => "big blind",
            Status::Check => "check",
            Status::Call => "call",
            Status::Bet => "bet",
            Status::Raise => "raise",
            Status::Fold => "fold",
            Status::Shove => "all-in",
        }
    }
}

impl From<Action> for Status {
    fn from(action: Action) -> Self {
        match action {
            Action::Fold => Status::Fold,
            Action::Check => Status::Check,
            Action::Call(_) => Status::Call,
            Action::Bet(_) => Status::Bet,
            Action::Raise(_) => Status::Raise,
            Action::Shove(_) => Status::Shove,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
