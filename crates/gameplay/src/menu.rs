use super::Action;
use super::Chips;
use super::Position;
use serde::Serialize;

/// The exact legal actions for the seat holding the turn.
///
/// `Bet` and `Raise` entries carry the MINIMUM legal total; any amount from
/// there up to (but excluding) what would empty the stack is accepted, since
/// the table-emptying amount is spelled `Shove`. Every other entry must be
/// echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    seat: Position,
    stack: Chips,
    round_bet: Chips,
    table_bet: Chips,
    actions: Vec<Action>,
}

impl Menu {
    /// Enumerates the legal actions from the seat's spot:
    /// - fold is always allowed;
    /// - check when nothing is owed, call when the debt is covered;
    /// - bet (unopened) or raise (opened) when a full-sized one is possible
    ///   without going all-in;
    /// - shove whenever chips remain.
    pub fn compute(
        seat: Position,
        stack: Chips,
        round_bet: Chips,
        table_bet: Chips,
        min_raise: Chips,
    ) -> Self {
        let owed = table_bet.saturating_sub(round_bet);
        let mut actions = vec![Action::Fold];
        if owed == 0 {
            actions.push(Action::Check);
        } else if owed < stack {
            actions.push(Action::Call(owed));
        }
        if table_bet == 0 {
            if min_raise < stack {
                actions.push(Action::Bet(min_raise));
            }
        } else {
            let target = table_bet + min_raise;
            if target.saturating_sub(round_bet) < stack {
                actions.push(Action::Raise(target));
            }
        }
        if stack > 0 {
            actions.push(Action::Shove(stack));
        }
        Self {
            seat,
            stack,
            round_bet,
            table_bet,
            actions,
        }
    }

    pub fn seat(&self) -> Position {
        self.seat
    }
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// True if `action` is inside the menu, including open-ended bet and
    /// raise sizes up to all-in-exclusive.
    pub fn allows(&self, action: &Action) -> bool {
        match *action {
            Action::Fold | Action::Check | Action::Call(_) | Action::Shove(_) => {
                self.actions.contains(action)
            }
            Action::Bet(n) => self
                .actions
                .iter()
                .any(|a| matches!(*a, Action::Bet(min) if n >= min))
                && n.saturating_sub(self.round_bet) < self.stack,
            Action::Raise(n) => self
                .actions
                .iter()
                .any(|a| matches!(*a, Action::Raise(min) if n >= min))
                && n.saturating_sub(self.round_bet) < self.stack,
        }
    }

    /// The timeout policy: check when free, fold when chips are owed.
    pub fn fallback(&self) -> Action {
        if self.actions.contains(&Action::Check) {
            Action::Check
        } else {
            Action::Fold
        }
    }
}

impl std::fmt::Display for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "seat {}:", self.seat)?;
        for action in &self.actions {
            write!(f, " [{}]", action)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Blinds 10/20, small blind holds 990 behind after posting.
    #[test]
    fn small_blind_facing_the_big_blind() {
        let menu = Menu::compute(1, 990, 10, 20, 20);
        assert!(
            menu.actions()
                == [
                    Action::Fold,
                    Action::Call(10),
                    Action::Raise(40),
                    Action::Shove(990),
                ]
        );
        assert!(menu.allows(&Action::Raise(40)));
        assert!(menu.allows(&Action::Raise(500)));
        assert!(!menu.allows(&Action::Raise(39)));
        assert!(!menu.allows(&Action::Raise(1000))); // that is the shove
        assert!(!menu.allows(&Action::Check));
        assert!(!menu.allows(&Action::Call(20)));
        assert!(menu.allows(&Action::Shove(990)));
    }

    #[test]
    fn unopened_street_offers_check_and_bet() {
        let menu = Menu::compute(0, 500, 0, 0, 20);
        assert!(
            menu.actions()
                == [
                    Action::Fold,
                    Action::Check,
                    Action::Bet(20),
                    Action::Shove(500),
                ]
        );
        assert!(menu.allows(&Action::Bet(499)));
        assert!(!menu.allows(&Action::Bet(500)));
        assert!(menu.fallback() == Action::Check);
    }

    #[test]
    fn short_stack_loses_the_full_raise() {
        // owes 30 with 35 behind: calling is legal, a min-raise is not
        let menu = Menu::compute(2, 35, 10, 40, 20);
        assert!(menu.actions() == [Action::Fold, Action::Call(30), Action::Shove(35)]);
        assert!(menu.fallback() == Action::Fold);
    }

    #[test]
    fn exact_call_amount_required() {
        // owing exactly the stack means call disappears in favor of shove
        let menu = Menu::compute(3, 30, 10, 40, 20);
        assert!(menu.actions() == [Action::Fold, Action::Shove(30)]);
    }

    #[test]
    fn big_blind_option_is_a_check_or_raise() {
        // preflop BB with the bet matched: check stands, raise reopens
        let menu = Menu::compute(4, 980, 20, 20, 20);
        assert!(
            menu.actions()
                == [
                    Action::Fold,
                    Action::Check,
                    Action::Raise(40),
                    Action::Shove(980),
                ]
        );
    }
}
