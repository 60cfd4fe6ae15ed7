use felt_gameplay::Chips;
use std::collections::BTreeMap;
use std::time::Duration;

/// Construction-time table options. Fixed for the session except the blind
/// and ante, which can be raised between hands.
///
/// An empty `insurance_odds` table disables insurance entirely. When it is
/// populated, keys are out counts and values the payout multiplier; a leader
/// whose count has no entry is told insurance is unavailable for that spot.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Ring size; positions are 0..seats for the whole session.
    pub seats: usize,
    /// Small blind; the big blind is always twice this.
    pub small_blind: Chips,
    /// Dead-money ante collected from every dealt seat, 0 to disable.
    pub ante: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    /// Base decision window per turn.
    pub decision_timeout: Duration,
    /// Length a granted extension restarts the window to.
    pub extension: Duration,
    /// Extension credits per seat per hand.
    pub extensions: u8,
    /// Payout multiplier by out count; empty disables insurance.
    pub insurance_odds: BTreeMap<usize, f64>,
    pub insurance_timeout: Duration,
    /// Require a big-blind post from seats that joined mid-session.
    pub pay_to_play: bool,
    /// Begin the game as soon as `min_players` are seated.
    pub auto_start: bool,
    pub min_players: usize,
    /// Consecutive timed-out checks before a seat is auto-played.
    pub max_auto_checks: u8,
    /// Consecutive timed-out folds before a seat is auto-played.
    pub max_auto_folds: u8,
    /// Hands spent in auto-play before a forced stand-up.
    pub auto_play_hands: u32,
    /// Pause after action broadcasts so observers can render the beat.
    pub broadcast_delay: Duration,
    /// How long to hold the table open short of `min_players`.
    pub wait_for_players: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 9,
            small_blind: 10,
            ante: 0,
            min_buy_in: 400,
            max_buy_in: 2000,
            decision_timeout: Duration::from_secs(15),
            extension: Duration::from_secs(30),
            extensions: 2,
            insurance_odds: BTreeMap::new(),
            insurance_timeout: Duration::from_secs(20),
            pay_to_play: false,
            auto_start: false,
            min_players: 2,
            max_auto_checks: 3,
            max_auto_folds: 2,
            auto_play_hands: 5,
            broadcast_delay: Duration::from_millis(200),
            wait_for_players: Duration::from_secs(60),
        }
    }
}

impl TableConfig {
    pub fn big_blind(&self) -> Chips {
        self.small_blind * 2
    }
    pub fn insurance_enabled(&self) -> bool {
        !self.insurance_odds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_playable() {
        let config = TableConfig::default();
        assert!(config.min_players >= 2);
        assert!(config.min_buy_in <= config.max_buy_in);
        assert!(config.big_blind() == 2 * config.small_blind);
        assert!(!config.insurance_enabled());
    }
}
