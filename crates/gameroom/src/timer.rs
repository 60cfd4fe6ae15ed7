use std::time::Duration;
use tokio::time::Instant;

/// Configuration for decision deadlines.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub decision: Duration,
    pub extension: Duration,
    pub insurance: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            decision: Duration::from_secs(15),
            extension: Duration::from_secs(30),
            insurance: Duration::from_secs(20),
        }
    }
}

/// Deadline tracking for the open decision window.
///
/// An extension does not stack: it restarts the single running deadline at
/// the extension length, so back-to-back credits still burn one at a time.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }
    pub fn start_decision(&mut self) {
        self.deadline = Some(Instant::now() + self.config.decision);
    }
    pub fn start_insurance(&mut self) {
        self.deadline = Some(Instant::now() + self.config.insurance);
    }
    /// Restarts the running deadline at the extension length.
    pub fn extend(&mut self) {
        self.deadline = Some(Instant::now() + self.config.extension);
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::new(TimerConfig::default());
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }

    #[test]
    fn decision_sets_a_deadline() {
        let mut timer = Timer::new(TimerConfig::default());
        timer.start_decision();
        assert!(timer.deadline().is_some());
        assert!(!timer.expired());
        timer.clear();
        assert!(timer.deadline().is_none());
    }

    #[test]
    fn extension_restarts_rather_than_stacks() {
        let config = TimerConfig {
            decision: Duration::from_secs(1),
            extension: Duration::from_secs(30),
            insurance: Duration::from_secs(1),
        };
        let mut timer = Timer::new(config);
        timer.start_decision();
        let before = timer.deadline().unwrap();
        timer.extend();
        let after = timer.deadline().unwrap();
        assert!(after > before);
        assert!(timer.remaining().unwrap() <= Duration::from_secs(30));
        timer.extend();
        assert!(timer.remaining().unwrap() <= Duration::from_secs(30));
    }
}
