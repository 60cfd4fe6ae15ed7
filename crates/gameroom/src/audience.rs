use super::Event;
use felt_gameplay::Position;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;

/// Spectator registry, shared between the table task and its handle.
///
/// Joins and leaves race live broadcasts, so the list sits behind one
/// coarse mutex; every send is a non-blocking push onto an unbounded
/// channel, so the critical section stays short. A receiver that went away
/// is pruned on the next broadcast.
pub struct Audience {
    counter: AtomicU64,
    observers: Mutex<Vec<(u64, UnboundedSender<Event>)>>,
}

impl Audience {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn join(&self) -> (u64, UnboundedReceiver<Event>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, tx));
        (id, rx)
    }

    pub fn leave(&self, id: u64) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(i, _)| *i != id);
    }

    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn broadcast(&self, event: &Event) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(id, tx)| match tx.send(event.clone()) {
                Ok(()) => true,
                Err(_) => {
                    log::debug!("[audience] observer {} gone", id);
                    false
                }
            });
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self::new()
    }
}

/// The table's outbound side: per-seat channels plus the audience.
pub(crate) struct Outbox {
    senders: Vec<Option<UnboundedSender<Event>>>,
    audience: std::sync::Arc<Audience>,
    delay: Duration,
}

impl Outbox {
    pub fn new(seats: usize, audience: std::sync::Arc<Audience>, delay: Duration) -> Self {
        Self {
            senders: vec![None; seats],
            audience,
            delay,
        }
    }

    pub fn connect(&mut self, seat: Position) -> UnboundedReceiver<Event> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        if let Some(slot) = self.senders.get_mut(seat) {
            *slot = Some(tx);
        }
        rx
    }
    pub fn disconnect(&mut self, seat: Position) {
        if let Some(slot) = self.senders.get_mut(seat) {
            *slot = None;
        }
    }

    /// Sends an event to one seat only.
    pub fn unicast(&self, seat: Position, event: Event) {
        log::debug!("[table] unicast to P{}: {}", seat, event);
        match self.senders.get(seat).and_then(Option::as_ref) {
            Some(tx) => {
                if let Err(e) = tx.send(event) {
                    log::warn!("[table] unicast to P{} failed: {}", seat, e);
                }
            }
            None => log::warn!("[table] unicast to P{}: no such player", seat),
        }
    }

    /// Sends an event to every seat and every observer.
    pub fn broadcast(&self, event: Event) {
        log::debug!("[table] broadcast: {}", event);
        for (seat, sender) in self.senders.iter().enumerate() {
            if let Some(tx) = sender {
                if let Err(e) = tx.send(event.clone()) {
                    log::warn!("[table] broadcast to P{} failed: {}", seat, e);
                }
            }
        }
        self.audience.broadcast(&event);
    }

    /// Broadcasts, then pauses so observers can render the beat before the
    /// next event lands.
    pub async fn paced(&self, event: Event) {
        self.broadcast(event);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn observers_receive_broadcasts_until_they_leave() {
        let audience = Audience::new();
        let (id, mut rx) = audience.join();
        audience.broadcast(&Event::GameStart);
        assert!(matches!(rx.recv().await, Some(Event::GameStart)));
        audience.leave(id);
        assert!(audience.is_empty());
    }

    #[tokio::test]
    async fn dropped_observers_are_pruned() {
        let audience = Audience::new();
        let (_, rx) = audience.join();
        drop(rx);
        audience.broadcast(&Event::GameStart);
        assert!(audience.is_empty());
    }

    #[tokio::test]
    async fn outbox_routes_unicast_and_broadcast() {
        let audience = std::sync::Arc::new(Audience::new());
        let mut outbox = Outbox::new(2, audience.clone(), Duration::ZERO);
        let mut rx0 = outbox.connect(0);
        let mut rx1 = outbox.connect(1);
        let (_, mut watcher) = audience.join();
        outbox.unicast(
            0,
            Event::HoleCards {
                hand: 1,
                hole: [felt_cards::Card::from(0u8), felt_cards::Card::from(1u8)],
            },
        );
        outbox.broadcast(Event::GameStart);
        assert!(matches!(rx0.recv().await, Some(Event::HoleCards { .. })));
        assert!(matches!(rx0.recv().await, Some(Event::GameStart)));
        assert!(matches!(rx1.recv().await, Some(Event::GameStart)));
        assert!(matches!(watcher.recv().await, Some(Event::GameStart)));
    }
}
