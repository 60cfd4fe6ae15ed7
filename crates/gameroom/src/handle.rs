use super::Audience;
use super::Audit;
use super::BetMsg;
use super::Event;
use super::InsuranceMsg;
use super::Table;
use super::TableConfig;
use super::Windows;
use felt_cards::Card;
use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameplay::GameError;
use felt_gameplay::Position;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

/// Lobby operations travel over the command channel and are answered by
/// the table task when it next reaches a safe point.
pub(crate) enum Command {
    Sit {
        seat: Position,
        buy_in: Chips,
        reply: oneshot::Sender<Result<mpsc::UnboundedReceiver<Event>, GameError>>,
    },
    StandUp {
        seat: Position,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    SetBlind(Chips),
    SetAnte(Chips),
    Start {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Cancel {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Drain,
}

/// The inbound boundary of a running table.
///
/// Decisions (`act`, `extend`, `insure`) go straight into the shared
/// windows and report state errors synchronously; everything that touches
/// seat ownership goes through the table task and is awaited.
///
/// Clones freely; the table stops when the last handle is dropped and the
/// current hand finishes.
#[derive(Clone)]
pub struct Handle {
    commands: mpsc::UnboundedSender<Command>,
    windows: Arc<Windows>,
    audience: Arc<Audience>,
}

impl Handle {
    /// Spawns the table task onto the current runtime.
    pub fn spawn(config: TableConfig, audit: Box<dyn Audit + Send>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let windows = Arc::new(Windows::new(config.seats));
        let audience = Arc::new(Audience::new());
        let table = Table::new(config, audit, rx, windows.clone(), audience.clone());
        tokio::spawn(table.run());
        Self {
            commands: tx,
            windows,
            audience,
        }
    }

    /// Takes a seat with a buy-in, returning the seat's private event feed.
    pub async fn sit(
        &self,
        seat: Position,
        buy_in: Chips,
    ) -> Result<mpsc::UnboundedReceiver<Event>, GameError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Sit {
                seat,
                buy_in,
                reply,
            })
            .map_err(|_| GameError::BadLifecycle)?;
        rx.await.map_err(|_| GameError::BadLifecycle)?
    }

    /// Leaves the table: immediately between hands, at the hand boundary
    /// (or on fold) while contesting one.
    pub async fn stand_up(&self, seat: Position) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::StandUp { seat, reply })
            .map_err(|_| GameError::BadLifecycle)?;
        rx.await.map_err(|_| GameError::BadLifecycle)?
    }

    /// Begins dealing hands. Errors if the game already started.
    pub async fn start(&self) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Start { reply })
            .map_err(|_| GameError::BadLifecycle)?;
        rx.await.map_err(|_| GameError::BadLifecycle)?
    }

    /// Tears the table down before the first hand. Errors once started;
    /// use [`Self::drain`] instead.
    pub async fn cancel(&self) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Cancel { reply })
            .map_err(|_| GameError::BadLifecycle)?;
        rx.await.map_err(|_| GameError::BadLifecycle)?
    }

    /// Finishes the current hand, then ends the game.
    pub fn drain(&self) {
        let _ = self.commands.send(Command::Drain);
    }

    /// Raises the small blind from the next hand.
    pub fn set_blind(&self, chips: Chips) {
        let _ = self.commands.send(Command::SetBlind(chips));
    }
    /// Changes the ante from the next hand.
    pub fn set_ante(&self, chips: Chips) {
        let _ = self.commands.send(Command::SetAnte(chips));
    }

    /// Submits a decision for the seat holding the turn.
    pub fn act(&self, seat: Position, action: Action) -> Result<(), GameError> {
        self.windows.submit_bet(seat, BetMsg::Act(action))
    }

    /// Spends an extension credit on the open decision window.
    pub fn extend(&self, seat: Position) -> Result<(), GameError> {
        self.windows.submit_bet(seat, BetMsg::Extend)
    }

    /// Answers an insurance offer. An empty stakes map declines.
    pub fn insure(
        &self,
        seat: Position,
        stakes: BTreeMap<Card, Chips>,
    ) -> Result<(), GameError> {
        self.windows.submit_insurance(seat, InsuranceMsg { stakes })
    }

    /// Joins the audience: a read-only feed of every public event.
    pub fn watch(&self) -> (u64, mpsc::UnboundedReceiver<Event>) {
        self.audience.join()
    }
    pub fn unwatch(&self, id: u64) {
        self.audience.leave(id);
    }
}
