use super::Audience;
use super::Audit;
use super::BetMsg;
use super::Command;
use super::Event;
use super::Outbox;
use super::SeatResult;
use super::StandUp;
use super::TableConfig;
use super::Timer;
use super::TimerConfig;
use super::Windows;
use felt_cards::Card;
use felt_cards::Deck;
use felt_cards::Street;
use felt_gameplay::build;
use felt_gameplay::distribute;
use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameplay::Contribution;
use felt_gameplay::GameError;
use felt_gameplay::Menu;
use felt_gameplay::Position;
use felt_gameplay::Seat;
use felt_gameplay::Seats;
use felt_gameplay::Status;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

/// The single task that owns all table state.
///
/// Every seat mutation happens here: the handle only posts messages. The
/// task interleaves lobby commands at safe points (between hands, and while
/// a decision window is open) so a stand-up request never tears a seat out
/// from under live pot math — a contesting seat leaves at the hand
/// boundary, everyone else immediately.
pub struct Table {
    pub(crate) config: TableConfig,
    pub(crate) seats: Seats,
    pub(crate) deck: Deck,
    pub(crate) board: Vec<Card>,
    pub(crate) pot: Chips,
    pub(crate) dead: Chips,
    pub(crate) table_bet: Chips,
    pub(crate) min_raise: Chips,
    pub(crate) hand: u64,
    pub(crate) small_blind: Chips,
    pub(crate) ante: Chips,
    next_blind: Option<Chips>,
    next_ante: Option<Chips>,
    started: bool,
    draining: bool,
    inbox_closed: bool,
    pub(crate) runout: bool,
    shown: bool,
    pub(crate) windows: Arc<Windows>,
    pub(crate) outbox: Outbox,
    commands: UnboundedReceiver<Command>,
    pub(crate) audit: Box<dyn Audit + Send>,
    pub(crate) timer: Timer,
    pub(crate) policies: Vec<super::Policy>,
    rng: SmallRng,
}

enum Waited {
    Msg(Option<BetMsg>),
    Cmd(Option<Command>),
    Timeout,
}

impl Table {
    pub(crate) fn new(
        config: TableConfig,
        audit: Box<dyn Audit + Send>,
        commands: UnboundedReceiver<Command>,
        windows: Arc<Windows>,
        audience: Arc<Audience>,
    ) -> Self {
        let outbox = Outbox::new(config.seats, audience, config.broadcast_delay);
        let timer = Timer::new(TimerConfig {
            decision: config.decision_timeout,
            extension: config.extension,
            insurance: config.insurance_timeout,
        });
        Self {
            seats: Seats::new(config.seats),
            deck: Deck::new(),
            board: Vec::new(),
            pot: 0,
            dead: 0,
            table_bet: 0,
            min_raise: 0,
            hand: 0,
            small_blind: config.small_blind,
            ante: config.ante,
            next_blind: None,
            next_ante: None,
            started: false,
            draining: false,
            inbox_closed: false,
            runout: false,
            shown: false,
            windows,
            outbox,
            commands,
            audit,
            timer,
            policies: Vec::new(),
            rng: SmallRng::from_os_rng(),
            config,
        }
    }

    pub async fn run(mut self) {
        log::debug!("[table] waiting in lobby");
        loop {
            match self.commands.recv().await {
                None => return,
                Some(Command::Cancel { reply }) => {
                    let _ = reply.send(Ok(()));
                    log::info!("[table] cancelled before start");
                    self.outbox.broadcast(Event::GameEnd);
                    return;
                }
                Some(cmd) => {
                    if self.lobby(cmd) {
                        break;
                    }
                }
            }
        }
        self.started = true;
        self.outbox.broadcast(Event::GameStart);
        self.audit.game_start();
        log::debug!("[table] starting game loop");
        while !self.draining {
            self.intermission().await;
            if self.draining {
                break;
            }
            if let Err(e) = self.play_hand().await {
                log::error!("[table] hand {} aborted: {}", self.hand, e);
                self.abort_hand();
            }
        }
        log::info!("[table] game over after {} hand(s)", self.hand);
        self.audit.game_end();
        self.outbox.broadcast(Event::GameEnd);
    }

    /// Handles a pre-start command. Returns true once the game should begin.
    fn lobby(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Sit {
                seat,
                buy_in,
                reply,
            } => {
                let _ = reply.send(self.seat_player(seat, buy_in));
                self.config.auto_start && self.seats.playable() >= self.config.min_players
            }
            Command::StandUp { seat, reply } => {
                let _ = reply.send(self.unseat_player(seat, StandUp::Requested));
                false
            }
            Command::SetBlind(chips) => {
                self.small_blind = chips;
                false
            }
            Command::SetAnte(chips) => {
                self.ante = chips;
                false
            }
            Command::Start { reply } => {
                if self.seats.playable() >= self.config.min_players {
                    let _ = reply.send(Ok(()));
                    true
                } else {
                    let _ = reply.send(Err(GameError::BadLifecycle));
                    false
                }
            }
            Command::Cancel { .. } | Command::Drain => unreachable!("handled by caller"),
        }
    }

    /// Handles a command that arrives mid-hand or between hands.
    fn interlude(&mut self, cmd: Command) {
        match cmd {
            Command::Sit {
                seat,
                buy_in,
                reply,
            } => {
                let _ = reply.send(self.seat_player(seat, buy_in));
            }
            Command::StandUp { seat, reply } => {
                let result = match self.seats.get_mut(seat) {
                    None => Err(GameError::NotSeated(seat)),
                    Some(s) if s.contesting() => {
                        // detaches at the hand boundary; bets stay in the pot
                        s.request_leave();
                        Ok(())
                    }
                    Some(_) => self.unseat_player(seat, StandUp::Requested),
                };
                let _ = reply.send(result);
            }
            Command::SetBlind(chips) => self.next_blind = Some(chips),
            Command::SetAnte(chips) => self.next_ante = Some(chips),
            Command::Start { reply } => {
                let _ = reply.send(Err(GameError::BadLifecycle));
            }
            Command::Cancel { reply } => {
                let _ = reply.send(Err(GameError::BadLifecycle));
            }
            Command::Drain => self.draining = true,
        }
    }

    fn seat_player(
        &mut self,
        position: Position,
        buy_in: Chips,
    ) -> Result<UnboundedReceiver<Event>, GameError> {
        if buy_in < self.config.min_buy_in || buy_in > self.config.max_buy_in {
            return Err(GameError::InvalidBuyIn(buy_in));
        }
        let mut seat = Seat::new(position, buy_in);
        seat.set_pending_post(self.started && self.config.pay_to_play);
        self.seats.sit(seat)?;
        let rx = self.outbox.connect(position);
        self.outbox.broadcast(Event::PlayerSat {
            seat: position,
            stack: buy_in,
        });
        Ok(rx)
    }

    fn unseat_player(&mut self, position: Position, reason: StandUp) -> Result<(), GameError> {
        let seat = self
            .seats
            .vacate(position)
            .ok_or(GameError::NotSeated(position))?;
        self.outbox.broadcast(Event::PlayerStood {
            seat: position,
            stack: seat.stack(),
            reason,
        });
        self.outbox.disconnect(position);
        Ok(())
    }

    /// Hand-boundary housekeeping: departures, pending stake changes, and
    /// the wait for enough players.
    async fn intermission(&mut self) {
        let leavers = self
            .seats
            .iter()
            .filter_map(|s| {
                if s.leaving() {
                    Some((s.position(), StandUp::Requested))
                } else if s.stack() == 0 {
                    Some((s.position(), StandUp::Busted))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        for (position, reason) in leavers {
            let _ = self.unseat_player(position, reason);
        }
        let idle = self
            .seats
            .iter()
            .filter(|s| s.auto_play())
            .map(|s| s.position())
            .collect::<Vec<_>>();
        for position in idle {
            let hands = self.seats.get_mut(position).map(|s| s.tick_auto());
            if self.config.auto_play_hands > 0
                && hands.unwrap_or(0) >= self.config.auto_play_hands
            {
                let _ = self.unseat_player(position, StandUp::Idle);
            }
        }
        if let Some(blind) = self.next_blind.take() {
            self.small_blind = blind;
        }
        if let Some(ante) = self.next_ante.take() {
            self.ante = ante;
        }
        while let Ok(cmd) = self.commands.try_recv() {
            self.interlude(cmd);
        }
        // hold the table open for stragglers, then fold it up
        while self.seats.playable() < self.config.min_players && !self.draining {
            let wait = tokio::time::timeout(self.config.wait_for_players, self.commands.recv());
            match wait.await {
                Ok(Some(cmd)) => self.interlude(cmd),
                Ok(None) => self.draining = true,
                Err(_) => {
                    log::info!("[table] not enough players, draining");
                    self.draining = true;
                }
            }
        }
    }

    async fn play_hand(&mut self) -> Result<(), GameError> {
        self.hand += 1;
        self.board.clear();
        self.pot = 0;
        self.dead = 0;
        self.table_bet = 0;
        self.min_raise = self.big_blind();
        self.runout = false;
        self.shown = false;
        self.policies.clear();
        self.deck.reset_with(&mut self.rng);
        for seat in self.seats.iter_mut() {
            seat.reset_for_hand(self.config.extensions);
        }
        self.post_pending();
        let button = match self.seats.rotate_button(self.hand == 1, &mut self.rng) {
            Some(b) => b,
            None => return Ok(()),
        };
        log::debug!("[table] hand {} button P{}", self.hand, button);
        self.outbox.broadcast(Event::HandStart {
            hand: self.hand,
            button,
            stacks: self
                .seats
                .iter()
                .map(|s| (s.position(), s.stack()))
                .collect(),
        });
        self.audit.hand_start(self.hand, button);
        // fixed for the hand: a seat shoved by its ante or blind still plays
        let ring = self.posts_ring();
        self.post_antes(&ring);
        self.post_blinds(&ring);
        self.deal_holes(&ring)?;
        let first = ring[2 % ring.len()];
        self.betting_round(Street::Pref, first).await;
        if self.maybe_simple_win() {
            return Ok(());
        }
        for street in [Street::Flop, Street::Turn, Street::Rive] {
            let revealed = self.deal_board(street)?;
            self.settle_insurance(revealed);
            if !self.runout {
                self.open_street();
                let first = (self.seats.button() + 1) % self.seats.size();
                self.betting_round(street, first).await;
                if self.maybe_simple_win() {
                    return Ok(());
                }
            }
            self.broadcast_pots(street);
            if self.runout {
                self.reveal_runout();
                if street < Street::Rive && self.config.insurance_enabled() {
                    self.insurance_round(street).await?;
                }
            }
        }
        self.showdown()
    }

    pub(crate) fn big_blind(&self) -> Chips {
        self.small_blind * 2
    }

    /// Playable positions clockwise after the button, button last.
    fn posts_ring(&self) -> Vec<Position> {
        self.seats
            .after(self.seats.button())
            .filter(|p| {
                self.seats
                    .get(*p)
                    .is_some_and(|s| s.stack() > 0 && !s.pending_post())
            })
            .collect()
    }

    /// Seats that owe a post before playing put in a big blind's worth.
    fn post_pending(&mut self) {
        let bb = self.big_blind();
        let pending = self
            .seats
            .iter()
            .filter(|s| s.pending_post() && s.stack() > bb)
            .map(|s| s.position())
            .collect::<Vec<_>>();
        for position in pending {
            if let Some(seat) = self.seats.get_mut(position) {
                let chips = seat.wager(bb);
                seat.set_status(Status::BigBlind);
                seat.set_pending_post(false);
                self.pot += chips;
                self.outbox.broadcast(Event::BlindPosted {
                    hand: self.hand,
                    seat: position,
                    status: Status::BigBlind,
                    chips,
                });
            }
        }
    }

    fn post_antes(&mut self, ring: &[Position]) {
        if self.ante == 0 {
            return;
        }
        for position in ring.iter().copied() {
            if let Some(seat) = self.seats.get_mut(position) {
                let chips = seat.pay_ante(self.ante);
                self.pot += chips;
                self.dead += chips;
                self.outbox.broadcast(Event::AntePosted {
                    hand: self.hand,
                    seat: position,
                    chips,
                });
                self.audit.ante(self.hand, position, chips);
            }
        }
    }

    fn post_blinds(&mut self, ring: &[Position]) {
        let posts = [
            (ring[0], self.small_blind, Status::SmallBlind),
            (ring[1 % ring.len()], self.big_blind(), Status::BigBlind),
        ];
        for (position, target, status) in posts {
            if let Some(seat) = self.seats.get_mut(position) {
                let owed = target.saturating_sub(seat.round_bet());
                let chips = seat.wager(owed);
                seat.set_status(status);
                self.pot += chips;
                self.outbox.broadcast(Event::BlindPosted {
                    hand: self.hand,
                    seat: position,
                    status,
                    chips,
                });
            }
        }
        self.table_bet = self.big_blind();
        self.min_raise = self.big_blind();
    }

    fn deal_holes(&mut self, ring: &[Position]) -> Result<(), GameError> {
        for position in ring.iter().copied() {
            let drawn = self.deck.draw(2)?;
            let hole = [drawn[0], drawn[1]];
            if let Some(seat) = self.seats.get_mut(position) {
                seat.deal(hole);
            }
            self.outbox.unicast(
                position,
                Event::HoleCards {
                    hand: self.hand,
                    hole,
                },
            );
        }
        Ok(())
    }

    /// Burns one, turns the street's cards, and announces the full board.
    fn deal_board(&mut self, street: Street) -> Result<Vec<Card>, GameError> {
        let _burn = self.deck.draw_one()?;
        let revealed = self.deck.draw(street.n_revealed())?;
        self.board.extend(revealed.iter().copied());
        self.outbox.broadcast(Event::Board {
            hand: self.hand,
            street,
            board: self.board.clone(),
        });
        Ok(revealed)
    }

    /// Fresh street: round bets zeroed, betting unopened.
    fn open_street(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.start_round();
        }
        self.table_bet = 0;
        self.min_raise = self.big_blind();
    }

    async fn betting_round(&mut self, street: Street, first: Position) {
        let mut cursor = first;
        loop {
            if self.seats.round_settled(self.table_bet) {
                break;
            }
            let actor = match self.seats.next_actor(cursor, self.table_bet) {
                Some(p) => p,
                None => break,
            };
            let menu = match self.seats.get(actor) {
                Some(seat) => Menu::compute(
                    actor,
                    seat.stack(),
                    seat.round_bet(),
                    self.table_bet,
                    self.min_raise,
                ),
                None => break,
            };
            let action = self.decide(actor, &menu).await;
            self.apply(actor, action);
            self.outbox
                .paced(Event::Action {
                    hand: self.hand,
                    seat: actor,
                    action,
                    pot: self.pot,
                })
                .await;
            self.audit.action(self.hand, street, actor, action, self.pot);
            cursor = (actor + 1) % self.seats.size();
        }
        if self.seats.runout() {
            self.runout = true;
        }
    }

    /// Opens the window for one decision and waits it out. Invalid
    /// submissions bounce with an error event and the same deadline;
    /// expiry plays the seat's fallback and counts toward auto-play.
    async fn decide(&mut self, actor: Position, menu: &Menu) -> Action {
        // a knock outside any window lifts auto-play before the next turn
        for position in self.windows.take_returning() {
            if let Some(seat) = self.seats.get_mut(position) {
                seat.note_manual();
            }
        }
        if self.seats.get(actor).is_some_and(|s| s.auto_play()) {
            log::debug!("[table] P{} auto-plays", actor);
            return menu.fallback();
        }
        let mut rx = self.windows.bet().open(actor);
        self.timer.start_decision();
        self.outbox.broadcast(Event::Turn {
            hand: self.hand,
            menu: menu.clone(),
            remaining_ms: self.timer.remaining().unwrap_or_default().as_millis() as u64,
        });
        loop {
            let deadline = self.timer.deadline().unwrap_or_else(Instant::now);
            let waited = tokio::select! {
                m = rx.recv() => Waited::Msg(m),
                c = self.commands.recv(), if !self.inbox_closed => Waited::Cmd(c),
                _ = tokio::time::sleep_until(deadline) => Waited::Timeout,
            };
            match waited {
                Waited::Msg(Some(BetMsg::Act(action))) => {
                    if menu.allows(&action) {
                        self.windows.bet().close();
                        self.timer.clear();
                        if let Some(seat) = self.seats.get_mut(actor) {
                            seat.note_manual();
                        }
                        return action;
                    }
                    self.outbox.unicast(
                        actor,
                        Event::Rejected {
                            seat: actor,
                            reason: GameError::IllegalAction {
                                seat: actor,
                                action,
                            }
                            .to_string(),
                        },
                    );
                    self.windows.bet().rearm();
                }
                Waited::Msg(Some(BetMsg::Extend)) => {
                    let granted = self
                        .seats
                        .get_mut(actor)
                        .is_some_and(|seat| seat.use_extension());
                    if granted {
                        self.timer.extend();
                        self.outbox.broadcast(Event::TurnExtended {
                            hand: self.hand,
                            seat: actor,
                            remaining_ms: self.timer.remaining().unwrap_or_default().as_millis()
                                as u64,
                        });
                    } else {
                        self.outbox.unicast(
                            actor,
                            Event::Rejected {
                                seat: actor,
                                reason: GameError::NoExtensionsLeft(actor).to_string(),
                            },
                        );
                    }
                    self.windows.bet().rearm();
                }
                Waited::Msg(None) => {
                    // window closed under us; treat as a timeout
                    self.windows.bet().close();
                    self.timer.clear();
                    return self.timeout(actor, menu);
                }
                Waited::Cmd(Some(cmd)) => self.interlude(cmd),
                Waited::Cmd(None) => {
                    self.inbox_closed = true;
                    self.draining = true;
                }
                Waited::Timeout => {
                    self.windows.bet().close();
                    self.timer.clear();
                    return self.timeout(actor, menu);
                }
            }
        }
    }

    fn timeout(&mut self, actor: Position, menu: &Menu) -> Action {
        let action = menu.fallback();
        let entered = self.seats.get_mut(actor).is_some_and(|seat| {
            seat.note_timeout(
                action == Action::Check,
                self.config.max_auto_checks,
                self.config.max_auto_folds,
            )
        });
        if entered {
            self.outbox.broadcast(Event::AutoPlay {
                hand: self.hand,
                seat: actor,
            });
        }
        log::debug!("[table] P{} timed out, {}", actor, action);
        action
    }

    fn apply(&mut self, actor: Position, action: Action) {
        let table_bet = self.table_bet;
        let Some(seat) = self.seats.get_mut(actor) else {
            return;
        };
        match action {
            Action::Fold => seat.set_status(Status::Fold),
            Action::Check => seat.set_status(Status::Check),
            Action::Call(_) => {
                let owed = table_bet.saturating_sub(seat.round_bet());
                self.pot += seat.wager(owed);
                seat.set_status(Status::Call);
            }
            Action::Bet(to) => {
                self.pot += seat.wager(to);
                seat.set_status(Status::Bet);
                self.table_bet = to;
                self.min_raise = self.min_raise.max(to);
            }
            Action::Raise(to) => {
                let owed = to.saturating_sub(seat.round_bet());
                self.pot += seat.wager(owed);
                seat.set_status(Status::Raise);
                self.min_raise = to - self.table_bet;
                self.table_bet = to;
            }
            Action::Shove(_) => {
                let stack = seat.stack();
                self.pot += seat.wager(stack);
                let total = seat.round_bet();
                if total > self.table_bet {
                    // only a full-sized raise moves the floor
                    let increment = total - self.table_bet;
                    if increment >= self.min_raise {
                        self.min_raise = increment;
                    }
                    self.table_bet = total;
                }
            }
        }
        if let Some(seat) = self.seats.get_mut(actor) {
            seat.mark_acted();
        }
    }

    /// Ends the hand at once when a single contender remains.
    fn maybe_simple_win(&mut self) -> bool {
        let contenders = self.seats.contenders();
        if contenders.len() != 1 {
            return false;
        }
        let winner = contenders[0];
        if let Some(seat) = self.seats.get_mut(winner) {
            seat.win(self.pot);
        }
        log::debug!("[table] hand {} simple win P{}", self.hand, winner);
        self.finish_hand(BTreeMap::from([(winner, self.pot)]), false);
        true
    }

    pub(crate) fn contributions(&self) -> (Vec<Contribution>, Chips) {
        let live = self
            .seats
            .iter()
            .filter(|s| s.contesting())
            .map(|s| Contribution {
                seat: s.position(),
                chips: s.hand_bet(),
                shoved: s.status().is_shoved(),
            })
            .collect::<Vec<_>>();
        let folded = self
            .seats
            .iter()
            .filter(|s| !s.contesting())
            .map(|s| s.hand_bet())
            .sum::<Chips>();
        (live, self.dead + folded)
    }

    fn broadcast_pots(&mut self, street: Street) {
        let (live, dead) = self.contributions();
        self.outbox.broadcast(Event::Pots {
            hand: self.hand,
            street,
            pots: build(&live, dead),
        });
    }

    /// Face-up cards once betting can no longer reopen.
    fn reveal_runout(&mut self) {
        if self.shown {
            return;
        }
        self.shown = true;
        let reveals = self
            .seats
            .iter()
            .filter(|s| s.contesting())
            .filter_map(|s| s.hole().map(|h| (s.position(), h)))
            .collect::<Vec<_>>();
        for (position, hole) in reveals {
            self.outbox.broadcast(Event::Reveal {
                hand: self.hand,
                seat: position,
                hole,
            });
        }
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        let order = self.seats.showdown_order();
        let mut strengths = BTreeMap::new();
        let board = self.board.clone();
        for position in &order {
            if let Some(seat) = self.seats.get_mut(*position) {
                strengths.insert(*position, seat.strength(&board)?);
            }
        }
        if !self.shown {
            self.reveal_runout();
        }
        let (live, dead) = self.contributions();
        let pots = build(&live, dead);
        let rewards = distribute(&pots, &strengths, &order);
        debug_assert!(rewards.values().sum::<Chips>() == self.pot);
        for (position, chips) in &rewards {
            if let Some(seat) = self.seats.get_mut(*position) {
                seat.win(*chips);
            }
        }
        log::debug!("[table] hand {} showdown: {:?}", self.hand, rewards);
        self.finish_hand(rewards, true);
        Ok(())
    }

    /// Unwinds a hand that cannot finish (an exhausted deck, a seat with no
    /// cards to evaluate): every committed chip, whether bet, ante or
    /// insurance premium, goes back to its seat before the summary goes
    /// out, so the session can continue with the next hand.
    fn abort_hand(&mut self) {
        self.windows.bet().close();
        self.timer.clear();
        for policy in std::mem::take(&mut self.policies) {
            if let Some(seat) = self.seats.get_mut(policy.seat) {
                seat.take_insurance();
                seat.win(policy.paid);
            }
        }
        for seat in self.seats.iter_mut() {
            seat.win(seat.hand_bet() + seat.ante());
        }
        self.pot = 0;
        self.dead = 0;
        self.finish_hand(BTreeMap::new(), false);
    }

    fn finish_hand(&mut self, rewards: BTreeMap<Position, Chips>, showdown: bool) {
        let board = self.board.clone();
        let mut results = Vec::new();
        for seat in self.seats.iter_mut() {
            let position = seat.position();
            let reward = rewards.get(&position).copied().unwrap_or(0);
            let strength = if showdown && seat.contesting() {
                seat.strength(&board).ok()
            } else {
                None
            };
            results.push(SeatResult {
                seat: position,
                reward,
                stack: seat.stack(),
                ranking: strength.map(|s| s.ranking()),
                cards: strength.map(|s| s.cards()),
            });
        }
        self.outbox.broadcast(Event::HandEnd {
            hand: self.hand,
            results: results.clone(),
        });
        self.audit.hand_end(self.hand, &results);
    }
}
