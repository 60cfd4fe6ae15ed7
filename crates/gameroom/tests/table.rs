use felt_gameplay::Action;
use felt_gameplay::Chips;
use felt_gameroom::Event;
use felt_gameroom::Handle;
use felt_gameroom::NopAudit;
use felt_gameroom::SeatResult;
use felt_gameroom::TableConfig;
use std::time::Duration;

fn config() -> TableConfig {
    TableConfig {
        seats: 2,
        small_blind: 10,
        min_buy_in: 100,
        decision_timeout: Duration::from_secs(5),
        broadcast_delay: Duration::ZERO,
        wait_for_players: Duration::from_secs(5),
        ..TableConfig::default()
    }
}

fn stacks(results: &[SeatResult]) -> Chips {
    results.iter().map(|r| r.stack).sum()
}

#[tokio::test]
async fn first_to_act_folds_and_the_blinds_change_hands() {
    let handle = Handle::spawn(config(), Box::new(NopAudit));
    let mut rx0 = handle.sit(0, 1000).await.unwrap();
    let _rx1 = handle.sit(1, 1000).await.unwrap();
    handle.start().await.unwrap();
    let mut first = None;
    loop {
        match rx0.recv().await {
            Some(Event::Turn { menu, .. }) => {
                let _ = handle.act(menu.seat(), Action::Fold);
            }
            Some(Event::HandEnd { results, .. }) => {
                assert!(stacks(&results) == 2000);
                if first.is_none() {
                    first = Some(results);
                    handle.drain();
                }
            }
            Some(Event::GameEnd) => break,
            Some(_) => {}
            None => panic!("table hung up"),
        }
    }
    // sb 10 and bb 20 in, the fold hands the whole pot to the big blind
    let results = first.unwrap();
    assert!(results.iter().map(|r| r.reward).max() == Some(30));
    assert!(results.iter().all(|r| r.ranking.is_none()));
}

#[tokio::test]
async fn calling_down_reaches_a_showdown() {
    let handle = Handle::spawn(config(), Box::new(NopAudit));
    let mut rx0 = handle.sit(0, 1000).await.unwrap();
    let _rx1 = handle.sit(1, 1000).await.unwrap();
    handle.start().await.unwrap();
    let mut first = None;
    loop {
        match rx0.recv().await {
            Some(Event::Turn { menu, .. }) => {
                let action = if menu.allows(&Action::Check) {
                    Action::Check
                } else {
                    menu.actions()
                        .iter()
                        .copied()
                        .find(|a| matches!(a, Action::Call(_)))
                        .unwrap_or(Action::Fold)
                };
                let _ = handle.act(menu.seat(), action);
            }
            Some(Event::HandEnd { results, .. }) => {
                assert!(stacks(&results) == 2000);
                if first.is_none() {
                    first = Some(results);
                    handle.drain();
                }
            }
            Some(Event::GameEnd) => break,
            Some(_) => {}
            None => panic!("table hung up"),
        }
    }
    // both called everything: pot 40, settled at showdown with a ranking
    let results = first.unwrap();
    assert!(results.iter().map(|r| r.reward).sum::<Chips>() == 40);
    assert!(results.iter().any(|r| r.ranking.is_some()));
}

#[tokio::test]
async fn an_unanswered_turn_plays_itself() {
    let handle = Handle::spawn(
        TableConfig {
            decision_timeout: Duration::from_millis(50),
            ..config()
        },
        Box::new(NopAudit),
    );
    let mut rx0 = handle.sit(0, 1000).await.unwrap();
    let _rx1 = handle.sit(1, 1000).await.unwrap();
    handle.start().await.unwrap();
    loop {
        match rx0.recv().await {
            Some(Event::HandEnd { results, .. }) => {
                // preflop the fallback folds the seat that owes the blind
                assert!(stacks(&results) == 2000);
                assert!(results.iter().map(|r| r.reward).max() == Some(30));
                handle.drain();
            }
            Some(Event::GameEnd) => break,
            Some(_) => {}
            None => panic!("table hung up"),
        }
    }
}

#[tokio::test]
async fn a_knock_wakes_an_auto_played_seat() {
    let handle = Handle::spawn(
        TableConfig {
            decision_timeout: Duration::from_millis(100),
            max_auto_folds: 1,
            ..config()
        },
        Box::new(NopAudit),
    );
    let mut rx0 = handle.sit(0, 1000).await.unwrap();
    let _rx1 = handle.sit(1, 1000).await.unwrap();
    handle.start().await.unwrap();
    let mut trapped = None;
    let mut knocked = false;
    let mut freed = false;
    let mut hands = 0;
    loop {
        match rx0.recv().await {
            Some(Event::Turn { menu, .. }) => match trapped {
                // the first turn goes unanswered on purpose
                None => {}
                Some(seat) if seat == menu.seat() => {
                    freed = true;
                    assert!(handle.act(seat, Action::Fold).is_ok());
                }
                Some(_) => {
                    let _ = handle.act(menu.seat(), Action::Fold);
                }
            },
            Some(Event::AutoPlay { seat, .. }) => {
                trapped = Some(seat);
            }
            Some(Event::HandEnd { .. }) => {
                hands += 1;
                assert!(hands < 6, "the knock never brought the seat back");
                if let Some(seat) = trapped {
                    if !knocked {
                        // no window is open, but the knock registers presence
                        knocked = true;
                        assert!(handle.act(seat, Action::Fold).is_err());
                    }
                }
                if freed {
                    handle.drain();
                }
            }
            Some(Event::GameEnd) => break,
            Some(_) => {}
            None => panic!("table hung up"),
        }
    }
    assert!(freed);
}

#[tokio::test]
async fn lobby_rejects_what_it_should() {
    let handle = Handle::spawn(config(), Box::new(NopAudit));
    assert!(handle.sit(0, 1).await.is_err());
    assert!(handle.act(0, Action::Fold).is_err());
    let _rx = handle.sit(0, 1000).await.unwrap();
    assert!(handle.sit(0, 1000).await.is_err());
    assert!(handle.start().await.is_err());
    handle.cancel().await.unwrap();
}

#[tokio::test]
async fn observers_see_the_game_without_a_seat() {
    let handle = Handle::spawn(config(), Box::new(NopAudit));
    let (id, mut watcher) = handle.watch();
    let _rx0 = handle.sit(0, 1000).await.unwrap();
    let _rx1 = handle.sit(1, 1000).await.unwrap();
    assert!(matches!(
        watcher.recv().await,
        Some(Event::PlayerSat { seat: 0, .. })
    ));
    assert!(matches!(
        watcher.recv().await,
        Some(Event::PlayerSat { seat: 1, .. })
    ));
    handle.unwatch(id);
    handle.cancel().await.unwrap();
}
