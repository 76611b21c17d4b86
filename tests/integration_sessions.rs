//! End-to-end checks of whole sessions against the public engine API.

use assert_matches::assert_matches;
use pairs::{
    history::GameHistory,
    records::{MemoryRecordStore, Records, SqliteRecordStore},
    session::Face,
    CardId, GameEvent, GameService, GameTimings, Mode, Phase,
};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::tempdir;

fn service_with(records: Records, seed: u64) -> GameService {
    GameService::new(records, StdRng::seed_from_u64(seed), GameTimings::default())
}

fn memory_service(seed: u64) -> GameService {
    service_with(Records::new(Box::new(MemoryRecordStore::new())), seed)
}

fn pairs_by_rank(svc: &GameService) -> Vec<(CardId, CardId)> {
    let deck = svc.session().unwrap().deck();
    let n = deck.len() as u8 / 2;
    (1..=n)
        .map(|rank| {
            let ids: Vec<CardId> = deck.iter().filter(|c| c.rank == rank).map(|c| c.id).collect();
            assert_eq!(ids.len(), 2);
            (ids[0], ids[1])
        })
        .collect()
}

/// Finish the running session after `secs` whole seconds
fn win_after(svc: &mut GameService, secs: u64) {
    svc.advance(secs * 1000);
    for (a, b) in pairs_by_rank(svc) {
        svc.select_card(a);
        svc.select_card(b);
    }
    svc.advance(500);
}

#[test]
fn normal_mode_scenario() {
    let mut svc = memory_service(2024);
    svc.start_session(Mode::Normal);

    let deck = svc.session().unwrap().deck().to_vec();
    assert_eq!(deck.len(), 16);
    for rank in 1..=8u8 {
        assert_eq!(deck.iter().filter(|c| c.rank == rank).count(), 2);
    }

    // card 0 then a card of a different rank
    let first = CardId(0);
    let other = deck.iter().find(|c| c.rank != deck[0].rank).unwrap().id;
    svc.select_card(first);
    svc.select_card(other);
    svc.advance(1000);

    let session = svc.session().unwrap();
    assert_eq!(session.face(first), Some(Face::Down));
    assert_eq!(session.face(other), Some(Face::Down));
    assert_eq!(session.matched(), 0);
    assert_eq!(session.remaining(), 8);
    svc.drain_events();

    for (i, (a, b)) in pairs_by_rank(&svc).into_iter().enumerate() {
        svc.select_card(a);
        svc.select_card(b);
        let session = svc.session().unwrap();
        assert_eq!(session.matched(), i as u32 + 1);
        assert_eq!(session.matched() + session.remaining(), 8);
    }

    assert_eq!(svc.phase(), Phase::Won);
    assert!(!svc.session().unwrap().timer_running());
    assert_eq!(svc.wins(Mode::Normal), 1);
    assert_eq!(svc.wins(Mode::Hard), 0);

    svc.advance(500);
    let events = svc.drain_events();
    assert!(events.contains(&GameEvent::Win));
    assert!(events.contains(&GameEvent::WinCountChanged {
        mode: Mode::Normal,
        count: 1
    }));
}

#[test]
fn hard_mode_best_time_scenario() {
    let mut svc = memory_service(9);

    svc.start_session(Mode::Hard);
    win_after(&mut svc, 47);
    assert_eq!(svc.best_time(Mode::Hard), Some(47));
    let events = svc.drain_events();
    assert!(events.contains(&GameEvent::NewBestTime("00:47".into())));
    assert!(events.contains(&GameEvent::BestTimeDisplay {
        mode: Mode::Hard,
        display: "00:47".into()
    }));

    svc.restart();
    win_after(&mut svc, 52);
    assert_eq!(svc.best_time(Mode::Hard), Some(47));
    assert!(!svc
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::NewBestTime(_))));

    svc.restart();
    win_after(&mut svc, 30);
    assert_eq!(svc.best_time(Mode::Hard), Some(30));
    assert_eq!(svc.wins(Mode::Hard), 3);
    assert_eq!(svc.best_time(Mode::Normal), None);
}

#[test]
fn normal_win_never_overwrites_hard_record() {
    let mut svc = memory_service(10);
    svc.start_session(Mode::Hard);
    win_after(&mut svc, 100);

    svc.switch_mode(Mode::Normal);
    win_after(&mut svc, 12);

    assert_eq!(svc.best_time(Mode::Hard), Some(100));
    assert_eq!(svc.best_time(Mode::Normal), Some(12));
}

#[test]
fn switch_mode_shows_that_modes_records() {
    let mut svc = memory_service(11);
    svc.start_session(Mode::Hard);
    win_after(&mut svc, 61);

    svc.switch_mode(Mode::Normal);
    let events = svc.drain_events();
    assert!(events.contains(&GameEvent::BestTimeDisplay {
        mode: Mode::Normal,
        display: "--:--".into()
    }));

    svc.switch_mode(Mode::Hard);
    let events = svc.drain_events();
    assert!(events.contains(&GameEvent::BestTimeDisplay {
        mode: Mode::Hard,
        display: "01:01".into()
    }));
    assert!(events.contains(&GameEvent::WinCountChanged {
        mode: Mode::Hard,
        count: 1
    }));
}

#[test]
fn selections_after_win_change_nothing() {
    let mut svc = memory_service(12);
    svc.start_session(Mode::Normal);
    win_after(&mut svc, 5);
    svc.drain_events();

    for idx in 0..16 {
        svc.select_card(CardId(idx));
    }
    svc.advance(60_000);

    assert!(svc.drain_events().is_empty());
    assert_eq!(svc.session().unwrap().elapsed_secs(), 5);
    assert_eq!(svc.phase(), Phase::Won);
}

#[test]
fn stale_resolution_after_switch_is_ignored() {
    let mut svc = memory_service(13);
    svc.start_session(Mode::Normal);
    let pairs = pairs_by_rank(&svc);
    svc.select_card(pairs[0].0);
    svc.select_card(pairs[1].0);
    assert_eq!(svc.phase(), Phase::MismatchDelay);

    svc.switch_mode(Mode::Hard);
    svc.advance(400);
    svc.select_card(CardId(5));
    svc.advance(700);

    assert_eq!(svc.phase(), Phase::AwaitingSecondSelection);
    assert!(!svc
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::CardHidden(_))));
}

#[test]
fn same_seed_deals_same_boards() {
    let mut a = memory_service(77);
    let mut b = memory_service(77);
    a.start_session(Mode::Hard);
    b.start_session(Mode::Hard);
    assert_eq!(a.session().unwrap().deck(), b.session().unwrap().deck());
}

#[test]
fn records_and_history_persist_across_services() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("records.db");
    let history = GameHistory::with_path(dir.path().join("history.csv"));

    {
        let store = SqliteRecordStore::open(&db).unwrap();
        let mut svc =
            service_with(Records::new(Box::new(store)), 1).with_history(history.clone());
        svc.start_session(Mode::Normal);
        win_after(&mut svc, 20);
    }

    let store = SqliteRecordStore::open(&db).unwrap();
    let mut svc = service_with(Records::new(Box::new(store)), 2).with_history(history.clone());
    assert_eq!(svc.best_time(Mode::Normal), Some(20));
    assert_eq!(svc.wins(Mode::Normal), 1);

    svc.start_session(Mode::Normal);
    win_after(&mut svc, 25);
    assert_eq!(svc.best_time(Mode::Normal), Some(20));
    assert_eq!(svc.wins(Mode::Normal), 2);

    let recent = history.recent(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_matches!(recent[0], ref g if g.elapsed_secs == 25 && !g.new_best);
    assert_matches!(recent[1], ref g if g.elapsed_secs == 20 && g.new_best);
}
