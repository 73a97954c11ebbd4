use super::meter::SessionMeter;
use super::navigator::{advance, Advance, Direction};
use super::session::{next_speed, PlayerCommand, PlayerEvent, PlayerSession, PlayerState};
use crate::api::models::Track;
use crate::db::{MemoryPositionStore, PositionStore, RepeatMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {id}"),
        media_url: format!("https://cdn.example.com/media/{id}.mp3"),
        duration: 180,
        ..Default::default()
    }
}

fn session_with(track_count: usize) -> (PlayerSession, Rc<MemoryPositionStore>) {
    let store = Rc::new(MemoryPositionStore::default());
    let mut session = PlayerSession::new(store.clone(), StdRng::seed_from_u64(7));
    session.set_tracks(
        (0..track_count)
            .map(|i| track(&format!("t{i}")))
            .collect(),
    );
    (session, store)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

// ----- play/pause -----

#[test]
fn toggling_twice_from_paused_returns_to_paused() {
    let (mut session, _store) = session_with(3);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::TogglePlayPause);
    session.handle(PlayerEvent::TogglePlayPause);
    assert_eq!(session.state(), PlayerState::Paused);

    let first = session.handle(PlayerEvent::TogglePlayPause);
    let second = session.handle(PlayerEvent::TogglePlayPause);
    assert_eq!(session.state(), PlayerState::Paused);
    assert_eq!(first, vec![PlayerCommand::Play]);
    assert_eq!(second, vec![PlayerCommand::Pause]);
}

#[test]
fn toggle_with_no_track_loaded_does_nothing() {
    let (mut session, _store) = session_with(3);
    assert!(session.handle(PlayerEvent::TogglePlayPause).is_empty());
    assert_eq!(session.state(), PlayerState::Idle);
}

#[test]
fn first_play_reports_the_view_count_exactly_once() {
    let (mut session, _store) = session_with(2);
    session.handle(PlayerEvent::Load { index: 0 });

    let commands = session.handle(PlayerEvent::TogglePlayPause);
    assert!(commands.contains(&PlayerCommand::ReportPlay {
        track_id: "t0".to_string()
    }));

    session.handle(PlayerEvent::TogglePlayPause);
    let resumed = session.handle(PlayerEvent::TogglePlayPause);
    assert_eq!(resumed, vec![PlayerCommand::Play]);
}

// ----- repeat-one -----

#[test]
fn repeat_one_restarts_the_same_track_on_ended() {
    let (mut session, store) = session_with(3);
    session.set_repeat(RepeatMode::One);
    session.handle(PlayerEvent::Load { index: 1 });
    session.handle(PlayerEvent::TogglePlayPause);
    store.set("t1", 120.0);

    let commands = session.handle(PlayerEvent::Ended);
    assert_eq!(session.state(), PlayerState::Playing);
    assert_eq!(session.index(), 1);
    assert_eq!(
        commands,
        vec![
            PlayerCommand::SeekTo { seconds: 0.0 },
            PlayerCommand::Play
        ]
    );
    // A finished track forgets its resume offset.
    assert_eq!(store.get("t1"), 0.0);
}

#[test]
fn repeat_one_manual_next_restarts_without_advancing() {
    let (mut session, _store) = session_with(3);
    session.set_repeat(RepeatMode::One);
    session.handle(PlayerEvent::Load { index: 2 });

    let commands = session.handle(PlayerEvent::Next);
    assert_eq!(session.index(), 2);
    assert_eq!(commands, vec![PlayerCommand::SeekTo { seconds: 0.0 }]);
    // The track was paused, so the restart stays paused.
    assert_eq!(session.state(), PlayerState::Paused);
}

// ----- navigator wrap laws -----

#[test]
fn repeat_all_wraps_forward_and_backward() {
    let mut r = rng();
    assert_eq!(
        advance(4, 5, false, RepeatMode::All, Direction::Forward, 0.0, &mut r),
        Advance::Jump(0)
    );
    assert_eq!(
        advance(0, 5, false, RepeatMode::All, Direction::Backward, 1.0, &mut r),
        Advance::Jump(4)
    );
}

#[test]
fn boundaries_are_no_ops_without_repeat_all() {
    let mut r = rng();
    assert_eq!(
        advance(4, 5, false, RepeatMode::Off, Direction::Forward, 0.0, &mut r),
        Advance::Stop
    );
    assert_eq!(
        advance(0, 5, false, RepeatMode::Off, Direction::Backward, 1.0, &mut r),
        Advance::Stop
    );
}

#[test]
fn sequential_forward_moves_one_step() {
    let mut r = rng();
    assert_eq!(
        advance(1, 5, false, RepeatMode::Off, Direction::Forward, 0.0, &mut r),
        Advance::Jump(2)
    );
}

#[test]
fn previous_restarts_past_three_seconds() {
    let mut r = rng();
    assert_eq!(
        advance(2, 5, false, RepeatMode::Off, Direction::Backward, 3.5, &mut r),
        Advance::Restart
    );
    assert_eq!(
        advance(2, 5, false, RepeatMode::Off, Direction::Backward, 2.9, &mut r),
        Advance::Jump(1)
    );
}

#[test]
fn single_entry_list_has_nowhere_to_go_without_repeat() {
    let mut r = rng();
    assert_eq!(
        advance(0, 1, false, RepeatMode::Off, Direction::Forward, 0.0, &mut r),
        Advance::Stop
    );
    assert_eq!(
        advance(0, 1, false, RepeatMode::Off, Direction::Backward, 1.0, &mut r),
        Advance::Stop
    );
    assert_eq!(
        advance(0, 0, false, RepeatMode::All, Direction::Forward, 0.0, &mut r),
        Advance::Stop
    );
}

#[test]
fn single_entry_list_loops_under_repeat_all() {
    let mut r = rng();
    assert_eq!(
        advance(0, 1, true, RepeatMode::All, Direction::Forward, 0.0, &mut r),
        Advance::Jump(0)
    );
}

#[test]
fn shuffle_never_picks_the_current_index() {
    let mut r = rng();
    let mut seen = [false; 5];
    for _ in 0..200 {
        match advance(2, 5, true, RepeatMode::Off, Direction::Forward, 0.0, &mut r) {
            Advance::Jump(target) => {
                assert_ne!(target, 2);
                assert!(target < 5);
                seen[target] = true;
            }
            other => panic!("shuffle should always jump, got {other:?}"),
        }
    }
    // Every other index shows up over enough draws.
    assert!(seen[0] && seen[1] && seen[3] && seen[4]);
}

// ----- minute accumulation -----

#[test]
fn two_minutes_and_five_seconds_reports_exactly_two_minutes() {
    let mut meter = SessionMeter::new();
    let mut reports = Vec::new();
    for second in 1..=125u32 {
        if meter.tick() {
            reports.push(second);
        }
    }
    assert_eq!(reports, vec![60, 120]);
    // The leftover 5 seconds are dropped at close.
    assert_eq!(meter.flush(), 0);
    assert_eq!(meter.elapsed_secs(), 125);
}

#[test]
fn sub_minute_sessions_report_nothing() {
    let mut meter = SessionMeter::new();
    for _ in 0..59 {
        assert!(!meter.tick());
    }
    assert_eq!(meter.flush(), 0);
}

#[test]
fn meter_reset_starts_a_fresh_count() {
    let mut meter = SessionMeter::new();
    for _ in 0..90 {
        meter.tick();
    }
    meter.reset();
    assert_eq!(meter.elapsed_secs(), 0);
    let mut reported = 0;
    for _ in 0..60 {
        if meter.tick() {
            reported += 1;
        }
    }
    assert_eq!(reported, 1);
}

// ----- speed cycling -----

#[test]
fn four_speed_cycles_return_to_normal() {
    assert_eq!(next_speed(1.0), 1.5);
    assert_eq!(next_speed(1.5), 2.0);
    assert_eq!(next_speed(2.0), 0.5);
    assert_eq!(next_speed(0.5), 1.0);
}

#[test]
fn session_speed_cycle_emits_rate_changes() {
    let (mut session, _store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    let mut rates = Vec::new();
    for _ in 0..4 {
        for command in session.handle(PlayerEvent::CycleSpeed) {
            if let PlayerCommand::SetRate { rate } = command {
                rates.push(rate);
            }
        }
    }
    assert_eq!(rates, vec![1.5, 2.0, 0.5, 1.0]);
    assert_eq!(session.speed(), 1.0);
}

// ----- loading and resume -----

#[test]
fn load_reapplies_the_selected_speed() {
    let (mut session, _store) = session_with(2);
    session.set_speed(1.5);
    let commands = session.handle(PlayerEvent::Load { index: 0 });
    assert!(commands.contains(&PlayerCommand::SetRate { rate: 1.5 }));
    assert!(matches!(commands[0], PlayerCommand::LoadSource { .. }));
}

#[test]
fn saved_position_is_restored_once_metadata_arrives() {
    let (mut session, store) = session_with(2);
    store.set("t0", 42.5);

    let load_commands = session.handle(PlayerEvent::Load { index: 0 });
    assert!(!load_commands
        .iter()
        .any(|c| matches!(c, PlayerCommand::SeekTo { .. })));

    let ready = session.handle(PlayerEvent::MetadataReady { duration: 180.0 });
    assert_eq!(ready, vec![PlayerCommand::SeekTo { seconds: 42.5 }]);

    // A second metadata event must not replay the resume seek.
    let again = session.handle(PlayerEvent::MetadataReady { duration: 180.0 });
    assert!(again.is_empty());
}

#[test]
fn seek_persists_the_new_offset_immediately() {
    let (mut session, store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::MetadataReady { duration: 200.0 });

    let commands = session.handle(PlayerEvent::Seek { fraction: 0.5 });
    assert_eq!(commands, vec![PlayerCommand::SeekTo { seconds: 100.0 }]);
    assert_eq!(store.get("t0"), 100.0);
}

#[test]
fn seek_before_metadata_is_ignored() {
    let (mut session, _store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    assert!(session.handle(PlayerEvent::Seek { fraction: 0.9 }).is_empty());
}

#[test]
fn heartbeat_saves_the_offset_every_fifth_second() {
    let (mut session, store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::TogglePlayPause);

    for second in 1..=4u32 {
        session.handle(PlayerEvent::Heartbeat {
            media_time: f64::from(second),
        });
    }
    assert_eq!(store.get("t0"), 0.0);

    session.handle(PlayerEvent::Heartbeat { media_time: 5.0 });
    assert_eq!(store.get("t0"), 5.0);
}

#[test]
fn paused_heartbeats_do_not_save() {
    let (mut session, store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    for second in 1..=10u32 {
        session.handle(PlayerEvent::Heartbeat {
            media_time: f64::from(second),
        });
    }
    assert_eq!(store.get("t0"), 0.0);
}

// ----- track advance -----

#[test]
fn natural_end_advances_and_keeps_playing() {
    let (mut session, store) = session_with(2);
    store.set("t0", 90.0);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::TogglePlayPause);

    let commands = session.handle(PlayerEvent::Ended);
    assert_eq!(session.index(), 1);
    assert_eq!(session.state(), PlayerState::Playing);
    assert!(commands
        .iter()
        .any(|c| matches!(c, PlayerCommand::LoadSource { .. })));
    assert!(commands.contains(&PlayerCommand::Play));
    // The finished track's offset record is gone.
    assert_eq!(store.get("t0"), 0.0);
}

#[test]
fn natural_end_at_the_list_tail_stops_playback() {
    let (mut session, _store) = session_with(2);
    session.handle(PlayerEvent::Load { index: 1 });
    session.handle(PlayerEvent::TogglePlayPause);

    let commands = session.handle(PlayerEvent::Ended);
    assert!(commands.is_empty());
    assert_eq!(session.state(), PlayerState::Ended);
    assert_eq!(session.index(), 1);
}

#[test]
fn manual_next_keeps_the_unfinished_offset() {
    let (mut session, store) = session_with(3);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::TogglePlayPause);
    session.handle(PlayerEvent::Heartbeat { media_time: 30.0 });

    session.handle(PlayerEvent::Next);
    assert_eq!(session.index(), 1);
    // Skipping away is not finishing; the offset survives for next time.
    assert_eq!(store.get("t0"), 30.0);
}

#[test]
fn previous_early_in_the_track_steps_back() {
    let (mut session, _store) = session_with(3);
    session.handle(PlayerEvent::Load { index: 1 });

    let commands = session.handle(PlayerEvent::Previous { media_time: 1.5 });
    assert_eq!(session.index(), 0);
    assert!(commands
        .iter()
        .any(|c| matches!(c, PlayerCommand::LoadSource { .. })));
}

#[test]
fn previous_late_in_the_track_restarts_it() {
    let (mut session, _store) = session_with(3);
    session.handle(PlayerEvent::Load { index: 1 });
    session.handle(PlayerEvent::TogglePlayPause);

    let commands = session.handle(PlayerEvent::Previous { media_time: 12.0 });
    assert_eq!(session.index(), 1);
    assert_eq!(commands, vec![PlayerCommand::SeekTo { seconds: 0.0 }]);
    assert_eq!(session.state(), PlayerState::Playing);
}

// ----- close -----

#[test]
fn close_pauses_and_saves_the_offset() {
    let (mut session, store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    session.handle(PlayerEvent::TogglePlayPause);

    let commands = session.handle(PlayerEvent::Close { media_time: 73.0 });
    assert_eq!(commands, vec![PlayerCommand::Pause]);
    assert_eq!(session.state(), PlayerState::Idle);
    assert_eq!(store.get("t0"), 73.0);
}

// ----- volume -----

#[test]
fn volume_is_clamped_to_unit_range() {
    let (mut session, _store) = session_with(1);
    session.handle(PlayerEvent::Load { index: 0 });
    assert_eq!(
        session.handle(PlayerEvent::SetVolume { volume: 1.4 }),
        vec![PlayerCommand::SetVolume { volume: 1.0 }]
    );
    assert_eq!(
        session.handle(PlayerEvent::SetVolume { volume: -0.2 }),
        vec![PlayerCommand::SetVolume { volume: 0.0 }]
    );
}

// ----- modes -----

#[test]
fn repeat_cycles_off_all_one() {
    let (mut session, _store) = session_with(1);
    assert_eq!(session.repeat(), RepeatMode::Off);
    session.handle(PlayerEvent::CycleRepeat);
    assert_eq!(session.repeat(), RepeatMode::All);
    session.handle(PlayerEvent::CycleRepeat);
    assert_eq!(session.repeat(), RepeatMode::One);
    session.handle(PlayerEvent::CycleRepeat);
    assert_eq!(session.repeat(), RepeatMode::Off);
}

#[test]
fn persisted_speed_outside_the_step_set_falls_back_to_normal() {
    let (mut session, _store) = session_with(1);
    session.set_speed(1.25);
    assert_eq!(session.speed(), 1.0);
    session.set_speed(2.0);
    assert_eq!(session.speed(), 2.0);
}
