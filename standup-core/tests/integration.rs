//! Integration tests for the standup engine.
//!
//! These drive the full engine (scheduler, selector, turn controller,
//! history recorder) through a hand-advanced virtual clock, with scripted
//! pickers so every randomized draw is deterministic.

use standup_core::{
    Engine, FileStore, MemoryStore, ParticipantStatus, ScriptedPicker, SessionConfig, Store,
    TurnOutcome,
};

/// Engine on a memory store with a scripted decision picker. Display draws
/// are cosmetic, so an exhausted script (always index 0) is fine there.
fn engine_with(decision: Vec<usize>) -> Engine {
    Engine::new(
        Box::new(MemoryStore::new()),
        Box::new(ScriptedPicker::new(decision)),
        Box::new(ScriptedPicker::default()),
    )
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn speaking_count(engine: &Engine) -> usize {
    engine
        .participants()
        .iter()
        .filter(|p| p.status == ParticipantStatus::Speaking)
        .count()
}

/// Duration of one full selection scan (15 steps at 80 ms).
const SCAN_MS: u64 = 80 * 15;

/// Duration of one full reveal scan (40 steps at 75 ms).
const REVEAL_MS: u64 = 75 * 40;

// ============================================
// Selection
// ============================================

#[test]
fn test_selection_commits_scripted_winner() {
    // Decision draw 1 → B out of the pending pool [A, B, C].
    let mut engine = engine_with(vec![1]);
    engine.start(&names(&["A", "B", "C"]), false, 10);

    engine.execute_selection();
    assert!(engine.selection().is_some());

    engine.advance(SCAN_MS);
    assert!(engine.selection().is_none());

    let speaker = engine.session().active_speaker().unwrap();
    assert_eq!(speaker.name, "B");
    assert_eq!(speaker.status, ParticipantStatus::Speaking);
    assert_eq!(speaking_count(&engine), 1);
}

#[test]
fn test_selection_is_exclusive_and_guarded() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    // Re-entrant trigger while a scan runs: ignored.
    engine.execute_selection();
    engine.advance(SCAN_MS);
    assert_eq!(speaking_count(&engine), 1);

    // Trigger while someone is speaking: ignored.
    engine.execute_selection();
    assert!(engine.selection().is_none());
    assert_eq!(speaking_count(&engine), 1);
}

#[test]
fn test_winner_comes_from_captured_candidate_set() {
    // Decision draw 1 → B from the set captured at scan start.
    let mut engine = engine_with(vec![1]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    engine.advance(400); // mid-scan
    engine.add_participant("Newcomer");
    engine.advance(SCAN_MS);

    let speaker = engine.session().active_speaker().unwrap();
    assert_eq!(speaker.name, "B");
    let newcomer = engine
        .participants()
        .iter()
        .find(|p| p.name == "Newcomer")
        .unwrap();
    assert_eq!(newcomer.status, ParticipantStatus::Pending);
}

// ============================================
// Speaking clock
// ============================================

#[test]
fn test_clock_ticks_only_the_active_speaker_and_may_overrun() {
    let mut engine = engine_with(vec![1]);
    engine.start(&names(&["A", "B", "C"]), false, 10);

    engine.execute_selection();
    engine.advance(SCAN_MS);

    // Eleven seconds against a ten-second limit: the clock keeps counting,
    // nothing forces the turn over.
    engine.advance(SCAN_MS + 11_000);
    let speaker = engine.session().active_speaker().unwrap();
    assert_eq!(speaker.name, "B");
    assert_eq!(speaker.speaking_secs, 11);
    assert!(speaker.speaking_secs > engine.max_speaking_secs());

    for p in engine.participants() {
        if p.name != "B" {
            assert_eq!(p.speaking_secs, 0);
        }
    }

    engine.act(TurnOutcome::Completed);
    let b = engine.participants().iter().find(|p| p.name == "B").unwrap();
    assert_eq!(b.status, ParticipantStatus::Completed);
    assert_eq!(speaking_count(&engine), 0);

    let pending: Vec<_> = engine
        .session()
        .pending()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(pending, vec!["A", "C"]);
}

#[test]
fn test_clock_stops_when_turn_ends() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.advance(SCAN_MS + 2_000);
    engine.act(TurnOutcome::Completed);

    // No orphaned timer: time passing adds nothing once the floor is clear.
    engine.advance(SCAN_MS + 60_000);
    let a = engine.participants().iter().find(|p| p.name == "A").unwrap();
    assert_eq!(a.speaking_secs, 2);
}

#[test]
fn test_defer_requeues_and_keeps_time() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.advance(SCAN_MS + 3_000);
    engine.act(TurnOutcome::Deferred);

    let a = engine.participants().iter().find(|p| p.name == "A").unwrap();
    assert_eq!(a.status, ParticipantStatus::Pending);
    assert_eq!(a.speaking_secs, 3);
    assert_eq!(speaking_count(&engine), 0);
}

// ============================================
// Auto-transition
// ============================================

#[test]
fn test_auto_transition_fires_after_idle_delay() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A"]), true, 300);

    engine.advance(1_400);
    assert!(engine.selection().is_none());

    engine.advance(1_500);
    assert!(engine.selection().is_some());

    engine.advance(1_500 + SCAN_MS);
    assert_eq!(speaking_count(&engine), 1);
}

#[test]
fn test_auto_delay_restarts_when_roster_changes() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A"]), true, 300);

    engine.advance(1_000);
    engine.add_participant("Zed");

    // The pending delay restarted at the add: nothing at the old deadline.
    engine.advance(2_400);
    assert!(engine.selection().is_none());
    engine.advance(2_500);
    assert!(engine.selection().is_some());
}

#[test]
fn test_manual_mode_never_self_selects() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A"]), false, 300);

    engine.advance(60_000);
    assert!(engine.selection().is_none());
    assert_eq!(speaking_count(&engine), 0);
}

// ============================================
// Completion, summary, history
// ============================================

#[test]
fn test_session_completes_exactly_once() {
    let mut engine = engine_with(vec![0, 0]);
    engine.start(&names(&["Solo"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.act(TurnOutcome::Completed);

    assert_eq!(engine.phase(), standup_core::Phase::Summary);
    assert_eq!(engine.history().len(), 1);

    // The terminal condition keeps holding; re-evaluation must not re-fire.
    for extra in [1_000u64, 5_000, 20_000] {
        engine.advance(SCAN_MS + extra);
    }
    engine.act(TurnOutcome::Completed);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_summary_and_history_share_one_owner_draw() {
    // Decision draws: winner A (0), winner B (0 of the remaining pool),
    // next owner B (1 over the full roster).
    let mut engine = engine_with(vec![0, 0, 1]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.advance(SCAN_MS + 2_000); // two ticks on A's clock
    engine.act(TurnOutcome::Completed);

    engine.execute_selection();
    engine.advance(SCAN_MS + 2_000 + SCAN_MS);
    engine.act(TurnOutcome::Skipped);

    let summary = engine.summary().unwrap();
    assert_eq!(summary.next_owner, "B");
    assert_eq!(summary.total_secs, 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.participant_count, 2);

    let history = engine.history();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.participants_order, vec!["A", "B"]);
    assert_eq!(entry.next_owner, "B");
    assert_eq!(entry.total_duration, 2);
}

#[test]
fn test_reveal_lands_on_the_recorded_owner() {
    let mut engine = engine_with(vec![0, 0]);
    engine.start(&names(&["Solo"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.act(TurnOutcome::Completed);

    let reveal = engine.reveal().unwrap();
    assert!(!reveal.revealed);

    engine.advance(SCAN_MS + REVEAL_MS);
    let reveal = engine.reveal().unwrap();
    assert!(reveal.revealed);
    assert_eq!(reveal.progress(), 100);
    assert_eq!(reveal.guess, engine.history()[0].next_owner);
}

// ============================================
// Roster edits
// ============================================

#[test]
fn test_duplicate_add_warns_and_rejects() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["Alice", "Bob"]), false, 300);

    engine.add_participant("alice");

    assert_eq!(engine.participants().len(), 2);
    let warns = engine
        .feed()
        .entries()
        .filter(|e| e.message.contains("already exists"))
        .count();
    assert_eq!(warns, 1);
}

#[test]
fn test_blank_add_is_ignored() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["Alice"]), false, 300);

    let before = engine.feed().len();
    engine.add_participant("   ");
    assert_eq!(engine.participants().len(), 1);
    assert_eq!(engine.feed().len(), before);
}

#[test]
fn test_rewind_reopens_a_finished_session_path() {
    let mut engine = engine_with(vec![0, 0]);
    engine.start(&names(&["A", "B"]), false, 300);

    engine.execute_selection();
    engine.advance(SCAN_MS + 1_000);
    engine.act(TurnOutcome::Completed);

    let a_id = engine.participants()[0].id;
    engine.rewind(a_id);

    let a = &engine.participants()[0];
    assert_eq!(a.status, ParticipantStatus::Pending);
    assert_eq!(a.speaking_secs, 0);
    assert_eq!(engine.session().pending_count(), 2);
}

#[test]
fn test_reset_returns_to_setup_and_silences_timers() {
    let mut engine = engine_with(vec![0]);
    engine.start(&names(&["A", "B"]), true, 300);

    engine.advance(1_500); // auto-select fires, the scan starts
    engine.advance(1_500 + SCAN_MS); // scan finishes, someone speaking
    assert_eq!(speaking_count(&engine), 1);

    engine.reset();
    assert_eq!(engine.phase(), standup_core::Phase::Setup);
    assert_eq!(speaking_count(&engine), 0);
    for p in engine.participants() {
        assert_eq!(p.status, ParticipantStatus::Pending);
        assert_eq!(p.speaking_secs, 0);
    }

    // All timers died with the run.
    engine.advance(120_000);
    assert!(engine.selection().is_none());
    assert_eq!(speaking_count(&engine), 0);
}

// ============================================
// Persistence
// ============================================

#[test]
fn test_history_survives_engine_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("store");

    let mut engine = Engine::new(
        Box::new(FileStore::new(data_dir.clone())),
        Box::new(ScriptedPicker::new([0, 0])),
        Box::new(ScriptedPicker::default()),
    );
    engine.start(&names(&["Solo"]), false, 300);
    engine.execute_selection();
    engine.advance(SCAN_MS);
    engine.act(TurnOutcome::Completed);

    drop(engine);

    let engine = Engine::new(
        Box::new(FileStore::new(data_dir)),
        Box::new(ScriptedPicker::default()),
        Box::new(ScriptedPicker::default()),
    );
    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].next_owner, "Solo");
}

#[test]
fn test_session_config_round_trips_through_the_engine() {
    let mut engine = engine_with(vec![]);
    let config = SessionConfig {
        names: names(&["X", "Y"]),
        max_time_minutes: 7,
        auto_transition: false,
    };
    engine.save_session_config(&config);
    assert_eq!(engine.load_session_config(), config);
}

#[test]
fn test_lenient_config_load_through_a_store() {
    let mut store = MemoryStore::new();
    store
        .set("session_config", r#"{"names":["X"],"maxTimeMinutes":"bad"}"#)
        .unwrap();
    let config = SessionConfig::load(&store);
    assert_eq!(config.names, vec!["X".to_string()]);
    assert_eq!(config.max_time_minutes, 5);
    assert!(config.auto_transition);
}
