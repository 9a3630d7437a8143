//! Integration tests for the playback coordinator
//!
//! These tests drive real soundscape scenarios through the public API
//! with a scripted audio collaborator.

use async_trait::async_trait;
use hearth_core::{
    AudioSink, ChannelKind, EffectId, Entitlements, GainChannel, LibraryItem, LoopId, PlaylistId,
};
use hearth_playback::{
    EngineConfig, EngineEvent, PlaybackCoordinator, PlaylistOutcome, PlaylistToggle,
    ProgressTracker,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ===== Test Helpers =====

/// Scripted audio collaborator
///
/// Records duck notifications and gain writes; playlist starts can be
/// made to fail.
struct ScriptedSink {
    duck_notifications: Mutex<Vec<bool>>,
    gains: Mutex<Vec<(GainChannel, f32)>>,
    seeks: Mutex<Vec<Duration>>,
    fail_playlist_start: AtomicBool,
}

impl ScriptedSink {
    fn new() -> Self {
        Self {
            duck_notifications: Mutex::new(Vec::new()),
            gains: Mutex::new(Vec::new()),
            seeks: Mutex::new(Vec::new()),
            fail_playlist_start: AtomicBool::new(false),
        }
    }

    fn duck_notifications(&self) -> Vec<bool> {
        self.duck_notifications.lock().unwrap().clone()
    }

    fn seeks(&self) -> Vec<Duration> {
        self.seeks.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for ScriptedSink {
    fn play(&self, _kind: ChannelKind, _id: &str) -> bool {
        true
    }

    fn stop(&self, _kind: ChannelKind, _id: &str) {}

    fn stop_all(&self, _kind: ChannelKind) {}

    fn set_gain(&self, channel: GainChannel, value: f32) {
        self.gains.lock().unwrap().push((channel, value));
    }

    fn set_duck_active(&self, active: bool) {
        self.duck_notifications.lock().unwrap().push(active);
    }

    fn seek(&self, position: Duration) {
        self.seeks.lock().unwrap().push(position);
    }

    fn system_volume(&self) -> Option<f32> {
        None
    }

    fn set_system_volume(&self, _value: f32) {}

    async fn start_playlist(&self, _id: &str) -> bool {
        !self.fail_playlist_start.load(Ordering::SeqCst)
    }
}

struct Premium;
impl Entitlements for Premium {
    fn allows_remote_playback(&self) -> bool {
        true
    }
}

struct FreeTier;
impl Entitlements for FreeTier {
    fn allows_remote_playback(&self) -> bool {
        false
    }
}

fn engine_with(sink: Arc<ScriptedSink>) -> PlaybackCoordinator {
    PlaybackCoordinator::new(EngineConfig::default(), sink, Arc::new(Premium))
}

fn music(id: &str, title: &str) -> LibraryItem {
    LibraryItem::new(id, title, ChannelKind::Music)
}

// ===== Scenarios =====

#[test]
fn thunder_ducks_and_releases() {
    // Thunder ducks the beds while active, releases on deactivation
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink.clone());
    let thunder = EffectId::new("thunder");

    engine.toggle_effect(&thunder);
    assert!(engine.is_duck_active());

    engine.toggle_effect(&thunder);
    assert!(!engine.is_duck_active());

    // Exactly two notifications reached the collaborator: the rise and
    // the release, nothing redundant in between
    assert_eq!(sink.duck_notifications(), vec![true, false]);
}

#[test]
fn overlapping_effects_duck_once() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink.clone());

    engine.toggle_effect(&EffectId::new("thunder"));
    engine.toggle_effect(&EffectId::new("sword-clash"));
    engine.toggle_effect(&EffectId::new("thunder")); // One effect remains

    assert!(engine.is_duck_active());
    assert_eq!(sink.duck_notifications(), vec![true]);

    engine.toggle_effect(&EffectId::new("sword-clash"));
    assert_eq!(sink.duck_notifications(), vec![true, false]);
}

#[test]
fn recent_list_blends_playing_and_history() {
    // History [A, B, C] with B re-activated: B leads, fill keeps order
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    for id in ["C", "B", "A"] {
        let id = LoopId::new(id);
        engine.toggle_loop(&id); // On: records history
        engine.toggle_loop(&id); // Off again
    }
    engine.toggle_loop(&LoopId::new("B")); // Re-activate B, history [B, A, C]

    // B is playing so it leads; fill preserves history order minus B
    let recent = engine.recent_loops(|_| false, |_| true);
    assert_eq!(
        recent,
        vec![LoopId::new("B"), LoopId::new("A"), LoopId::new("C")]
    );
}

#[test]
fn toggling_twice_restores_state_but_not_history_order() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);
    let rain = LoopId::new("rain");
    let wind = LoopId::new("wind");

    engine.toggle_loop(&rain);
    engine.toggle_loop(&wind);
    let before = engine.recent_loops(|_| false, |_| true);
    assert_eq!(before, vec![wind.clone(), rain.clone()]);

    // An off/on pair returns membership to its original state...
    engine.toggle_loop(&rain);
    assert!(!engine.is_loop_active(&rain));
    engine.toggle_loop(&rain);
    assert!(engine.is_loop_active(&rain));

    // ...but only the activating half touched history: rain moved to
    // the front, the deactivation changed nothing
    let after = engine.recent_loops(|_| false, |_| true);
    assert_eq!(after, vec![rain.clone(), wind.clone()]);
}

#[tokio::test]
async fn session_flow_with_panic_stop() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    engine.toggle_loop(&LoopId::new("rain"));
    engine.toggle_loop(&LoopId::new("tavern-chatter"));
    engine.toggle_effect(&EffectId::new("door-slam"));
    engine
        .toggle_playlist(&music("bard-songs", "Bard Songs"))
        .await
        .unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.active_loops.len(), 2);
    assert_eq!(snapshot.active_effects.len(), 1);
    assert_eq!(
        snapshot.playlist.active,
        Some(PlaylistId::new("bard-songs"))
    );
    assert!(snapshot.duck_active);

    engine.stop_everything();

    let snapshot = engine.snapshot();
    assert!(snapshot.active_loops.is_empty());
    assert!(snapshot.active_effects.is_empty());
    assert_eq!(snapshot.playlist.active, None);
    assert!(!snapshot.duck_active);

    // Histories survive the panic stop
    assert_eq!(engine.recent_loops(|_| false, |_| true).len(), 2);
    assert_eq!(engine.recent_playlists(|_| false, |_| true).len(), 1);
}

#[tokio::test]
async fn playlist_replacement_keeps_single_active() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    engine
        .toggle_playlist(&music("tavern", "Tavern Songs"))
        .await
        .unwrap();
    engine
        .toggle_playlist(&music("battle", "Battle Drums"))
        .await
        .unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.playlist.active, Some(PlaylistId::new("battle")));

    // Both appear in recency, active first
    let recent = engine.recent_playlists(|_| false, |_| true);
    assert_eq!(
        recent,
        vec![PlaylistId::new("battle"), PlaylistId::new("tavern")]
    );
}

#[tokio::test]
async fn switching_playlists_mid_start_discards_the_slower_one() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    let PlaylistToggle::Pending(slow) = engine
        .begin_playlist_toggle(&music("tavern", "Tavern Songs"))
        .unwrap()
    else {
        panic!("expected a pending start");
    };

    // The GM changes their mind before the first start lands
    let PlaylistToggle::Pending(fast) = engine
        .begin_playlist_toggle(&music("battle", "Battle Drums"))
        .unwrap()
    else {
        panic!("expected a pending start");
    };

    let slow_done = slow.run().await;
    let fast_done = fast.run().await;

    assert_eq!(
        engine.finish_playlist_start(slow_done),
        PlaylistOutcome::Superseded
    );
    assert_eq!(
        engine.finish_playlist_start(fast_done),
        PlaylistOutcome::Started
    );

    // Only the winner is active, audible, and remembered
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.playlist.active, Some(PlaylistId::new("battle")));
    assert!(snapshot.playlist.is_playing);
    assert_eq!(
        engine.recent_playlists(|_| false, |_| true),
        vec![PlaylistId::new("battle")]
    );
}

#[tokio::test]
async fn failed_start_is_recoverable_by_reissuing() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink.clone());
    let battle = music("battle", "Battle Drums");

    sink.fail_playlist_start.store(true, Ordering::SeqCst);
    assert_eq!(
        engine.toggle_playlist(&battle).await.unwrap(),
        PlaylistOutcome::Failed
    );
    assert_eq!(engine.snapshot().playlist.active, None);

    // Worst outcome is "nothing audible changed": the same call
    // succeeds once the collaborator recovers
    sink.fail_playlist_start.store(false, Ordering::SeqCst);
    assert_eq!(
        engine.toggle_playlist(&battle).await.unwrap(),
        PlaylistOutcome::Started
    );
    assert_eq!(engine.snapshot().playlist.active, Some(PlaylistId::new("battle")));
}

#[tokio::test]
async fn free_tier_is_asked_to_upgrade_not_failed() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine =
        PlaybackCoordinator::new(EngineConfig::default(), sink, Arc::new(FreeTier));

    let remote = music("streamed-ost", "Streamed OST").remote();
    assert_eq!(
        engine.toggle_playlist(&remote).await.unwrap(),
        PlaylistOutcome::UpgradeRequired
    );

    // Local items are unaffected by the gate
    assert_eq!(
        engine
            .toggle_playlist(&music("local-ost", "Local OST"))
            .await
            .unwrap(),
        PlaylistOutcome::Started
    );
}

#[test]
fn scrub_resumes_extrapolation_from_committed_point() {
    // Scrub from 10s of a 100s track and commit at 40s: extrapolation
    // resumes from 40s, not the pre-scrub trajectory
    let t0 = Instant::now();
    let mut tracker = ProgressTracker::new();
    tracker.begin(Duration::from_secs(100), t0);
    tracker.update(
        Duration::from_secs(10),
        Duration::from_secs(100),
        true,
        t0,
    );

    tracker.begin_scrub(t0);
    tracker
        .update_scrub(Duration::from_secs(25), t0 + Duration::from_millis(100))
        .unwrap();
    tracker
        .end_scrub(Duration::from_secs(40), t0 + Duration::from_secs(2))
        .unwrap();

    assert_eq!(
        tracker.displayed(t0 + Duration::from_secs(7)),
        Duration::from_secs(45)
    );
}

#[tokio::test]
async fn scrub_preseeks_are_throttled_but_commit_always_seeks() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink.clone());

    engine
        .toggle_playlist(&music("tavern", "Tavern Songs"))
        .await
        .unwrap();
    engine.report_progress(Duration::from_secs(10), Duration::from_secs(100), true);

    engine.begin_scrub();
    // Burst of slider updates: only the first can pre-seek inside the
    // throttle window
    engine.update_scrub(Duration::from_secs(20)).unwrap();
    engine.update_scrub(Duration::from_secs(21)).unwrap();
    engine.update_scrub(Duration::from_secs(22)).unwrap();
    engine.end_scrub(Duration::from_secs(30)).unwrap();

    let seeks = sink.seeks();
    assert_eq!(seeks.first(), Some(&Duration::from_secs(20)));
    assert_eq!(seeks.last(), Some(&Duration::from_secs(30)));
    assert!(seeks.len() <= 3);

    assert!(engine
        .take_events()
        .contains(&EngineEvent::Seeked { position_ms: 30_000 }));
}

#[test]
fn volume_epsilon_scenario() {
    // Local write of 0.8 echoed back as 0.8002 is dropped; a genuine
    // system change to 0.5 is adopted
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    engine.set_master_volume(0.8);
    engine.handle_system_volume(0.8002);
    assert_eq!(engine.master_volume(), 0.8);

    engine.handle_system_volume(0.5);
    assert_eq!(engine.master_volume(), 0.5);
}

#[test]
fn bookmarked_and_deleted_items_stay_out_of_recents() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);

    for id in ["drone", "cave-drip", "wind"] {
        let id = LoopId::new(id);
        engine.toggle_loop(&id);
        engine.toggle_loop(&id);
    }

    let bookmarked = |id: &LoopId| id.as_str() == "wind";
    let in_catalog = |id: &LoopId| id.as_str() != "drone"; // Deleted upstream

    let recent = engine.recent_loops(bookmarked, in_catalog);
    assert_eq!(recent, vec![LoopId::new("cave-drip")]);
}

#[test]
fn forget_removes_from_recents() {
    let sink = Arc::new(ScriptedSink::new());
    let mut engine = engine_with(sink);
    let rain = LoopId::new("rain");

    engine.toggle_loop(&rain);
    engine.toggle_loop(&rain);
    assert_eq!(engine.recent_loops(|_| false, |_| true), vec![rain.clone()]);

    engine.forget_loop(&rain);
    assert!(engine.recent_loops(|_| false, |_| true).is_empty());
    assert_eq!(engine.loop_last_played(&rain), None);
}
