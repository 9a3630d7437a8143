//! Playback coordinator - core orchestration
//!
//! Single owner of all mutable playback state. UI intents (toggles,
//! volume changes, scrubs) enter here, mutate the channel registry,
//! mixer, and progress tracker, and fan out to the audio collaborator.
//! The ducking signal is re-derived on every effect-set or toggle
//! change and applied through the one path that may notify the sink.
//!
//! External readers only ever observe owned [`EngineSnapshot`] values;
//! no references into coordinator state escape.

use crate::{
    channels::{ChannelSet, PlaylistState, StartToken},
    ducking::DuckingCoordinator,
    error::{EngineError, Result},
    events::EngineEvent,
    history::{HistoryLog, LastPlayedMap},
    progress::{ProgressSnapshot, ProgressTracker},
    recency,
    types::{EngineConfig, EngineSnapshot, PlaylistOutcome, PlaylistSnapshot, VolumeSnapshot},
    volume::VolumeMixer,
};
use chrono::{DateTime, Utc};
use hearth_core::{
    AudioSink, ChannelKind, EffectId, Entitlements, GainChannel, LibraryItem, LoopId, PlaylistId,
};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Toggle one item in a multi-select category
///
/// Returns the new active state. On transition to active the item is
/// recorded in history and stamped; deactivation touches neither. A
/// sink failure to start leaves every piece of state unchanged.
fn toggle_channel_item<Id>(
    sink: &dyn AudioSink,
    kind: ChannelKind,
    set: &mut ChannelSet<Id>,
    history: &mut HistoryLog<Id>,
    last_played: &mut LastPlayedMap<Id>,
    id: &Id,
) -> bool
where
    Id: Clone + Eq + Hash + AsRef<str> + fmt::Display,
{
    if set.contains(id) {
        sink.stop(kind, id.as_ref());
        set.toggle(id.clone());
        debug!(kind = ?kind, id = %id, "deactivated");
        false
    } else {
        if !sink.play(kind, id.as_ref()) {
            warn!(kind = ?kind, id = %id, "audio collaborator failed to start item");
            return false;
        }
        set.toggle(id.clone());
        history.record(id.clone());
        last_played.stamp(id.clone(), Utc::now());
        debug!(kind = ?kind, id = %id, "activated");
        true
    }
}

/// Outcome of the synchronous half of a playlist toggle
///
/// Most paths resolve immediately. Issuing a start hands back a
/// [`PendingStart`] that is driven without holding the coordinator, so
/// a newer toggle can land while the start is still suspended.
pub enum PlaylistToggle {
    /// Resolved without reaching the collaborator's async path
    Done(PlaylistOutcome),

    /// A start was issued; run it, then apply the completion through
    /// [`PlaybackCoordinator::finish_playlist_start`]
    Pending(PendingStart),
}

/// One in-flight playlist start
///
/// Owns a clone of the audio collaborator handle, so driving the start
/// to completion does not borrow the coordinator. The carried token
/// decides at finish time whether this attempt still speaks for the
/// engine or has been superseded.
pub struct PendingStart {
    token: StartToken,
    id: PlaylistId,
    prev_active: Option<PlaylistId>,
    prev_playing: bool,
    sink: Arc<dyn AudioSink>,
}

impl PendingStart {
    /// The item this start targets
    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    /// Drive the collaborator start to completion
    pub async fn run(self) -> StartCompletion {
        let started = self.sink.start_playlist(self.id.as_ref()).await;
        StartCompletion {
            token: self.token,
            id: self.id,
            prev_active: self.prev_active,
            prev_playing: self.prev_playing,
            started,
        }
    }
}

/// A finished collaborator start, ready to be applied
pub struct StartCompletion {
    token: StartToken,
    id: PlaylistId,
    prev_active: Option<PlaylistId>,
    prev_playing: bool,
    started: bool,
}

/// Central playback coordination
///
/// Composes the volume mixer, ducking derivation, channel registry,
/// progress tracker, and recency inputs behind one serialized mutation
/// surface. Long-running playlist activation is the only suspension
/// point; a generation token makes superseded activations discard
/// their completions.
pub struct PlaybackCoordinator {
    // Channel registry
    loops: ChannelSet<LoopId>,
    effects: ChannelSet<EffectId>,
    playlist: PlaylistState,

    // History and last-played stamps, per category
    loop_history: HistoryLog<LoopId>,
    effect_history: HistoryLog<EffectId>,
    playlist_history: HistoryLog<PlaylistId>,
    loop_last_played: LastPlayedMap<LoopId>,
    effect_last_played: LastPlayedMap<EffectId>,
    playlist_last_played: LastPlayedMap<PlaylistId>,

    // Mix state
    volume: VolumeMixer,
    ducking: DuckingCoordinator,
    progress: ProgressTracker,

    // Collaborators
    sink: Arc<dyn AudioSink>,
    entitlements: Arc<dyn Entitlements>,

    // Event queue for UI synchronization
    pending_events: Vec<EngineEvent>,
}

impl PlaybackCoordinator {
    /// Create a coordinator from persisted configuration
    ///
    /// Pushes the configured gains to the audio collaborator so both
    /// sides agree on levels before anything plays.
    pub fn new(
        config: EngineConfig,
        sink: Arc<dyn AudioSink>,
        entitlements: Arc<dyn Entitlements>,
    ) -> Self {
        let volume = VolumeMixer::new(
            config.master_volume,
            config.music_volume,
            config.atmosphere_volume,
            config.effects_volume,
        );

        sink.set_gain(GainChannel::Master, volume.master());
        sink.set_gain(GainChannel::Music, volume.music());
        sink.set_gain(GainChannel::Atmosphere, volume.atmosphere());
        sink.set_gain(GainChannel::Effects, volume.effects());

        Self {
            loops: ChannelSet::new(),
            effects: ChannelSet::new(),
            playlist: PlaylistState::new(),
            loop_history: HistoryLog::new(config.history_size),
            effect_history: HistoryLog::new(config.history_size),
            playlist_history: HistoryLog::new(config.history_size),
            loop_last_played: LastPlayedMap::new(),
            effect_last_played: LastPlayedMap::new(),
            playlist_last_played: LastPlayedMap::new(),
            volume,
            ducking: DuckingCoordinator::new(config.ducking_enabled),
            progress: ProgressTracker::new(),
            sink,
            entitlements,
            pending_events: Vec::new(),
        }
    }

    // ===== Channel registry =====

    /// Toggle an atmosphere loop. Returns the new active state.
    pub fn toggle_loop(&mut self, id: &LoopId) -> bool {
        let was_active = self.loops.contains(id);
        let active = toggle_channel_item(
            self.sink.as_ref(),
            ChannelKind::Atmosphere,
            &mut self.loops,
            &mut self.loop_history,
            &mut self.loop_last_played,
            id,
        );
        if active != was_active {
            self.push(EngineEvent::LoopToggled {
                id: id.clone(),
                active,
            });
        }
        active
    }

    /// Toggle a sound effect. Returns the new active state.
    ///
    /// Every activation or deactivation re-derives the duck flag.
    pub fn toggle_effect(&mut self, id: &EffectId) -> bool {
        let was_active = self.effects.contains(id);
        let active = toggle_channel_item(
            self.sink.as_ref(),
            ChannelKind::Effect,
            &mut self.effects,
            &mut self.effect_history,
            &mut self.effect_last_played,
            id,
        );
        if active != was_active {
            self.push(EngineEvent::EffectToggled {
                id: id.clone(),
                active,
            });
        }
        self.refresh_ducking();
        active
    }

    /// Stop every atmosphere loop without touching history
    pub fn stop_all_loops(&mut self) {
        if self.loops.is_empty() {
            return;
        }
        self.sink.stop_all(ChannelKind::Atmosphere);
        self.loops.clear();
        self.push(EngineEvent::AllStopped {
            kind: ChannelKind::Atmosphere,
        });
    }

    /// Stop every sound effect without touching history
    pub fn stop_all_effects(&mut self) {
        if !self.effects.is_empty() {
            self.sink.stop_all(ChannelKind::Effect);
            self.effects.clear();
            self.push(EngineEvent::AllStopped {
                kind: ChannelKind::Effect,
            });
        }
        self.refresh_ducking();
    }

    /// Panic stop: silence every category
    pub fn stop_everything(&mut self) {
        self.stop_all_loops();
        self.stop_all_effects();
        if let Some(active) = self.playlist.deactivate() {
            self.sink.stop(ChannelKind::Music, active.as_ref());
            self.progress.reset();
            self.push(EngineEvent::PlaylistChanged { id: None });
        }
    }

    /// Check whether a loop is active
    pub fn is_loop_active(&self, id: &LoopId) -> bool {
        self.loops.contains(id)
    }

    /// Check whether an effect is active
    pub fn is_effect_active(&self, id: &EffectId) -> bool {
        self.effects.contains(id)
    }

    /// The currently active playlist, if any
    pub fn active_playlist(&self) -> Option<&PlaylistId> {
        self.playlist.active()
    }

    // ===== Playlist lifecycle =====

    /// Resolve the synchronous half of a playlist toggle
    ///
    /// Toggling the active item deactivates it; a repeat request for
    /// the in-flight target (or the still-active item mid-start) is a
    /// guarded no-op. Requesting a *different* item while a start is
    /// suspended supersedes it: the older completion will be discarded
    /// when it is handed back.
    ///
    /// A `Pending` result carries the issued start. Run it to
    /// completion, then apply it with [`Self::finish_playlist_start`];
    /// the coordinator stays free in between, so newer toggles can
    /// land while the collaborator fetches.
    pub fn begin_playlist_toggle(&mut self, item: &LibraryItem) -> Result<PlaylistToggle> {
        if item.kind != ChannelKind::Music {
            return Err(EngineError::NotMusic(item.id.clone()));
        }
        let id = PlaylistId::new(item.id.clone());

        if self.playlist.is_starting() {
            // The guard covers both the in-flight target and the still-
            // active item until the start resolves
            if self.playlist.starting_id() == Some(&id) || self.playlist.active() == Some(&id) {
                return Ok(PlaylistToggle::Done(PlaylistOutcome::AlreadyStarting));
            }
        } else if self.playlist.active() == Some(&id) {
            self.sink.stop(ChannelKind::Music, id.as_ref());
            self.playlist.deactivate();
            self.progress.reset();
            self.push(EngineEvent::PlaylistChanged { id: None });
            return Ok(PlaylistToggle::Done(PlaylistOutcome::Stopped));
        }

        // Entitlement gate, before any state mutation
        if !item.is_local && !self.entitlements.allows_remote_playback() {
            debug!(playlist = %id, "remote playback gated; asking to upgrade");
            return Ok(PlaylistToggle::Done(PlaylistOutcome::UpgradeRequired));
        }

        let Some(token) = self.playlist.begin_start(id.clone()) else {
            return Ok(PlaylistToggle::Done(PlaylistOutcome::AlreadyStarting));
        };

        // Capture rollback state, then silence the current item while
        // the new one starts
        let prev_active = self.playlist.active().cloned();
        let prev_playing = self.playlist.is_playing();
        if let Some(prev) = &prev_active {
            self.sink.stop(ChannelKind::Music, prev.as_ref());
            self.playlist.set_playing(false);
        }

        Ok(PlaylistToggle::Pending(PendingStart {
            token,
            id,
            prev_active,
            prev_playing,
            sink: Arc::clone(&self.sink),
        }))
    }

    /// Apply a finished playlist start
    ///
    /// A completion carrying a stale token lost to a newer toggle: its
    /// audio (if any) is silenced and the result discarded. A current
    /// failure rolls state back to pre-attempt values and resumes the
    /// previous item.
    pub fn finish_playlist_start(&mut self, completion: StartCompletion) -> PlaylistOutcome {
        let StartCompletion {
            token,
            id,
            prev_active,
            prev_playing,
            started,
        } = completion;

        if !started {
            if !self.playlist.abort_start(token) {
                return PlaylistOutcome::Superseded;
            }
            warn!(playlist = %id, "audio collaborator failed to start playlist");
            self.playlist.restore(prev_active.clone(), prev_playing);
            if let Some(prev) = &prev_active {
                if prev_playing && !self.sink.play(ChannelKind::Music, prev.as_ref()) {
                    warn!(playlist = %prev, "could not resume previous playlist after rollback");
                }
            }
            self.push(EngineEvent::PlaylistStartFailed { id });
            return PlaylistOutcome::Failed;
        }

        if !self.playlist.commit_start(token) {
            // A newer request won while this one was suspended; silence
            // the orphaned start and discard
            self.sink.stop(ChannelKind::Music, id.as_ref());
            return PlaylistOutcome::Superseded;
        }

        self.playlist_history.record(id.clone());
        self.playlist_last_played.stamp(id.clone(), Utc::now());
        self.progress.begin(Duration::ZERO, Instant::now());
        debug!(playlist = %id, "playlist activated");
        self.push(EngineEvent::PlaylistChanged { id: Some(id) });
        PlaylistOutcome::Started
    }

    /// Toggle a playlist item, driving any issued start inline
    ///
    /// Convenience for callers that never interleave toggles. Holding
    /// the coordinator across the await serializes requests; callers
    /// that want a newer toggle to supersede a suspended start use the
    /// split [`Self::begin_playlist_toggle`] /
    /// [`Self::finish_playlist_start`] protocol directly.
    pub async fn toggle_playlist(&mut self, item: &LibraryItem) -> Result<PlaylistOutcome> {
        match self.begin_playlist_toggle(item)? {
            PlaylistToggle::Done(outcome) => Ok(outcome),
            PlaylistToggle::Pending(pending) => {
                let completion = pending.run().await;
                Ok(self.finish_playlist_start(completion))
            }
        }
    }

    // ===== Ducking =====

    /// Enable or disable ducking
    pub fn set_ducking_enabled(&mut self, enabled: bool) {
        if let Some(active) = self.ducking.set_enabled(enabled) {
            self.sink.set_duck_active(active);
            self.push(EngineEvent::DuckingChanged { active });
        }
    }

    /// Whether ducking attenuation is currently active
    pub fn is_duck_active(&self) -> bool {
        self.ducking.is_active()
    }

    fn refresh_ducking(&mut self) {
        if let Some(active) = self.ducking.set_sfx_active(!self.effects.is_empty()) {
            self.sink.set_duck_active(active);
            self.push(EngineEvent::DuckingChanged { active });
        }
    }

    // ===== Volume =====

    /// Set the master level; propagates to the sink and system mixer
    pub fn set_master_volume(&mut self, value: f32) {
        let value = self.volume.set_master(value);
        self.sink.set_gain(GainChannel::Master, value);
        self.sink.set_system_volume(value);
        self.push(EngineEvent::VolumeChanged {
            channel: GainChannel::Master,
            value,
        });
    }

    /// Set the music level
    pub fn set_music_volume(&mut self, value: f32) {
        let value = self.volume.set_music(value);
        self.sink.set_gain(GainChannel::Music, value);
        self.push(EngineEvent::VolumeChanged {
            channel: GainChannel::Music,
            value,
        });
    }

    /// Set the atmosphere level
    pub fn set_atmosphere_volume(&mut self, value: f32) {
        let value = self.volume.set_atmosphere(value);
        self.sink.set_gain(GainChannel::Atmosphere, value);
        self.push(EngineEvent::VolumeChanged {
            channel: GainChannel::Atmosphere,
            value,
        });
    }

    /// Set the effects level
    pub fn set_effects_volume(&mut self, value: f32) {
        let value = self.volume.set_effects(value);
        self.sink.set_gain(GainChannel::Effects, value);
        self.push(EngineEvent::VolumeChanged {
            channel: GainChannel::Effects,
            value,
        });
    }

    /// Toggle master mute
    pub fn toggle_mute(&mut self) {
        let value = self.volume.toggle_mute();
        self.sink.set_gain(GainChannel::Master, value);
        self.sink.set_system_volume(value);
        self.push(EngineEvent::VolumeChanged {
            channel: GainChannel::Master,
            value,
        });
    }

    /// Ingest a system-volume change event
    ///
    /// Deltas within the sync epsilon are dropped (our own write echoed
    /// back); genuine changes update master and the sink gain but are
    /// never pushed back out to the system.
    pub fn handle_system_volume(&mut self, value: f32) {
        if let Some(master) = self.volume.sync_from_system(value) {
            self.sink.set_gain(GainChannel::Master, master);
            self.push(EngineEvent::VolumeChanged {
                channel: GainChannel::Master,
                value: master,
            });
        }
    }

    /// Poll the sink for the current system volume and sync from it
    pub fn poll_system_volume(&mut self) {
        if let Some(value) = self.sink.system_volume() {
            self.handle_system_volume(value);
        }
    }

    /// Current master level
    pub fn master_volume(&self) -> f32 {
        self.volume.master()
    }

    // ===== Progress =====

    /// Ingest a progress snapshot from the audio collaborator
    pub fn report_progress(&mut self, position: Duration, duration: Duration, is_playing: bool) {
        if !self.progress.is_active() {
            return;
        }
        let was_playing = self.playlist.is_playing();
        self.progress
            .update(position, duration, is_playing, Instant::now());
        self.playlist.set_playing(is_playing);
        if was_playing != is_playing && self.playlist.active().is_some() {
            self.push(EngineEvent::PlaylistPlayingChanged { is_playing });
        }
    }

    /// Begin a scrub transaction. Guarded no-op with no tracked item.
    pub fn begin_scrub(&mut self) {
        if !self.progress.is_active() {
            return;
        }
        self.progress.begin_scrub(Instant::now());
    }

    /// Update the scrub value; issues a throttled pre-seek to the sink
    pub fn update_scrub(&mut self, position: Duration) -> Result<()> {
        if self.progress.update_scrub(position, Instant::now())? {
            self.sink.seek(position);
        }
        Ok(())
    }

    /// Commit the scrub, seek the sink, and resume extrapolation
    pub fn end_scrub(&mut self, position: Duration) -> Result<Duration> {
        let committed = self.progress.end_scrub(position, Instant::now())?;
        self.sink.seek(committed);
        self.push(EngineEvent::Seeked {
            position_ms: committed.as_millis() as u64,
        });
        Ok(committed)
    }

    /// The position to display right now
    pub fn displayed_progress(&self) -> Duration {
        self.progress.displayed(Instant::now())
    }

    /// Remaining time, `None` when the duration is unknown
    pub fn remaining_progress(&self) -> Option<Duration> {
        self.progress.remaining(Instant::now())
    }

    // ===== Recency =====

    /// Non-bookmarked recent loops, playing items first
    pub fn recent_loops<B, C>(&self, is_bookmarked: B, in_catalog: C) -> Vec<LoopId>
    where
        B: Fn(&LoopId) -> bool,
        C: Fn(&LoopId) -> bool,
    {
        recency::recent_list(&self.loop_history, &self.loops, is_bookmarked, in_catalog)
    }

    /// Non-bookmarked recent effects, playing items first
    pub fn recent_effects<B, C>(&self, is_bookmarked: B, in_catalog: C) -> Vec<EffectId>
    where
        B: Fn(&EffectId) -> bool,
        C: Fn(&EffectId) -> bool,
    {
        recency::recent_list(
            &self.effect_history,
            &self.effects,
            is_bookmarked,
            in_catalog,
        )
    }

    /// Non-bookmarked recent playlists, the active one first
    pub fn recent_playlists<B, C>(&self, is_bookmarked: B, in_catalog: C) -> Vec<PlaylistId>
    where
        B: Fn(&PlaylistId) -> bool,
        C: Fn(&PlaylistId) -> bool,
    {
        recency::playlist_recent_list(
            &self.playlist_history,
            self.playlist.active(),
            is_bookmarked,
            in_catalog,
        )
    }

    /// Forget a loop's history and last-played stamp
    pub fn forget_loop(&mut self, id: &LoopId) {
        self.loop_history.forget(id);
        self.loop_last_played.forget(id);
    }

    /// Forget an effect's history and last-played stamp
    pub fn forget_effect(&mut self, id: &EffectId) {
        self.effect_history.forget(id);
        self.effect_last_played.forget(id);
    }

    /// Forget a playlist's history and last-played stamp
    pub fn forget_playlist(&mut self, id: &PlaylistId) {
        self.playlist_history.forget(id);
        self.playlist_last_played.forget(id);
    }

    /// Last-played stamp for a loop
    pub fn loop_last_played(&self, id: &LoopId) -> Option<DateTime<Utc>> {
        self.loop_last_played.get(id)
    }

    /// Last-played stamp for an effect
    pub fn effect_last_played(&self, id: &EffectId) -> Option<DateTime<Utc>> {
        self.effect_last_played.get(id)
    }

    /// Last-played stamp for a playlist
    pub fn playlist_last_played(&self, id: &PlaylistId) -> Option<DateTime<Utc>> {
        self.playlist_last_played.get(id)
    }

    // ===== Observation =====

    /// Immutable snapshot of the whole engine
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            active_loops: self.loops.sorted(),
            active_effects: self.effects.sorted(),
            playlist: PlaylistSnapshot {
                active: self.playlist.active().cloned(),
                is_playing: self.playlist.is_playing(),
                is_starting: self.playlist.is_starting(),
            },
            volumes: VolumeSnapshot {
                master: self.volume.master(),
                music: self.volume.music(),
                atmosphere: self.volume.atmosphere(),
                effects: self.volume.effects(),
                is_muted: self.volume.is_muted(),
            },
            duck_active: self.ducking.is_active(),
            ducking_enabled: self.ducking.is_enabled(),
            progress: self.progress_snapshot(),
        }
    }

    /// Progress view alone
    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        self.progress.snapshot(Instant::now())
    }

    /// Drain pending events for UI synchronization
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push(&mut self, event: EngineEvent) {
        self.pending_events.push(event);
    }
}
