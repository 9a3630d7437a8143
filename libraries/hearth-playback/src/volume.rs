//! Volume mixing state
//!
//! Holds four independent gain channels (master, music, atmosphere,
//! effects) and the bidirectional master/system-volume sync rule. The
//! engine forwards raw per-channel levels to the audio collaborator;
//! it never computes a final multiplied gain itself.

use hearth_core::GainChannel;
use serde::{Deserialize, Serialize};

/// Minimum inbound system-volume delta that updates master
///
/// System volume observers echo our own writes back with float noise;
/// deltas inside this band are dropped to avoid feedback oscillation.
pub const SYSTEM_VOLUME_EPSILON: f32 = 0.0005;

/// Level restored when unmuting from a manually-dragged zero
const UNMUTE_FALLBACK: f32 = 0.5;

/// Four-channel volume state with master mute handling
///
/// All setters clamp to [0.0, 1.0]; out-of-range input is a UI gesture
/// artifact, not an error.
///
/// Mute is asymmetric by contract: a programmatic mute remembers the
/// pre-mute master level and restores it, while unmuting after the user
/// dragged the slider to zero restores a 0.5 fallback instead. The two
/// zero states are distinguished by `was_programmatic_mute`, which is
/// reset on every value change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMixer {
    master: f32,
    music: f32,
    atmosphere: f32,
    effects: f32,

    /// Master level saved by the last programmatic mute
    pre_mute_master: f32,

    /// Whether the current zero master came from `toggle_mute`
    was_programmatic_mute: bool,
}

impl VolumeMixer {
    /// Create a mixer with initial per-channel levels (clamped)
    pub fn new(master: f32, music: f32, atmosphere: f32, effects: f32) -> Self {
        Self {
            master: master.clamp(0.0, 1.0),
            music: music.clamp(0.0, 1.0),
            atmosphere: atmosphere.clamp(0.0, 1.0),
            effects: effects.clamp(0.0, 1.0),
            pre_mute_master: UNMUTE_FALLBACK,
            was_programmatic_mute: false,
        }
    }

    /// Set the master level. Returns the clamped value stored.
    pub fn set_master(&mut self, value: f32) -> f32 {
        self.master = value.clamp(0.0, 1.0);
        self.was_programmatic_mute = false;
        self.master
    }

    /// Set the music level. Returns the clamped value stored.
    pub fn set_music(&mut self, value: f32) -> f32 {
        self.music = value.clamp(0.0, 1.0);
        self.music
    }

    /// Set the atmosphere level. Returns the clamped value stored.
    pub fn set_atmosphere(&mut self, value: f32) -> f32 {
        self.atmosphere = value.clamp(0.0, 1.0);
        self.atmosphere
    }

    /// Set the effects level. Returns the clamped value stored.
    pub fn set_effects(&mut self, value: f32) -> f32 {
        self.effects = value.clamp(0.0, 1.0);
        self.effects
    }

    /// Get a channel level
    pub fn level(&self, channel: GainChannel) -> f32 {
        match channel {
            GainChannel::Master => self.master,
            GainChannel::Music => self.music,
            GainChannel::Atmosphere => self.atmosphere,
            GainChannel::Effects => self.effects,
        }
    }

    /// Get the master level
    pub fn master(&self) -> f32 {
        self.master
    }

    /// Get the music level
    pub fn music(&self) -> f32 {
        self.music
    }

    /// Get the atmosphere level
    pub fn atmosphere(&self) -> f32 {
        self.atmosphere
    }

    /// Get the effects level
    pub fn effects(&self) -> f32 {
        self.effects
    }

    /// Whether the master output is silent
    pub fn is_muted(&self) -> bool {
        self.master == 0.0
    }

    /// Ingest a system-volume change event
    ///
    /// Returns the new master level if it actually moved, or `None`
    /// when the delta is within [`SYSTEM_VOLUME_EPSILON`] (our own
    /// write echoed back). Inbound updates never propagate back out.
    pub fn sync_from_system(&mut self, value: f32) -> Option<f32> {
        let value = value.clamp(0.0, 1.0);
        if (value - self.master).abs() <= SYSTEM_VOLUME_EPSILON {
            return None;
        }
        self.master = value;
        self.was_programmatic_mute = false;
        Some(self.master)
    }

    /// Toggle master mute
    ///
    /// Returns the new master level. Muting saves the current level;
    /// unmuting restores it, unless the zero came from the user
    /// dragging the slider down, in which case 0.5 is restored.
    pub fn toggle_mute(&mut self) -> f32 {
        if self.was_programmatic_mute {
            self.master = self.pre_mute_master;
            self.was_programmatic_mute = false;
        } else if self.master == 0.0 {
            // Manual zero: no meaningful saved level to return to
            self.master = UNMUTE_FALLBACK;
        } else {
            self.pre_mute_master = self.master;
            self.master = 0.0;
            self.was_programmatic_mute = true;
        }
        self.master
    }
}

impl Default for VolumeMixer {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}
