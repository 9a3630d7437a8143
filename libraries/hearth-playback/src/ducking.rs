//! Ducking derivation
//!
//! Derives the externally-observed "duck active" flag from sound-effect
//! activity and the user toggle. The flag tells the audio collaborator
//! to attenuate music/atmosphere; the attenuation amount is the
//! collaborator's business.

use serde::{Deserialize, Serialize};

/// Duck-signal state machine
///
/// `duck_active = enabled && sfx_active`, recomputed whenever either
/// input changes. Transitions are edge-triggered: recomputing with
/// unchanged inputs yields no notification, so the collaborator never
/// re-triggers an audible fade redundantly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckingCoordinator {
    /// User toggle
    enabled: bool,

    /// Whether any sound effect is currently active
    sfx_active: bool,

    /// Last derived value handed to the collaborator
    duck_active: bool,
}

impl DuckingCoordinator {
    /// Create with the persisted user toggle; no effects active yet
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            sfx_active: false,
            duck_active: false,
        }
    }

    /// Update the user toggle
    ///
    /// Returns `Some(new_duck_active)` only when the derived flag
    /// actually flips.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<bool> {
        self.enabled = enabled;
        self.recompute()
    }

    /// Update the effect-activity input
    ///
    /// Returns `Some(new_duck_active)` only when the derived flag
    /// actually flips.
    pub fn set_sfx_active(&mut self, sfx_active: bool) -> Option<bool> {
        self.sfx_active = sfx_active;
        self.recompute()
    }

    /// Whether ducking is enabled by the user
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The currently derived duck flag
    pub fn is_active(&self) -> bool {
        self.duck_active
    }

    fn recompute(&mut self) -> Option<bool> {
        let derived = self.enabled && self.sfx_active;
        if derived == self.duck_active {
            return None;
        }
        self.duck_active = derived;
        Some(derived)
    }
}

impl Default for DuckingCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duck_requires_both_inputs() {
        let mut ducking = DuckingCoordinator::new(true);
        assert!(!ducking.is_active());

        assert_eq!(ducking.set_sfx_active(true), Some(true));
        assert!(ducking.is_active());

        assert_eq!(ducking.set_sfx_active(false), Some(false));
        assert!(!ducking.is_active());
    }

    #[test]
    fn disabled_ducking_never_activates() {
        let mut ducking = DuckingCoordinator::new(false);

        assert_eq!(ducking.set_sfx_active(true), None);
        assert!(!ducking.is_active());
    }

    #[test]
    fn disabling_mid_duck_releases() {
        let mut ducking = DuckingCoordinator::new(true);
        ducking.set_sfx_active(true);
        assert!(ducking.is_active());

        assert_eq!(ducking.set_enabled(false), Some(false));
        assert!(!ducking.is_active());

        // Re-enabling while effects still active re-ducks
        assert_eq!(ducking.set_enabled(true), Some(true));
    }

    #[test]
    fn unchanged_recompute_is_silent() {
        let mut ducking = DuckingCoordinator::new(true);
        ducking.set_sfx_active(true);

        // Same inputs again: no redundant notification
        assert_eq!(ducking.set_sfx_active(true), None);
        assert_eq!(ducking.set_enabled(true), None);
        assert!(ducking.is_active());
    }
}
