//! Error types for the playback coordination engine

use thiserror::Error;

/// Engine errors
///
/// Kept deliberately small: guarded no-ops (double playlist start,
/// redundant ducking recompute) are `Ok` values, and out-of-range
/// volume input is clamped rather than rejected. Only genuine
/// contract violations surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A playlist operation was issued for a non-music item
    #[error("Not a music item: {0}")]
    NotMusic(String),

    /// Scrub operation issued outside an active scrub transaction
    #[error("No scrub in progress")]
    NoScrubInProgress,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
