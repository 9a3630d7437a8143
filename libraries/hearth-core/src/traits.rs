/// Core traits for Hearth
use crate::error::Result;
use crate::types::{ChannelKind, GainChannel, LibraryItem};
use async_trait::async_trait;
use std::time::Duration;

/// Audio output collaborator
///
/// The playback engine decides *what* should be audible and at what
/// relative levels; implementers own decoding, mixing, and the actual
/// hardware path. Failures are reported through `bool`/`Option` return
/// values; the engine treats a `false`/`None` as "nothing audible
/// changed" and rolls back its own state, so implementers must never
/// panic to signal a playback problem.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start playing an item. Returns false if playback could not start.
    fn play(&self, kind: ChannelKind, id: &str) -> bool;

    /// Stop a playing item
    fn stop(&self, kind: ChannelKind, id: &str);

    /// Stop everything in a category
    fn stop_all(&self, kind: ChannelKind);

    /// Set the gain for one channel (already clamped to [0.0, 1.0])
    fn set_gain(&self, channel: GainChannel, value: f32);

    /// Enable or disable ducking attenuation of music/atmosphere
    ///
    /// The engine only calls this on actual transitions; implementers
    /// may start a fade on every call.
    fn set_duck_active(&self, active: bool);

    /// Seek the active playlist to a position from track start
    fn seek(&self, position: Duration);

    /// Read the current system output volume, if available
    fn system_volume(&self) -> Option<f32>;

    /// Push a master volume change out to the system mixer
    fn set_system_volume(&self, value: f32);

    /// Activate a playlist, fetching remote sources if needed
    ///
    /// This is the one suspending call in the engine; it may take
    /// arbitrarily long for non-local playlists. Returns false on
    /// failure.
    async fn start_playlist(&self, id: &str) -> bool;
}

/// Catalog/tag repository collaborator
///
/// A failed or empty lookup means "item not in library"; the engine
/// excludes such items from recency lists rather than surfacing the
/// error to the user.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch all items of a category
    async fn fetch_items(&self, kind: ChannelKind) -> Result<Vec<LibraryItem>>;

    /// Fetch a single item, `None` if it is not in the library
    async fn fetch_item(&self, kind: ChannelKind, id: &str) -> Result<Option<LibraryItem>>;

    /// Delete an item from the library
    async fn delete_item(&self, kind: ChannelKind, id: &str) -> Result<()>;
}

/// Bookmark store collaborator
///
/// Bookmarks are user-pinned items kept in an explicit, user-controlled
/// order per category. Bookmark membership is disjoint from playback
/// state: a bookmarked item may or may not be playing.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Check membership
    async fn is_bookmarked(&self, kind: ChannelKind, id: &str) -> Result<bool>;

    /// The persisted, user-ordered bookmark list for a category
    async fn bookmarks(&self, kind: ChannelKind) -> Result<Vec<String>>;

    /// Toggle membership. Returns the new membership state.
    async fn toggle(&self, kind: ChannelKind, id: &str) -> Result<bool>;

    /// Move a bookmark to a new position in the ordered list
    async fn reorder(&self, kind: ChannelKind, id: &str, to_index: usize) -> Result<()>;
}

/// Entitlement gate for premium features
///
/// Consulted before activating non-local playlists. A closed gate is
/// not an error; the engine degrades to an "upgrade required" outcome.
pub trait Entitlements: Send + Sync {
    /// Whether remote (streamed) playlist playback is permitted
    fn allows_remote_playback(&self) -> bool;
}
