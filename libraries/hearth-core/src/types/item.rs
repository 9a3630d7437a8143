//! Library item types shared between the engine and its collaborators

use serde::{Deserialize, Serialize};

/// Sound category
///
/// Determines playback semantics: atmospheres and effects are
/// multi-select toggle sets, music allows one active playlist at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Continuously looping ambient sound, multiple may play at once
    Atmosphere,

    /// One-shot/repeatable sound effect, multiple may play at once
    Effect,

    /// Background music playlist, at most one active
    Music,
}

/// Independent gain channel in the mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GainChannel {
    /// Master output level, synced with the system volume
    Master,

    /// Music playlist level
    Music,

    /// Atmosphere loop level
    Atmosphere,

    /// Sound effect level
    Effects,
}

/// A catalog entry as seen by the playback engine
///
/// The engine never stores these; it fetches them from the catalog
/// collaborator and uses them to filter recency lists and resolve titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Catalog identifier (raw string, category determines the ID newtype)
    pub id: String,

    /// Display title
    pub title: String,

    /// Sound category
    pub kind: ChannelKind,

    /// Whether the audio lives on disk or must be streamed
    pub is_local: bool,
}

impl LibraryItem {
    /// Create a new library item
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            is_local: true,
        }
    }

    /// Mark this item as a remote (streamed) source
    pub fn remote(mut self) -> Self {
        self.is_local = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_item_defaults_to_local() {
        let item = LibraryItem::new("rain", "Heavy Rain", ChannelKind::Atmosphere);
        assert!(item.is_local);
        assert_eq!(item.title, "Heavy Rain");
    }

    #[test]
    fn remote_builder_flips_locality() {
        let item = LibraryItem::new("ost", "Battle OST", ChannelKind::Music).remote();
        assert!(!item.is_local);
    }
}
