//! Recency list construction
//!
//! Pure functions that compose the bounded "recent" display lists from
//! play history, live playback state, and bookmark membership. One
//! generic path serves loops and effects; the playlist category gets a
//! singleton wrapper over the same slots/fill/concat contract.
//!
//! Bookmarked items never appear here: they are rendered as a
//! separate, always-fully-shown list in user-controlled order.

use crate::channels::ChannelSet;
use crate::history::HistoryLog;
use hearth_core::PlaylistId;
use std::hash::Hash;

/// Display cap for the recent list
///
/// This is a floor-guarantee, not a hard cap: the currently-playing
/// partition is never truncated, because active items must always be
/// visible. Only the history fill is limited by the remaining slots.
pub const RECENT_CAP: usize = 6;

/// Build the non-bookmarked recent list for a multi-select category
///
/// Rules, applied in order:
/// 1. Currently-active, non-bookmarked, in-catalog ids come first,
///    ordered by history position; actives never recorded in history
///    are appended in lexicographic order.
/// 2. Remaining slots (`RECENT_CAP` minus the playing partition, floor
///    zero) are filled from history order, skipping ids that are
///    playing, bookmarked, or gone from the catalog.
pub fn recent_list<Id, B, C>(
    history: &HistoryLog<Id>,
    active: &ChannelSet<Id>,
    is_bookmarked: B,
    in_catalog: C,
) -> Vec<Id>
where
    Id: Clone + Eq + Hash + Ord,
    B: Fn(&Id) -> bool,
    C: Fn(&Id) -> bool,
{
    let mut playing: Vec<Id> = active
        .iter()
        .filter(|id| !is_bookmarked(id) && in_catalog(id))
        .cloned()
        .collect();

    // History position first; ids never recorded sort after all
    // recorded ones, lexicographically among themselves
    playing.sort_by(|a, b| match (history.position(a), history.position(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    });

    let slots_remaining = RECENT_CAP.saturating_sub(playing.len());

    let fill = history
        .iter()
        .filter(|id| !active.contains(id) && !is_bookmarked(id) && in_catalog(id))
        .take(slots_remaining)
        .cloned();

    playing.extend(fill);
    playing
}

/// Build the recent list for the playlist category
///
/// The playing partition degenerates to the single optional active id;
/// slots, fill, and concatenation work exactly as in [`recent_list`].
pub fn playlist_recent_list<B, C>(
    history: &HistoryLog<PlaylistId>,
    active: Option<&PlaylistId>,
    is_bookmarked: B,
    in_catalog: C,
) -> Vec<PlaylistId>
where
    B: Fn(&PlaylistId) -> bool,
    C: Fn(&PlaylistId) -> bool,
{
    let mut list: Vec<PlaylistId> = active
        .filter(|id| !is_bookmarked(id) && in_catalog(id))
        .cloned()
        .into_iter()
        .collect();

    let slots_remaining = RECENT_CAP.saturating_sub(list.len());

    let fill = history
        .iter()
        .filter(|id| Some(*id) != active && !is_bookmarked(id) && in_catalog(id))
        .take(slots_remaining)
        .cloned();

    list.extend(fill);
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(ids: &[&str]) -> HistoryLog<String> {
        // Record oldest first so the slice reads most-recent-first
        let mut log = HistoryLog::new(30);
        for id in ids.iter().rev() {
            log.record((*id).to_string());
        }
        log
    }

    fn set(ids: &[&str]) -> ChannelSet<String> {
        let mut set = ChannelSet::new();
        for id in ids {
            set.toggle((*id).to_string());
        }
        set
    }

    #[test]
    fn playing_item_leads_and_is_excluded_from_fill() {
        // History A,B,C (A most recent), B active
        let list = recent_list(&log(&["A", "B", "C"]), &set(&["B"]), |_| false, |_| true);
        assert_eq!(list, vec!["B", "A", "C"]);
    }

    #[test]
    fn playing_partition_ordered_by_history_position() {
        let list = recent_list(
            &log(&["C", "A", "B"]),
            &set(&["A", "B", "C"]),
            |_| false,
            |_| true,
        );
        assert_eq!(list, vec!["C", "A", "B"]);
    }

    #[test]
    fn unrecorded_actives_append_lexicographically() {
        // "Z" and "M" are active but never played before
        let list = recent_list(
            &log(&["A"]),
            &set(&["Z", "A", "M"]),
            |_| false,
            |_| true,
        );
        assert_eq!(list, vec!["A", "M", "Z"]);
    }

    #[test]
    fn fill_is_truncated_to_remaining_slots() {
        let history = log(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let list = recent_list(&history, &set(&["H"]), |_| false, |_| true);

        assert_eq!(list.len(), RECENT_CAP);
        assert_eq!(list, vec!["H", "A", "B", "C", "D", "E"]);
    }

    #[test]
    fn playing_partition_may_exceed_cap() {
        // Seven simultaneously active items: all stay visible
        let active = set(&["A", "B", "C", "D", "E", "F", "G"]);
        let list = recent_list(&log(&[]), &active, |_| false, |_| true);

        assert_eq!(list.len(), 7);
        // No slots remain, so no history fill
        let list2 = recent_list(&log(&["X", "Y"]), &active, |_| false, |_| true);
        assert_eq!(list2.len(), 7);
        assert!(!list2.contains(&"X".to_string()));
    }

    #[test]
    fn bookmarked_items_are_excluded_everywhere() {
        let bookmarked = |id: &String| id == "A" || id == "B";
        let list = recent_list(
            &log(&["A", "C", "D"]),
            &set(&["B", "C"]),
            bookmarked,
            |_| true,
        );
        assert_eq!(list, vec!["C", "D"]);
    }

    #[test]
    fn items_gone_from_catalog_are_excluded() {
        let in_catalog = |id: &String| id != "B";
        let list = recent_list(
            &log(&["A", "B", "C"]),
            &set(&["B"]),
            |_| false,
            in_catalog,
        );
        assert_eq!(list, vec!["A", "C"]);
    }

    #[test]
    fn playlist_singleton_leads_its_list() {
        let mut history = HistoryLog::new(30);
        for id in ["c", "b", "a"] {
            history.record(PlaylistId::new(id));
        }
        let active = PlaylistId::new("b");

        let list = playlist_recent_list(&history, Some(&active), |_| false, |_| true);
        assert_eq!(
            list,
            vec![
                PlaylistId::new("b"),
                PlaylistId::new("a"),
                PlaylistId::new("c")
            ]
        );
    }

    #[test]
    fn playlist_list_without_active_is_plain_history() {
        let mut history = HistoryLog::new(30);
        for id in ["b", "a"] {
            history.record(PlaylistId::new(id));
        }

        let list = playlist_recent_list(&history, None, |_| false, |_| true);
        assert_eq!(list, vec![PlaylistId::new("a"), PlaylistId::new("b")]);
    }

    #[test]
    fn playlist_fill_respects_cap() {
        let mut history = HistoryLog::new(30);
        for i in (0..10).rev() {
            history.record(PlaylistId::new(format!("p{i}")));
        }

        let active = PlaylistId::new("p9");
        let list = playlist_recent_list(&history, Some(&active), |_| false, |_| true);
        assert_eq!(list.len(), RECENT_CAP);
        assert_eq!(list[0], PlaylistId::new("p9"));
    }
}
