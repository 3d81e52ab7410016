// ABOUTME: Persisted favorites store keyed by movie id, with duplicate suppression and sorted views.
// ABOUTME: Every mutation is written through to the storage slot; notifications are deduplicated per action.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::dates::parse_release_date;
use crate::models::Item;
use crate::storage::Storage;

/// Repeated notifications for the same action and id are dropped inside this window.
///
/// Only the most recent notification is remembered, so the window catches
/// back-to-back repeats of the same action. A store never emits `Added` twice
/// in a row for one id through its own mutations; the window matters for
/// records seeded with a prior notice and for callers replaying actions.
pub const NOTIFICATION_DEDUP_WINDOW: Duration = Duration::from_secs(1);

/// What happened to a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Added,
    Removed,
}

/// One-shot UI feedback emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub id: i64,
    pub title: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NotificationKind::Added => write!(f, "Added \"{}\" to favorites", self.title),
            NotificationKind::Removed => write!(f, "Removed \"{}\" from favorites", self.title),
        }
    }
}

/// Ordering applied by [`FavoritesStore::list_sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    #[default]
    TitleAsc,
    TitleDesc,
    RatingAsc,
    RatingDesc,
    DateAsc,
    DateDesc,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 6] = [
        SortCriterion::TitleAsc,
        SortCriterion::TitleDesc,
        SortCriterion::RatingAsc,
        SortCriterion::RatingDesc,
        SortCriterion::DateAsc,
        SortCriterion::DateDesc,
    ];

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortCriterion::TitleAsc => compare_titles(a, b),
            SortCriterion::TitleDesc => compare_titles(b, a),
            SortCriterion::RatingAsc => a.rating.total_cmp(&b.rating),
            SortCriterion::RatingDesc => b.rating.total_cmp(&a.rating),
            SortCriterion::DateAsc => compare_dates(a, b),
            SortCriterion::DateDesc => compare_dates(b, a),
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortCriterion::TitleAsc => "title-asc",
            SortCriterion::TitleDesc => "title-desc",
            SortCriterion::RatingAsc => "rating-asc",
            SortCriterion::RatingDesc => "rating-desc",
            SortCriterion::DateAsc => "date-asc",
            SortCriterion::DateDesc => "date-desc",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "title-asc" | "titleasc" | "title" => Ok(SortCriterion::TitleAsc),
            "title-desc" | "titledesc" => Ok(SortCriterion::TitleDesc),
            "rating-asc" | "ratingasc" => Ok(SortCriterion::RatingAsc),
            "rating-desc" | "ratingdesc" | "rating" => Ok(SortCriterion::RatingDesc),
            "date-asc" | "dateasc" => Ok(SortCriterion::DateAsc),
            "date-desc" | "datedesc" | "date" => Ok(SortCriterion::DateDesc),
            _ => Err(format!("unknown sort criterion: {}", s)),
        }
    }
}

/// Case-insensitive first, exact comparison as tiebreak.
fn compare_titles(a: &Item, b: &Item) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

/// Unknown dates sort before every known date.
fn compare_dates(a: &Item, b: &Item) -> Ordering {
    parse_release_date(&a.release_date).cmp(&parse_release_date(&b.release_date))
}

/// Favorites kept in insertion order, unique by id.
pub struct FavoritesStore<S: Storage> {
    storage: S,
    entries: Vec<Item>,
    ids: HashSet<i64>,
    last_notice: Option<(NotificationKind, i64, Instant)>,
    pending: Vec<Notification>,
}

impl<S: Storage> FavoritesStore<S> {
    /// Loads the store from `storage`.
    ///
    /// A missing, unreadable or malformed slot yields an empty store.
    pub fn open(storage: S) -> Self {
        let entries = match storage.load() {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Item>>(&blob) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "favorites slot is malformed; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read favorites slot; starting empty");
                Vec::new()
            }
        };

        let mut ids = HashSet::with_capacity(entries.len());
        let entries: Vec<Item> = entries.into_iter().filter(|i| ids.insert(i.id)).collect();
        debug!(count = entries.len(), "favorites loaded");

        Self {
            storage,
            entries,
            ids,
            last_notice: None,
            pending: Vec::new(),
        }
    }

    /// Adds `item` unless its id is already present. Returns whether it was inserted.
    pub fn add(&mut self, item: Item) -> bool {
        self.add_at(item, Instant::now())
    }

    pub fn add_at(&mut self, item: Item, now: Instant) -> bool {
        self.insert(item, now, true)
    }

    /// Removes the entry for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        self.remove_at(id, Instant::now())
    }

    pub fn remove_at(&mut self, id: i64, now: Instant) -> bool {
        self.delete(id, now, true)
    }

    /// Removes `item` if present, otherwise adds it. Returns whether it is now a favorite.
    pub fn toggle(&mut self, item: Item) -> bool {
        self.toggle_at(item, Instant::now())
    }

    pub fn toggle_at(&mut self, item: Item, now: Instant) -> bool {
        if self.ids.contains(&item.id) {
            self.delete(item.id, now, false);
            false
        } else {
            self.insert(item, now, false);
            true
        }
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.entries.iter().find(|i| i.id == id)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Item] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a sorted copy of the entries; stored order is left as is.
    pub fn list_sorted(&self, criterion: SortCriterion) -> Vec<Item> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| criterion.compare(a, b));
        sorted
    }

    /// Takes all notifications emitted since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn insert(&mut self, item: Item, now: Instant, dedup: bool) -> bool {
        if !self.ids.insert(item.id) {
            return false;
        }
        let notice = Notification {
            kind: NotificationKind::Added,
            id: item.id,
            title: item.title.clone(),
        };
        self.entries.push(item);
        self.persist();
        self.notify(notice, now, dedup);
        true
    }

    fn delete(&mut self, id: i64, now: Instant, dedup: bool) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        let Some(pos) = self.entries.iter().position(|i| i.id == id) else {
            return false;
        };
        let removed = self.entries.remove(pos);
        self.persist();
        self.notify(
            Notification {
                kind: NotificationKind::Removed,
                id,
                title: removed.title,
            },
            now,
            dedup,
        );
        true
    }

    fn notify(&mut self, notice: Notification, now: Instant, dedup: bool) {
        if dedup {
            if let Some((kind, id, at)) = self.last_notice {
                if kind == notice.kind
                    && id == notice.id
                    && now.saturating_duration_since(at) < NOTIFICATION_DEDUP_WINDOW
                {
                    debug!(id, ?kind, "duplicate favorites notification suppressed");
                    return;
                }
            }
        }
        self.last_notice = Some((notice.kind, notice.id, now));
        self.pending.push(notice);
    }

    /// Best-effort write-through; the in-memory state stays authoritative on failure.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to encode favorites");
                return;
            }
        };
        if let Err(e) = self.storage.save(&blob) {
            warn!(error = %e, "failed to persist favorites");
        }
    }
}
