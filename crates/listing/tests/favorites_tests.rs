// ABOUTME: Integration tests for file-backed favorites and the details loader.
// ABOUTME: Uses temp directories for persistence and the in-memory source for details.

mod support;

use std::fs;

use marquee_listing::{
    DetailsLoader, DetailsState, FavoritesStore, FileStorage, NotificationKind, SortCriterion,
};
use pretty_assertions::assert_eq;
use support::{item, Call, StubSource};
use tempfile::TempDir;

#[test]
fn favorites_survive_reopening_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("favorites.json");

    {
        let mut store = FavoritesStore::open(FileStorage::new(&path));
        assert!(store.is_empty());
        assert!(store.add(item(3)));
        assert!(store.add(item(1)));
        assert!(!store.add(item(3)), "duplicate ids are ignored");
    }

    let store = FavoritesStore::open(FileStorage::new(&path));
    let ids: Vec<i64> = store.entries().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(store.get(1), Some(&item(1)));
}

#[test]
fn malformed_file_loads_empty_and_is_replaced_on_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.json");
    fs::write(&path, "{not json").unwrap();

    let mut store = FavoritesStore::open(FileStorage::new(&path));
    assert!(store.is_empty());

    store.toggle(item(7));
    let written = fs::read_to_string(&path).unwrap();
    let parsed: Vec<marquee_listing::Item> = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, vec![item(7)]);
}

#[test]
fn toggle_round_trip_emits_both_notifications() {
    let dir = TempDir::new().unwrap();
    let mut store = FavoritesStore::open(FileStorage::new(dir.path().join("f.json")));

    assert!(store.toggle(item(5)));
    assert!(!store.toggle(item(5)));
    assert!(!store.is_favorite(5));

    let kinds: Vec<NotificationKind> = store
        .drain_notifications()
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationKind::Added, NotificationKind::Removed]);
}

#[test]
fn sorted_views_leave_storage_order_alone() {
    let dir = TempDir::new().unwrap();
    let mut store = FavoritesStore::open(FileStorage::new(dir.path().join("f.json")));

    let mut zodiac = item(1);
    zodiac.title = "Zodiac".into();
    zodiac.rating = 7.7;
    let mut alien = item(2);
    alien.title = "alien".into();
    alien.rating = 8.5;
    let mut brazil = item(3);
    brazil.title = "Brazil".into();
    brazil.rating = 7.9;
    for it in [zodiac, alien, brazil] {
        store.add(it);
    }

    let titles = |c| {
        store
            .list_sorted(c)
            .into_iter()
            .map(|i| i.title)
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(SortCriterion::TitleAsc), vec!["alien", "Brazil", "Zodiac"]);
    assert_eq!(titles(SortCriterion::RatingDesc), vec!["alien", "Brazil", "Zodiac"]);
    assert_eq!(titles(SortCriterion::RatingAsc), vec!["Zodiac", "Brazil", "alien"]);

    let ids: Vec<i64> = store.entries().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn details_load_and_not_found() {
    let source = StubSource::new(1, 20).missing_id(404);
    let mut loader = DetailsLoader::new();
    assert_eq!(loader.state(), &DetailsState::Idle);

    loader.load(&source, 42).await;
    let details = loader.details().expect("details should load");
    assert_eq!(details.item.id, 42);
    assert_eq!(details.runtime, 118);
    assert_eq!(details.genre_names(), "Horror");

    loader.load(&source, 404).await;
    assert!(loader.details().is_none());
    assert!(loader.error().is_some_and(|e| e.is_not_found()));

    assert!(loader.retry(&source).await);
    assert_eq!(
        source.calls(),
        vec![Call::Details(42), Call::Details(404), Call::Details(404)]
    );
}

#[tokio::test]
async fn details_retry_without_request_is_a_noop() {
    let source = StubSource::new(1, 20);
    let mut loader = DetailsLoader::new();
    assert!(!loader.retry(&source).await);
    assert!(source.calls().is_empty());
}
