// ABOUTME: Core state engine for browsing movie listings.
// ABOUTME: Provides paginated fetching, infinite scroll, debounced search, favorites and details loading.

pub mod controller;
pub mod dates;
pub mod debounce;
pub mod details;
pub mod error;
pub mod favorites;
pub mod feed;
pub mod format;
pub mod images;
pub mod models;
pub mod source;
pub mod storage;
pub mod trigger;

pub use controller::{
    FetchMode, ListingController, PageRequest, PageState, Phase, Query, SearchTerm,
};
pub use dates::parse_release_date;
pub use debounce::{Debouncer, SEARCH_QUIET_PERIOD};
pub use details::{DetailsLoader, DetailsState};
pub use error::{FetchError, StorageError};
pub use favorites::{
    FavoritesStore, Notification, NotificationKind, SortCriterion, NOTIFICATION_DEDUP_WINDOW,
};
pub use feed::{Feed, SearchFeed};
pub use format::{format_date, format_rating, format_runtime, release_year, truncate_text};
pub use images::{BackdropSize, ImageUrls, PosterSize, DEFAULT_IMAGE_BASE};
pub use models::{Genre, Item, ItemDetails, MoviePage};
pub use source::MovieSource;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use trigger::{
    InfiniteScroll, LoadingIndicator, ScrollTrigger, Viewport, VisibilityObserver,
    MIN_INDICATOR_DELAY,
};
