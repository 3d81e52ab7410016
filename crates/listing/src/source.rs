// ABOUTME: The collaborator contract the listing core fetches movies through.
// ABOUTME: Implemented by the HTTP proxy client and by in-memory doubles in tests.

use crate::error::FetchError;
use crate::models::{ItemDetails, MoviePage};

/// Capability to fetch movie listings and details.
///
/// Implementations report failures with [`FetchError`]; `details` must use
/// [`FetchError::NotFound`] when the id does not exist.
#[allow(async_fn_in_trait)]
pub trait MovieSource {
    /// Popular movies, 1-based `page`.
    async fn popular(&self, page: u32) -> Result<MoviePage, FetchError>;

    /// Title search. `query` is non-empty; callers validate before invoking.
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, FetchError>;

    /// Full record for one movie.
    async fn details(&self, id: i64) -> Result<ItemDetails, FetchError>;
}

impl<T: MovieSource + ?Sized> MovieSource for &T {
    async fn popular(&self, page: u32) -> Result<MoviePage, FetchError> {
        (**self).popular(page).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, FetchError> {
        (**self).search(query, page).await
    }

    async fn details(&self, id: i64) -> Result<ItemDetails, FetchError> {
        (**self).details(id).await
    }
}
