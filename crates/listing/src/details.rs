// ABOUTME: Loader for a single movie's details with a full-page error state and retry.
// ABOUTME: Not-found failures stay distinguishable for the rendering layer.

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::ItemDetails;
use crate::source::MovieSource;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailsState {
    #[default]
    Idle,
    Loading {
        id: i64,
    },
    Loaded(ItemDetails),
    Failed {
        id: i64,
        error: FetchError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DetailsLoader {
    state: DetailsState,
    last_id: Option<i64>,
}

impl DetailsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetailsState {
        &self.state
    }

    pub fn details(&self) -> Option<&ItemDetails> {
        match &self.state {
            DetailsState::Loaded(details) => Some(details),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            DetailsState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Loads `id`, discarding whatever was shown before.
    pub async fn load<S: MovieSource>(&mut self, source: &S, id: i64) -> &DetailsState {
        self.last_id = Some(id);
        self.state = DetailsState::Loading { id };
        debug!(id, "loading details");
        self.state = match source.details(id).await {
            Ok(details) => DetailsState::Loaded(details),
            Err(error) => {
                warn!(id, error = %error, not_found = error.is_not_found(), "details fetch failed");
                DetailsState::Failed { id, error }
            }
        };
        &self.state
    }

    /// Reloads the last requested id. Returns false if nothing was requested yet.
    pub async fn retry<S: MovieSource>(&mut self, source: &S) -> bool {
        let Some(id) = self.last_id else {
            return false;
        };
        self.load(source, id).await;
        true
    }
}
