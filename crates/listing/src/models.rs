// ABOUTME: Movie models consumed by the listing core: Item, ItemDetails, Genre and MoviePage.
// ABOUTME: Fields serialize as camelCase, matching both the proxy wire format and the favorites slot.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single movie record as used by listings and favorites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// ISO date (`YYYY-MM-DD`), empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    /// Average vote in `[0, 10]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
}

/// A genre tag attached to a movie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Extended movie record returned by the details route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    /// Runtime in minutes, 0 when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

impl ItemDetails {
    /// Returns the listing-level record, e.g. for favoriting from a details view.
    pub fn to_item(&self) -> Item {
        self.item.clone()
    }

    /// Genre names joined for display.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<ItemDetails> for Item {
    fn from(details: ItemDetails) -> Self {
        details.item
    }
}

/// One page of results from the popular or search routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Item>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}
