// ABOUTME: In-memory MovieSource double shared by the integration tests.
// ABOUTME: Serves numbered pages, records every call and can fail or delay chosen requests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use marquee_listing::{FetchError, Genre, Item, ItemDetails, MovieSource, MoviePage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Popular(u32),
    Search(String, u32),
    Details(i64),
}

pub struct StubSource {
    pub total_pages: u32,
    pub per_page: usize,
    pub latency: Duration,
    failing_pages: HashSet<u32>,
    missing_ids: HashSet<i64>,
    calls: Mutex<Vec<Call>>,
}

impl StubSource {
    pub fn new(total_pages: u32, per_page: usize) -> Self {
        Self {
            total_pages,
            per_page,
            latency: Duration::ZERO,
            failing_pages: HashSet::new(),
            missing_ids: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn missing_id(mut self, id: i64) -> Self {
        self.missing_ids.insert(id);
        self
    }

    pub fn heal(&mut self) {
        self.failing_pages.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn serve(&self, page: u32, id_base: i64) -> Result<MoviePage, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing_pages.contains(&page) {
            return Err(FetchError::upstream(500, "Internal Server Error"));
        }
        let start = id_base + i64::from(page - 1) * self.per_page as i64;
        let results = (start..start + self.per_page as i64).map(item).collect();
        Ok(MoviePage {
            page,
            results,
            total_pages: self.total_pages,
            total_results: u64::from(self.total_pages) * self.per_page as u64,
        })
    }
}

impl MovieSource for StubSource {
    async fn popular(&self, page: u32) -> Result<MoviePage, FetchError> {
        self.record(Call::Popular(page));
        self.serve(page, 1).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, FetchError> {
        self.record(Call::Search(query.to_string(), page));
        self.serve(page, 10_000).await
    }

    async fn details(&self, id: i64) -> Result<ItemDetails, FetchError> {
        self.record(Call::Details(id));
        if self.missing_ids.contains(&id) {
            return Err(FetchError::not_found("Movie not found"));
        }
        Ok(ItemDetails {
            item: item(id),
            runtime: 118,
            tagline: "In space no one can hear you scream.".to_string(),
            genres: vec![Genre {
                id: 27,
                name: "Horror".to_string(),
            }],
        })
    }
}

pub fn item(id: i64) -> Item {
    Item {
        id,
        title: format!("Movie {id}"),
        overview: String::new(),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
        release_date: "2020-01-01".to_string(),
        rating: 7.0,
        vote_count: 100,
    }
}
