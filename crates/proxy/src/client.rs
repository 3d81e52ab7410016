// ABOUTME: The proxy Client for the BFF movie routes and health probe.
// ABOUTME: Implements MovieSource so listing controllers can fetch through it.

use marquee_listing::{FetchError, ItemDetails, MoviePage, MovieSource};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProxyError;
use crate::options::{ClientBuilder, Options};
use crate::resource::get_json;

/// Body of the health route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// HTTP client for the BFF.
pub struct Client {
    opts: Options,
    base: Url,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ProxyError> {
        let base = parse_base(&opts.base_url)?;

        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .build()
                .map_err(|e| {
                    ProxyError::network(
                        &opts.base_url,
                        "Build",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };

        Ok(Self {
            opts,
            base,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// One page of popular movies.
    pub async fn popular(&self, page: u32) -> Result<MoviePage, ProxyError> {
        let url = self.endpoint("movies/popular", &[("page", page.to_string())]);
        get_json(&self.http_client, &url, &self.opts.headers, "Popular").await
    }

    /// One page of title search results. `query` is trimmed and must not be empty.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, ProxyError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ProxyError::validation(
                self.base.as_str(),
                "Search",
                Some(anyhow::anyhow!("search query must not be empty")),
            ));
        }
        let url = self.endpoint(
            "movies/search",
            &[("q", query.to_string()), ("page", page.to_string())],
        );
        get_json(&self.http_client, &url, &self.opts.headers, "Search").await
    }

    /// Full record for one movie.
    pub async fn details(&self, id: i64) -> Result<ItemDetails, ProxyError> {
        let url = self.endpoint(&format!("movies/{}", id), &[]);
        get_json(&self.http_client, &url, &self.opts.headers, "Details").await
    }

    /// Probes the server's health route at the root of the base URL's origin.
    pub async fn health(&self) -> Result<Health, ProxyError> {
        let mut url = self.base.clone();
        url.set_path("/health");
        url.set_query(None);
        get_json(&self.http_client, &url, &self.opts.headers, "Health").await
    }

    /// Appends `path` to the base URL and sets the query parameters.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}/{}", self.base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }
}

fn parse_base(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|e| {
        ProxyError::invalid_url(raw, "Build", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ProxyError::invalid_url(
            raw,
            "Build",
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}

impl MovieSource for Client {
    async fn popular(&self, page: u32) -> Result<MoviePage, FetchError> {
        Ok(Client::popular(self, page).await?)
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, FetchError> {
        Ok(Client::search(self, query, page).await?)
    }

    async fn details(&self, id: i64) -> Result<ItemDetails, FetchError> {
        Ok(Client::details(self, id).await?)
    }
}
