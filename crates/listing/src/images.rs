// ABOUTME: Builds poster and backdrop URLs from image paths and a configurable CDN base.
// ABOUTME: Missing paths yield None so callers can fall back to a placeholder.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W300,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W300 => "w300",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

impl fmt::Display for PosterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosterSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "w92" => PosterSize::W92,
            "w154" => PosterSize::W154,
            "w185" => PosterSize::W185,
            "w300" => PosterSize::W300,
            "w342" => PosterSize::W342,
            "w500" => PosterSize::W500,
            "w780" => PosterSize::W780,
            "original" => PosterSize::Original,
            other => return Err(format!("unknown poster size: {other}")),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackdropSize {
    W300,
    W780,
    #[default]
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Image CDN base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn poster_url(&self, path: Option<&str>, size: PosterSize) -> Option<String> {
        self.url(path, size.as_str())
    }

    pub fn backdrop_url(&self, path: Option<&str>, size: BackdropSize) -> Option<String> {
        self.url(path, size.as_str())
    }

    fn url(&self, path: Option<&str>, size: &str) -> Option<String> {
        let path = path.filter(|p| !p.is_empty())?;
        let sep = if path.starts_with('/') { "" } else { "/" };
        Some(format!("{}/{}{}{}", self.base, size, sep, path))
    }
}
