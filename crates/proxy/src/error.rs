// ABOUTME: Error types for the proxy client including ErrorCode enum and ProxyError struct.
// ABOUTME: Provides categorized errors with constructors, boolean helpers and conversion into FetchError.

use std::fmt;

use marquee_listing::FetchError;

/// Error codes representing categories of proxy client failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Network,
    Upstream,
    NotFound,
    Validation,
    Decode,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Network => "network error",
            ErrorCode::Upstream => "upstream error",
            ErrorCode::NotFound => "not found",
            ErrorCode::Validation => "validation error",
            ErrorCode::Decode => "decode error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for proxy requests.
#[derive(Debug, thiserror::Error)]
pub struct ProxyError {
    pub code: ErrorCode,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marquee: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ProxyError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            status: None,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    pub fn network(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Network, url, op, source)
    }

    /// Non-success response. `source` carries the message shown to users.
    pub fn upstream(
        status: u16,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorCode::Upstream, url, op, source)
        }
    }

    pub fn not_found(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            status: Some(404),
            ..Self::new(ErrorCode::NotFound, url, op, source)
        }
    }

    pub fn validation(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Validation, url, op, source)
    }

    pub fn decode(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Decode, url, op, source)
    }

    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    pub fn is_network(&self) -> bool {
        self.code == ErrorCode::Network
    }

    pub fn is_upstream(&self) -> bool {
        self.code == ErrorCode::Upstream
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }

    pub fn is_decode(&self) -> bool {
        self.code == ErrorCode::Decode
    }

    /// The user-facing message: the source text, or the code when there is none.
    pub fn message(&self) -> String {
        match &self.source {
            Some(src) => src.to_string(),
            None => self.code.to_string(),
        }
    }
}

impl From<ProxyError> for FetchError {
    fn from(err: ProxyError) -> Self {
        let message = err.message();
        match err.code {
            ErrorCode::Network | ErrorCode::Decode => FetchError::network(message),
            ErrorCode::InvalidUrl | ErrorCode::Validation => FetchError::validation(message),
            ErrorCode::NotFound => FetchError::not_found(message),
            ErrorCode::Upstream => FetchError::upstream(err.status.unwrap_or(0), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_source() {
        let err = ProxyError::upstream(
            503,
            "http://localhost/api/movies/popular",
            "Popular",
            Some(anyhow::anyhow!("Service Unavailable")),
        );
        assert_eq!(
            err.to_string(),
            "marquee: Popular http://localhost/api/movies/popular: upstream error: Service Unavailable"
        );
        assert!(err.is_upstream());
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn converts_into_fetch_errors() {
        let e: FetchError = ProxyError::decode("u", "Search", Some(anyhow::anyhow!("bad json"))).into();
        assert_eq!(e, FetchError::network("bad json"));

        let e: FetchError = ProxyError::invalid_url("::", "Details", None).into();
        assert!(e.is_validation());

        let e: FetchError = ProxyError::not_found("u", "Details", Some(anyhow::anyhow!("Movie not found"))).into();
        assert!(e.is_not_found());
        assert_eq!(e.to_string(), "Movie not found");

        let e: FetchError = ProxyError::upstream(500, "u", "Popular", None).into();
        assert_eq!(e.status(), Some(500));
        assert_eq!(e.to_string(), "upstream error");
    }
}
