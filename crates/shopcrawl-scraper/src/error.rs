use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Expected payload (marker pair, script block, listing container) was
    /// absent. This signals "no data here" — end of a listing or a changed
    /// page shape — and is handled as a termination/skip condition, not as
    /// an unexpected failure.
    #[error("expected payload not found: {context}")]
    MissingPayload { context: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("normalization error for product {product_id}: {reason}")]
    Normalization { product_id: String, reason: String },

    #[error("pagination limit reached for {source_name}: exceeded {max_pages} pages")]
    PaginationLimit { source_name: String, max_pages: u32 },

    #[error("failed to write output file {path}: {source}")]
    OutputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode output file {path}: {source}")]
    OutputEncode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScraperError {
    /// `true` for the expected-absence condition that terminates pagination
    /// or skips an item without being logged as a failure.
    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ScraperError::MissingPayload { .. })
    }
}
