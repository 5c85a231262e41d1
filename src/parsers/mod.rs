pub mod json;

/// Count reported when a resource could not be counted during a scrape.
pub const SENTINEL: i64 = -1;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot interpret JSON as a countable collection")]
    NotCountable,
}
