//! Crate-level error types.
//!
//! [`WicklineError`] unifies every error source (configuration, HTTP,
//! JSON, terminal I/O) behind a single enum so callers can match on the
//! variant they care about while still using the `?` operator for easy
//! propagation.
//!
//! The chart pipeline itself never returns these: geometry problems
//! turn into `None` scales and data-quality problems are counted, so a
//! bad refresh can at worst leave a stale or blank chart.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WicklineError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum WicklineError {
    /// A configuration value or style file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal setup, teardown, or drawing failed.
    #[error("io error: {0}")]
    Io(String),

    /// An HTTP request to the market data feed failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feed payload was valid JSON but did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
