//! Error types for the heritage scraper.
//!
//! Library crates use [`HeritageError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all scraper operations.
#[derive(Debug, thiserror::Error)]
pub enum HeritageError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while loading a page.
    #[error("network error: {0}")]
    Network(String),

    /// A page loaded but its marker element never appeared.
    #[error("timed out after {secs}s waiting for `{marker}` on {url}")]
    Timeout {
        url: String,
        marker: String,
        secs: u64,
    },

    /// HTML parsing or content extraction error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON or CSV serialization error.
    #[error("export error: {0}")]
    Export(String),

    /// Headless browser session error.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HeritageError>;

impl HeritageError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a marker-wait timeout error.
    pub fn timeout(url: impl Into<String>, marker: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            marker: marker.into(),
            secs,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = HeritageError::config("historical_tag must not be empty");
        assert_eq!(err.to_string(), "config error: historical_tag must not be empty");

        let err = HeritageError::timeout("https://vi.wikipedia.org/wiki/X", "#mw-content-text", 10);
        let msg = err.to_string();
        assert!(msg.contains("10s"));
        assert!(msg.contains("#mw-content-text"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = HeritageError::io(
            "data/raw/out.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("data/raw/out.json"));
    }
}
