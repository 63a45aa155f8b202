//! Error types for the boxscore pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by the boxscore library.
///
/// Parse misses are not errors: the extractor reports them as "no data".
#[derive(Debug, thiserror::Error)]
pub enum BoxscoreError {
    /// The page fetcher could not load a URL.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The page loaded but its ready condition never held.
    #[error("timed out after {timeout:?} waiting for {condition} on {url}")]
    ReadyTimeout {
        url: String,
        condition: String,
        timeout: Duration,
    },

    /// Every whole-session attempt to load a schedule page failed.
    #[error("schedule for {team} unavailable after {attempts} attempts")]
    ScheduleUnavailable { team: String, attempts: u32 },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A corpus or config file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A corpus or config file was not valid JSON of the expected shape.
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BoxscoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BoxscoreError>;
