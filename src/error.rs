//! Error types for the scanner library.
//!
//! A filename that matches nothing is not an error: matching returns
//! `Option` and only genuine failures end up here.

use std::path::PathBuf;

/// Errors produced while loading patterns or building episode indices.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured custom regex could not be used.
    #[error("malformed custom pattern {pattern:?}: {reason}")]
    MalformedCustomPattern { pattern: String, reason: String },

    /// The index builder was handed a date token that the matchers should
    /// never produce.
    #[error("episode index invariant violated: expected 6 or 8 date digits, got {digits} in {raw:?}")]
    InvariantViolation { digits: usize, raw: String },

    /// Reading a configuration or sidecar file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON file did not have the expected shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file could not be parsed.
    #[error("invalid settings in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub fn malformed<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Self {
        Self::MalformedCustomPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("(?P<title>", "unclosed group");
        assert_eq!(
            err.to_string(),
            "malformed custom pattern \"(?P<title>\": unclosed group"
        );

        let err = Error::InvariantViolation {
            digits: 7,
            raw: "2110211".to_string(),
        };
        assert!(err.to_string().contains("got 7"));
    }
}
