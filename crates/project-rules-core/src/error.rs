//! Error types for loading the rules configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for rule loading.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Failures while reading or decoding a rules document.
///
/// None of these are fatal to the server: callers that want the
/// "serve with empty rules" behaviour go through
/// [`RuleStore::load_or_default`](crate::RuleStore::load_or_default).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("failed to read rules file {}: {source}", .path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file was read but is not a valid rules document.
    #[error("invalid rules document {}: {source}", .path.display())]
    Parse {
        /// Path the document came from.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory document could not be decoded.
    #[error("invalid rules document: {0}")]
    Document(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = LoadError::Read {
            path: PathBuf::from(".vscode/rules.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains(".vscode/rules.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_document_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: LoadError = json_err.into();
        assert!(err.to_string().starts_with("invalid rules document:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
