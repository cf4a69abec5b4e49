//! Harness error type.

use std::path::PathBuf;

/// Failures that stop the harness from executing a fixture.
///
/// A fixture whose rendering differs from its expectation is not an error;
/// it is a failed [`crate::VerificationResult`].
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported function `{0}`")]
    UnsupportedFunction(String),
    #[error("bad input `{field}`: {message}")]
    BadInput {
        field: &'static str,
        message: String,
    },
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(PathBuf),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn bad_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::BadInput {
            field,
            message: message.into(),
        }
    }
}
