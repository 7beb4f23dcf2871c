//! Query-facing error type.

use map_common::MapError;
use thiserror::Error;

/// Pipeline stage that rejected a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    UnsupportedFormat,
    Decode,
    Georeference,
    Warp,
    Encode,
    Config,
}

impl std::fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UnsupportedFormat => "unsupported_format",
            Self::Decode => "decode",
            Self::Georeference => "georeference",
            Self::Warp => "warp",
            Self::Encode => "encode",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

/// Error returned by [`crate::HeifMapProvider::query`].
///
/// Carries the failing stage and a message safe to show to a client.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct QueryError {
    kind: QueryErrorKind,
    message: String,
    #[source]
    source: MapError,
}

impl QueryError {
    pub fn kind(&self) -> QueryErrorKind {
        self.kind
    }

    /// User-facing message, e.g. `Bad output format: gif`.
    pub fn user_msg(&self) -> &str {
        &self.message
    }
}

impl From<MapError> for QueryError {
    fn from(err: MapError) -> Self {
        let kind = match &err {
            MapError::UnsupportedFormat(_) => QueryErrorKind::UnsupportedFormat,
            MapError::Decode(_) => QueryErrorKind::Decode,
            MapError::Georeference(_) => QueryErrorKind::Georeference,
            MapError::Warp(_) => QueryErrorKind::Warp,
            MapError::Encode(_) => QueryErrorKind::Encode,
            MapError::Config(_) => QueryErrorKind::Config,
        };
        Self {
            kind,
            message: err.to_string(),
            source: err,
        }
    }
}
