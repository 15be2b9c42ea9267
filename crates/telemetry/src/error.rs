//! Failure taxonomy for facet queries.

use std::io;

/// Why a facet could not be read.
///
/// Every facet returns this instead of panicking or propagating a raw OS
/// error, so callers can tell "no value" apart from a genuine zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unavailable {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("parse failure: {0}")]
    Parse(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not applicable: {0}")]
    NotApplicable(String),

    #[error("timed out: {0}")]
    Timeout(String),
}

impl Unavailable {
    /// Classifies an I/O error raised while touching `what`.
    pub fn from_io(what: impl std::fmt::Display, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(format!("{what}: {err}")),
            io::ErrorKind::TimedOut => Self::Timeout(format!("{what}: {err}")),
            _ => Self::SourceUnavailable(format!("{what}: {err}")),
        }
    }

    pub fn parse(what: impl Into<String>) -> Self {
        Self::Parse(what.into())
    }

    pub fn not_applicable(what: impl Into<String>) -> Self {
        Self::NotApplicable(what.into())
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::Parse(_) => "parse",
            Self::PermissionDenied(_) => "permission_denied",
            Self::NotApplicable(_) => "not_applicable",
            Self::Timeout(_) => "timeout",
        }
    }

    /// The human-readable detail without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::SourceUnavailable(r)
            | Self::Parse(r)
            | Self::PermissionDenied(r)
            | Self::NotApplicable(r)
            | Self::Timeout(r) => r,
        }
    }
}

/// Result of a single facet query.
pub type Reading<T> = Result<T, Unavailable>;
