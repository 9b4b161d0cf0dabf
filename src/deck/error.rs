//! Error and outcome types for deck rendering.
use crate::ooxml::OoxmlError;
use std::fmt;
use thiserror::Error;

/// Failures that abort a render. Everything else is recorded per slide.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template cannot be opened as a presentation, or has no slide
    /// master or layout to build slides from.
    #[error("malformed template: {0}")]
    MalformedTemplate(#[source] OoxmlError),

    /// Serializing the finished deck failed.
    #[error("failed to write presentation: {0}")]
    Write(#[source] OoxmlError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Why a best-effort step did nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no matching placeholder")]
    NoPlaceholder,

    #[error("nothing left to place")]
    NothingToPlace,

    #[error("no speaker notes")]
    NoNotes,

    #[error("template has no notes master")]
    NotesUnsupported,

    #[error("template has no harvested images")]
    NoAssets,

    #[error("placeholder has no bounds")]
    MissingBounds,

    #[error("image format not recognized")]
    UnrecognizedImage,
}

/// Result of one binding step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Skipped(SkipReason),
    Failed(String),
}

impl StepOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Failed(message) => write!(f, "failed ({})", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(StepOutcome::Applied.to_string(), "applied");
        assert_eq!(
            StepOutcome::Skipped(SkipReason::NoAssets).to_string(),
            "skipped (template has no harvested images)"
        );
        assert!(StepOutcome::Failed("boom".into()).is_failed());
    }

    #[test]
    fn test_render_error_keeps_source() {
        use std::error::Error as _;
        let err = RenderError::MalformedTemplate(OoxmlError::InvalidFormat("no master".into()));
        assert_eq!(err.to_string(), "malformed template: Invalid format: no master");
        assert!(err.source().is_some());
    }
}
