//! Error types for Vista
//!
//! None of these terminate the page. Runtime paths recover them at the
//! component boundary; declaration-time paths (timeline builders, config)
//! return them to the caller.

use thiserror::Error;

use crate::{MediaUri, TargetId, TriggerId};

/// Core Vista errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VistaError {
    // Handle errors
    #[error("Missing handle: {0} is not mounted")]
    MissingHandle(TargetId),

    #[error("Stale handle: {0}")]
    StaleHandle(&'static str),

    // Binding errors
    #[error("Invalid binding on {trigger}: {reason}")]
    InvalidBinding { trigger: TriggerId, reason: String },

    // Media errors
    #[error("Media load failure for {uri}: {reason}")]
    MediaLoadFailure { uri: MediaUri, reason: String },

    // Declaration errors
    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl VistaError {
    /// Stable short name for diagnostics and counters
    pub fn kind(&self) -> &'static str {
        match self {
            VistaError::MissingHandle(_) => "missing_handle",
            VistaError::StaleHandle(_) => "stale_handle",
            VistaError::InvalidBinding { .. } => "invalid_binding",
            VistaError::MediaLoadFailure { .. } => "media_load_failure",
            VistaError::InvalidTimeline(_) => "invalid_timeline",
            VistaError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type for Vista operations
pub type VistaResult<T> = Result<T, VistaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VistaError::InvalidBinding {
            trigger: TriggerId::new(3),
            reason: "trigger region absent".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid binding on trigger-3: trigger region absent"
        );
        assert_eq!(err.kind(), "invalid_binding");

        let err = VistaError::MediaLoadFailure {
            uri: MediaUri::new("/videos/game.mp4"),
            reason: "decode error".into(),
        };
        assert!(err.to_string().contains("/videos/game.mp4"));
    }
}
