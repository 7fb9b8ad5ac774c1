//! Error types for the grid session.
//!
//! Only [`InteractionError`] is meant to reach the learner (as a blocking
//! notice). Configuration errors stop startup; sync errors are logged and
//! swallowed by the session.

use thiserror::Error;

use crate::constants::NOT_COLLECTED_NOTICE;
use crate::mode::Mode;
use crate::types::CellKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Error: unrecognized mode '{0}'. Exiting.")]
    UnrecognizedMode(String),

    #[error("unrecognized auto-score mode '{0}'")]
    UnrecognizedAutoScoreMode(String),

    #[error("no available temperatures configured")]
    NoAvailableTemperatures,

    #[error("unknown temperature '{0}' in available temperatures")]
    UnknownTemperature(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error("{}", NOT_COLLECTED_NOTICE)]
    NotCollected(CellKey),

    #[error("{action} is not available in {mode} mode")]
    UnsupportedInMode { action: &'static str, mode: Mode },

    #[error("feedback has already been given")]
    FeedbackDisabled,
}

impl InteractionError {
    /// Whether this error is one of the learner-facing blocking notices.
    pub fn is_blocking_notice(&self) -> bool {
        matches!(self, InteractionError::NotCollected(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("unknown temperature '{0}'")]
    UnknownTemperature(String),

    #[error("malformed trial id '{0}' (expected <material>-<temp>Liquid)")]
    MalformedTrialId(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("host unavailable: {0}")]
    Unavailable(String),

    #[error("failed to serialize payload: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SyncError {
    fn from(value: std::io::Error) -> Self {
        SyncError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(value: serde_json::Error) -> Self {
        SyncError::Serialize(value.to_string())
    }
}

/// Umbrella error for session entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
