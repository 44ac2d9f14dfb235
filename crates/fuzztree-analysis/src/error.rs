//! Error types for reliability analysis and settings.

use std::path::PathBuf;

use fuzztree_config::StructuralError;
use fuzztree_core::{Issue, ProbabilityError};
use thiserror::Error;

/// A failure that aborts the analysis of one configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("the tree contains undeveloped events and cannot be analyzed")]
    Undeveloped {
        /// First undeveloped event met by the task.
        id: String,
    },

    #[error("unknown node type {kind} at {id}")]
    UnknownNodeType { id: String, kind: String },

    #[error("invalid probability at {id}: {source}")]
    Probability {
        id: String,
        #[source]
        source: ProbabilityError,
    },

    #[error("alpha level {0} outside [0, 1]")]
    InvalidAlpha(f64),

    #[error("XOR gate {id} has {children} children, more than the limit of {limit}")]
    XorTooWide {
        id: String,
        children: usize,
        limit: usize,
    },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("analysis task panicked: {0}")]
    Panicked(String),
}

impl AnalysisError {
    /// Id of the element at fault, when known.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            AnalysisError::UnknownNodeType { id, .. }
            | AnalysisError::Probability { id, .. }
            | AnalysisError::XorTooWide { id, .. } => Some(id),
            AnalysisError::Structural(err) => err.element_id(),
            AnalysisError::Undeveloped { .. }
            | AnalysisError::InvalidAlpha(_)
            | AnalysisError::Panicked(_) => None,
        }
    }

    /// The fatal issue recorded for this failure.
    pub fn to_issue(&self) -> Issue {
        let issue = Issue::fatal(self.to_string());
        match self.element_id() {
            Some(id) => issue.at(id),
            None => issue,
        }
    }
}

/// Errors that can occur while loading analysis settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file not found.
    #[error("settings file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Settings are out of range.
    #[error("invalid settings: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
