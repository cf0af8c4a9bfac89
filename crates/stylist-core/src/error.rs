//! Errors surfaced by the chat pipeline.
//!
//! Collaborator traits return `anyhow::Result`; the pipeline folds every
//! store or catalog failure into [`ChatError::CollaboratorUnavailable`] so
//! callers see one kind regardless of backend.

use std::fmt;

use thiserror::Error;

/// The external collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    PreferenceStore,
    Catalog,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::PreferenceStore => f.write_str("preference store"),
            Collaborator::Catalog => f.write_str("catalog"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{collaborator} unavailable: {source}")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

impl ChatError {
    pub fn unavailable(collaborator: Collaborator, source: anyhow::Error) -> Self {
        ChatError::CollaboratorUnavailable {
            collaborator,
            source,
        }
    }
}
