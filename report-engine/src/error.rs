//! FILENAME: report-engine/src/error.rs

use thiserror::Error;

/// Fault raised by an emitter while consuming a content node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EmitError(pub String);

/// Faults raised by the execution core.
///
/// `Structural` and `Cursor` unwind to the nearest driver loop, which
/// closes the executors already opened on the path before re-raising.
/// Extension-initialization faults never reach this type (they degrade
/// the node to inert in `report-model`), and event-handler faults are
/// swallowed by the script dispatcher.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed design node encountered during traversal. Aborts the
    /// offending subtree only.
    #[error("malformed design at '{node}': {reason}")]
    Structural { node: String, reason: String },

    /// Data cursor missing or unusable when restoration was attempted.
    /// Fatal to the current render pass: row identity and grouping can
    /// no longer be trusted.
    #[error("data cursor fault at '{node}': {reason}")]
    Cursor { node: String, reason: String },

    /// The emitter rejected a content node.
    #[error("emitter fault at '{node}': {source}")]
    Emit {
        node: String,
        #[source]
        source: EmitError,
    },
}

impl EngineError {
    pub fn structural(node: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Structural {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn cursor(node: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Cursor {
            node: node.into(),
            reason: reason.into(),
        }
    }

    /// Design node the fault is tied to.
    pub fn node(&self) -> &str {
        match self {
            EngineError::Structural { node, .. }
            | EngineError::Cursor { node, .. }
            | EngineError::Emit { node, .. } => node,
        }
    }
}
