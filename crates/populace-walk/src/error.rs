//! Error types for graph walking

use crate::path::WalkerPath;

/// Boxed error returned by visitors
pub type VisitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while walking a graph
#[derive(Debug, thiserror::Error)]
pub enum WalkerError {
    /// Visitor failed; aborts the walk
    #[error("failed to visit {path}: {source}")]
    Visit {
        /// Field or element being visited
        path: WalkerPath,
        /// Visitor's error
        #[source]
        source: VisitError,
    },

    /// Inspector could not enumerate a value
    #[error("failed to inspect {path}: {source}")]
    Inspect {
        /// Value being inspected
        path: WalkerPath,
        /// Inspector's error
        #[source]
        source: InspectError,
    },

    /// Slot read or write failed
    #[error("failed to access {path}: {source}")]
    Access {
        /// Slot being accessed
        path: WalkerPath,
        /// Accessor's error
        #[source]
        source: AccessError,
    },

    /// Value reached again on its own recursion path, or a null field
    /// filled with a type already enclosing it
    #[error("cycle detected at {path}")]
    Cycle {
        /// Where the cycle closes
        path: WalkerPath,
    },
}

impl WalkerError {
    /// Path at which the walk failed
    #[must_use]
    pub fn path(&self) -> &WalkerPath {
        match self {
            Self::Visit { path, .. }
            | Self::Inspect { path, .. }
            | Self::Access { path, .. }
            | Self::Cycle { path } => path,
        }
    }
}

/// Errors raised by inspectors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    /// Value shape outside the inspector's contract
    #[error("{inspector} cannot inspect values of type {ty}")]
    Unsupported {
        /// Name of the inspector
        inspector: &'static str,
        /// Runtime type of the value
        ty: String,
    },

    /// Underlying slot access failed
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Errors raised by field and element slot accessors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Field access on a value that is not an object
    #[error("not an object: {0}")]
    NotAnObject(String),

    /// Element access on a value of the wrong container kind
    #[error("not a {expected}: {found}")]
    WrongContainer {
        /// Container kind the slot belongs to
        expected: &'static str,
        /// Runtime type found instead
        found: String,
    },

    /// Index past the end of a list or array
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Current length
        len: usize,
    },

    /// Set member or map key no longer present
    #[error("element no longer present in its container")]
    MissingElement,

    /// Value is borrowed elsewhere
    #[error("value is already borrowed")]
    Borrowed,
}
