//! Error types for Populace Core
//!
//! Provides error handling for:
//! - Invalid populator configuration
//! - Instance creation failures
//! - Mutators applied to unsupported types
//! - Walk failures, with the path of the failing field or element

use populace_types::{DispatchError, TypeDescriptor, TypeError, TypeName};
use populace_walk::{AccessError, WalkerError, WalkerPath};

/// Main populator error type
#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No instance could be created
    #[error("instance creation failed: {0}")]
    InstanceCreation(#[from] InstanceCreationError),

    /// Walk aborted outside a field or element visit
    #[error("walk failed: {0}")]
    Walk(#[from] WalkerError),

    /// Mutator applied to a type it does not handle
    #[error("{mutator} does not support type {ty}")]
    UnsupportedType {
        /// Name of the mutator
        mutator: &'static str,
        /// Type it was asked to change
        ty: TypeDescriptor,
    },

    /// Slot read or write failed
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Populating a field failed
    #[error("failed to populate field {path}: {source}")]
    Field {
        /// Path of the field
        path: WalkerPath,
        /// Underlying failure
        #[source]
        source: Box<PopulateError>,
    },

    /// Populating a container element failed
    #[error("failed to populate element {path}: {source}")]
    Element {
        /// Path of the element
        path: WalkerPath,
        /// Underlying failure
        #[source]
        source: Box<PopulateError>,
    },
}

impl PopulateError {
    /// Create an unsupported type error
    #[inline]
    #[must_use]
    pub fn unsupported(mutator: &'static str, ty: &TypeDescriptor) -> Self {
        Self::UnsupportedType {
            mutator,
            ty: ty.clone(),
        }
    }

    /// Innermost error, unwrapping field and element wrappers
    #[must_use]
    pub fn root_cause(&self) -> &PopulateError {
        match self {
            Self::Field { source, .. } | Self::Element { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Instance creation failures, always naming the requested type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstanceCreationError {
    /// No factory accepted the type
    #[error("no instance factory can create {ty}")]
    NoFactory {
        /// Requested type
        ty: TypeDescriptor,
    },

    /// Type cannot be instantiated
    #[error("cannot instantiate {ty}: {reason}")]
    NotInstantiable {
        /// Requested type
        ty: TypeDescriptor,
        /// Why it cannot be created
        reason: &'static str,
    },

    /// Inner class created without a compatible enclosing instance
    #[error("cannot instantiate inner class {ty} without an enclosing {enclosing}")]
    MissingEnclosing {
        /// Requested inner class
        ty: TypeDescriptor,
        /// Required enclosing type
        enclosing: TypeName,
    },

    /// Type metadata lookup failed
    #[error("cannot instantiate {ty}: {source}")]
    Type {
        /// Requested type
        ty: TypeDescriptor,
        /// Lookup failure
        #[source]
        source: TypeError,
    },
}

impl InstanceCreationError {
    /// Type that could not be created
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        match self {
            Self::NoFactory { ty }
            | Self::NotInstantiable { ty, .. }
            | Self::MissingEnclosing { ty, .. }
            | Self::Type { ty, .. } => ty,
        }
    }
}

/// Invalid populator configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Non-static inner classes need an enclosing instance
    #[error("non-static inner class {0} cannot be populated from its type")]
    InnerClass(TypeName),

    /// Dispatch table incomplete
    #[error("dispatch table error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Type registry or descriptor rejected
    #[error("type error: {0}")]
    Type(#[from] TypeError),
}
