//! Error types for type metadata and dispatch tables

use crate::descriptor::TypeVariable;
use crate::name::TypeName;

/// Errors raised while registering or validating types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Type not present in the registry
    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    /// Wrong number of type arguments
    #[error("{ty} expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        /// Raw type being parameterized
        ty: TypeName,
        /// Declared type parameters
        expected: usize,
        /// Arguments supplied
        found: usize,
    },

    /// Type registered twice
    #[error("type already registered: {0}")]
    DuplicateType(TypeName),

    /// Field name declared twice along an inheritance chain
    #[error("field '{field}' of {ty} is already declared by {declared_by}")]
    DuplicateField {
        /// Type declaring the field again
        ty: TypeName,
        /// Field name
        field: String,
        /// Type that declared it first
        declared_by: TypeName,
    },

    /// Supertype or enclosing type not registered
    #[error("{ty} refers to unknown type {missing}")]
    UnknownReference {
        /// Referring type
        ty: TypeName,
        /// Type that is not registered
        missing: TypeName,
    },

    /// Type variable used outside the type that declares it
    #[error("{ty} uses type variable {var} declared by {}", var.declared_by())]
    UndeclaredVariable {
        /// Type using the variable
        ty: TypeName,
        /// Variable in question
        var: TypeVariable,
    },

    /// Type is its own ancestor
    #[error("cyclic inheritance involving {0}")]
    CyclicInheritance(TypeName),
}

/// Errors raised while building a dispatch table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No default handler was installed
    #[error("no default handler registered")]
    MissingDefault,

    /// Package prefixes must name at least one segment
    #[error("package prefix must not be empty")]
    EmptyPackagePrefix,
}
