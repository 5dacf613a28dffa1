//! Populace Types
//!
//! Type metadata for object graph population.
//!
//! # Overview
//!
//! - **TypeName / TypeDescriptor**: raw type identity plus type arguments
//! - **TypeRegistry**: class metadata (kinds, fields, supertypes, shapes)
//! - **TypeResolver**: binds type variables through the supertype graph
//! - **TypeDispatchTable**: type → handler lookup with specificity rules
//!
//! # Example
//!
//! ```rust
//! use populace_types::{builtin, TypeDescriptor, TypeDispatchTable, TypeRegistry};
//!
//! let types = TypeRegistry::builtin();
//! let table = TypeDispatchTable::builder()
//!     .with_super(builtin::COLLECTION, "collection")
//!     .with_default("other")
//!     .build()
//!     .unwrap();
//!
//! let list = types.parameterize(builtin::ARRAY_LIST, [builtin::STRING]).unwrap();
//! assert_eq!(*table.get(&list, &types), "collection");
//! assert_eq!(*table.get(&TypeDescriptor::raw(builtin::STRING), &types), "other");
//! ```

#![warn(missing_docs)]

pub mod class;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod name;
pub mod registry;
pub mod resolver;

// Re-exports
pub use class::{ClassDef, ClassDefBuilder, ClassKind, FieldDef, Shape};
pub use descriptor::{TypeArg, TypeDescriptor, TypeVariable};
pub use dispatch::{TypeDispatchTable, TypeDispatchTableBuilder};
pub use error::{DispatchError, TypeError};
pub use name::{builtin, TypeName};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use resolver::{TypeContext, TypeResolver};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for type metadata
    pub use crate::{
        builtin, ClassDef, ClassKind, FieldDef, Shape, TypeArg, TypeContext, TypeDescriptor,
        TypeDispatchTable, TypeName, TypeRegistry, TypeResolver, TypeVariable,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
