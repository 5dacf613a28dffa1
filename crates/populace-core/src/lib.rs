//! Populace Core
//!
//! Populates object graphs with distinguishable test data.
//!
//! # Core Concepts
//!
//! - [`Mutator`]: produces the populated value of a slot from its current value
//! - [`InstanceFactory`]: creates values that do not exist yet
//! - [`PopulatorContext`]: mutators and factories as seen by a mutator
//! - [`GraphPopulator`]: walks a graph and applies the mutators to every
//!   field and element
//!
//! # Example
//!
//! ```rust
//! use populace_core::prelude::*;
//! use populace_types::{builtin, ClassDef, FieldDef, TypeDescriptor, TypeRegistry};
//!
//! let types = TypeRegistry::builder()
//!     .with_class(
//!         ClassDef::concrete("demo::Person")
//!             .field(FieldDef::new("name", builtin::STRING))
//!             .field(FieldDef::new("age", builtin::I32))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let populator = GraphPopulator::builder().with_types(types).build();
//! let person = populator
//!     .populate_type(&TypeDescriptor::raw("demo::Person"))
//!     .unwrap();
//!
//! assert_eq!(person.field("name").unwrap(), Value::from("populace"));
//! assert_eq!(person.field("age").unwrap(), Value::I32(1));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod context;
mod error;
mod instance;
mod mutator;
mod populator;

// Re-exports
pub use context::PopulatorContext;
pub use error::{ConfigError, InstanceCreationError, PopulateError};
pub use instance::{
    ArrayInstanceFactory, ChainedInstanceFactory, DefaultInstanceFactory, EnumInstanceFactory,
    InstanceFactories, InstanceFactoriesBuilder, InstanceFactory, LoggingInstanceFactory,
    NonConcreteInstanceFactory, NullObjectFactory, PrimitiveInstanceFactory,
};
pub use mutator::{
    ArrayMutator, ChainMutator, ChangeDateMutator, ChangeEnumMutator, ChangeListElementsMutator,
    ChangeMapValuesMutator, ChangePrimitiveMutator, ChangeSetElementsMutator, ChangeStringMutator,
    EnsureCollectionNotEmptyMutator, EnsureMapNotEmptyMutator, EnsureMutator, Mutator, Mutators,
    MutatorsBuilder,
};
pub use populator::{GraphPopulator, GraphPopulatorBuilder};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for populating graphs
    pub use crate::{
        GraphPopulator, InstanceFactories, InstanceFactory, Mutator, Mutators, PopulateError,
        PopulatorContext,
    };
    pub use populace_walk::{CyclePolicy, FieldFilter, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
