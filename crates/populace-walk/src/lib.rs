//! Populace Walk
//!
//! Dynamic values and type-directed graph traversal.
//!
//! # Core Concepts
//!
//! - [`Value`]: scalars, enum constants and shared mutable objects/containers
//! - [`Inspector`]: enumerates the fields and elements of a value
//! - [`FieldFilter`]: decides which fields are visited
//! - [`GraphWalker`]: depth-first traversal invoking a [`Visitor`]
//!
//! # Example
//!
//! ```rust
//! use populace_types::{builtin, ClassDef, FieldDef, TypeRegistry};
//! use populace_walk::{ElementInfo, FieldInfo, GraphWalker, Value, VisitError, Visitor};
//!
//! struct Names(Vec<String>);
//!
//! impl Visitor for Names {
//!     fn visit_field(&mut self, field: &FieldInfo) -> Result<(), VisitError> {
//!         self.0.push(field.path().to_string());
//!         Ok(())
//!     }
//!
//!     fn visit_element(&mut self, _: &mut ElementInfo) -> Result<(), VisitError> {
//!         Ok(())
//!     }
//! }
//!
//! let types = TypeRegistry::builder()
//!     .with_class(
//!         ClassDef::concrete("demo::Person")
//!             .field(FieldDef::new("name", builtin::STRING))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//! let walker = GraphWalker::builder().with_types(types).build();
//!
//! let mut names = Names(Vec::new());
//! walker.walk(&Value::object("demo::Person"), &mut names).unwrap();
//! assert_eq!(names.0, vec!["Person.name"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod element;
mod error;
mod field;
mod filter;
mod inspector;
mod path;
mod value;
mod visitor;
mod walker;

// Re-exports
pub use element::{ElementInfo, ElementSlot, RawElement};
pub use error::{AccessError, InspectError, VisitError, WalkerError};
pub use field::{FieldInfo, RawField};
pub use filter::{FieldFilter, FieldPredicate};
pub use inspector::{
    ArrayInspector, CollectionInspector, FieldInspector, Inspector, Inspectors, InspectorsBuilder,
    MapValueInspector, TerminalInspector,
};
pub use path::{PathSegment, WalkerPath};
pub use value::{
    ArrayData, ArrayRef, EnumValue, ListData, ListRef, MapData, MapRef, ObjectData, ObjectRef,
    SetData, SetRef, Value,
};
pub use visitor::Visitor;
pub use walker::{CyclePolicy, GraphWalker, GraphWalkerBuilder};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for walking graphs
    pub use crate::{
        CyclePolicy, ElementInfo, FieldFilter, FieldInfo, GraphWalker, Inspector, Inspectors,
        Value, VisitError, Visitor, WalkerError, WalkerPath,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
