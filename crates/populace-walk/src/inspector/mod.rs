//! Inspectors
//!
//! An [`Inspector`] tells the walker which fields and which container
//! elements of a value to visit. [`Inspectors`] selects one per type through
//! a [`TypeDispatchTable`].

mod array;
mod collection;
mod field;
mod map;
mod terminal;

pub use array::ArrayInspector;
pub use collection::CollectionInspector;
pub use field::FieldInspector;
pub use map::MapValueInspector;
pub use terminal::TerminalInspector;

use crate::element::RawElement;
use crate::error::InspectError;
use crate::field::RawField;
use crate::value::Value;
use once_cell::sync::Lazy;
use populace_types::{
    builtin, DispatchError, TypeContext, TypeDescriptor, TypeDispatchTable,
    TypeDispatchTableBuilder, TypeName, TypeRegistry, TypeResolver,
};
use std::sync::Arc;

/// Enumerates the children of a value
pub trait Inspector: Send + Sync + std::fmt::Debug {
    /// Fields of objects of raw type `ty`, in visiting order
    ///
    /// # Errors
    /// Returns [`InspectError::Unsupported`] if `ty` is outside this
    /// inspector's contract
    fn fields(&self, ty: &TypeName, types: &TypeRegistry) -> Result<Vec<RawField>, InspectError> {
        let _ = (ty, types);
        Ok(Vec::new())
    }

    /// Elements of container `value`, in visiting order
    ///
    /// `ctx` binds the container's type variables; use `resolver` to find
    /// element types.
    ///
    /// # Errors
    /// Returns [`InspectError::Unsupported`] if `value` is outside this
    /// inspector's contract
    fn elements(
        &self,
        value: &Value,
        ctx: &TypeContext,
        resolver: &TypeResolver<'_>,
    ) -> Result<Vec<RawElement>, InspectError> {
        let _ = (value, ctx, resolver);
        Ok(Vec::new())
    }

    /// Inspector name (for logging and errors)
    fn name(&self) -> &'static str;
}

pub(crate) fn unsupported(inspector: &'static str, value: &Value) -> InspectError {
    InspectError::Unsupported {
        inspector,
        ty: value.type_label(),
    }
}

type Table = TypeDispatchTable<Arc<dyn Inspector>>;

static DEFAULTS: Lazy<Inspectors> = Lazy::new(|| Inspectors {
    table: default_builder().into_table(),
});

fn default_builder() -> InspectorsBuilder {
    InspectorsBuilder::new()
        .with_super(builtin::COLLECTION, CollectionInspector)
        .with_super(builtin::MAP, MapValueInspector)
        .with_package("std", TerminalInspector)
        .with_array_default(ArrayInspector)
        .with_default(FieldInspector)
}

/// Immutable inspector configuration
///
/// Defaults: collections → [`CollectionInspector`], maps →
/// [`MapValueInspector`], package `std` → [`TerminalInspector`], arrays →
/// [`ArrayInspector`], everything else → [`FieldInspector`].
#[derive(Debug, Clone)]
pub struct Inspectors {
    table: Table,
}

impl Default for Inspectors {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Inspectors {
    /// Default configuration
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULTS.clone()
    }

    /// Builder seeded with the defaults
    #[must_use]
    pub fn builder() -> InspectorsBuilder {
        Self::defaults().to_builder()
    }

    /// Builder seeded with a copy of this configuration
    #[must_use]
    pub fn to_builder(&self) -> InspectorsBuilder {
        InspectorsBuilder {
            inner: self.table.to_builder(),
        }
    }

    /// Inspector for `ty`
    #[must_use]
    pub fn get(&self, ty: &TypeDescriptor, types: &TypeRegistry) -> &dyn Inspector {
        self.table.get(ty, types).as_ref()
    }
}

/// Builder for [`Inspectors`]
#[derive(Debug, Clone)]
pub struct InspectorsBuilder {
    inner: TypeDispatchTableBuilder<Arc<dyn Inspector>>,
}

impl InspectorsBuilder {
    fn new() -> Self {
        Self {
            inner: TypeDispatchTableBuilder::new(),
        }
    }

    /// Use `inspector` for exactly `ty`
    #[must_use]
    pub fn with_specific(mut self, ty: impl Into<TypeDescriptor>, inspector: impl Inspector + 'static) -> Self {
        self.inner = self.inner.with_specific(ty, Arc::new(inspector));
        self
    }

    /// Use `inspector` for `base` and its subtypes
    #[must_use]
    pub fn with_super(mut self, base: impl Into<TypeName>, inspector: impl Inspector + 'static) -> Self {
        self.inner = self.inner.with_super(base, Arc::new(inspector));
        self
    }

    /// Use `inspector` for types in package `prefix`
    #[must_use]
    pub fn with_package(mut self, prefix: &str, inspector: impl Inspector + 'static) -> Self {
        self.inner = self.inner.with_package(prefix, Arc::new(inspector));
        self
    }

    /// Use `inspector` for arrays
    #[must_use]
    pub fn with_array_default(mut self, inspector: impl Inspector + 'static) -> Self {
        self.inner = self.inner.with_array_default(Arc::new(inspector));
        self
    }

    /// Use `inspector` when nothing else matches
    #[must_use]
    pub fn with_default(mut self, inspector: impl Inspector + 'static) -> Self {
        self.inner = self.inner.with_default(Arc::new(inspector));
        self
    }

    /// Freeze the configuration
    ///
    /// # Errors
    /// Returns error if the table is incomplete
    pub fn build(self) -> Result<Inspectors, DispatchError> {
        Ok(Inspectors {
            table: self.inner.build()?,
        })
    }

    // The default builder always carries a default handler
    fn into_table(self) -> Table {
        match self.inner.build() {
            Ok(table) => table,
            Err(err) => unreachable!("default inspectors are complete: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_for(inspectors: &Inspectors, ty: &TypeDescriptor) -> &'static str {
        inspectors.get(ty, &TypeRegistry::builtin()).name()
    }

    #[test]
    fn default_selection() {
        let inspectors = Inspectors::defaults();
        let list = TypeDescriptor::parameterized(builtin::ARRAY_LIST, [builtin::STRING]);

        assert_eq!(name_for(&inspectors, &list), "collection");
        assert_eq!(name_for(&inspectors, &TypeDescriptor::raw(builtin::HASH_MAP)), "map_value");
        assert_eq!(name_for(&inspectors, &TypeDescriptor::raw(builtin::STRING)), "terminal");
        assert_eq!(name_for(&inspectors, &TypeDescriptor::array(builtin::I32)), "array");
        assert_eq!(name_for(&inspectors, &TypeDescriptor::raw("demo::Person")), "field");
    }

    #[test]
    fn builder_overrides_copy() {
        let custom = Inspectors::builder()
            .with_specific("demo::Opaque", TerminalInspector)
            .build()
            .unwrap();
        let opaque = TypeDescriptor::raw("demo::Opaque");

        assert_eq!(name_for(&custom, &opaque), "terminal");
        assert_eq!(name_for(&Inspectors::defaults(), &opaque), "field");
    }

    #[test]
    fn empty_builder_needs_default() {
        let result = InspectorsBuilder::new().with_super(builtin::MAP, MapValueInspector).build();
        assert_eq!(result.unwrap_err(), DispatchError::MissingDefault);
    }
}
