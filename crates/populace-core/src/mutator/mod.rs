//! Mutators
//!
//! A [`Mutator`] turns the current value of a slot into a populated one:
//! creating it when missing, changing it when present. [`Mutators`] selects
//! one per declared type through a [`TypeDispatchTable`].

mod array;
mod chain;
mod change_date;
mod change_elements;
mod change_enum;
mod change_primitive;
mod change_string;
mod ensure;

pub use array::ArrayMutator;
pub use chain::ChainMutator;
pub use change_date::ChangeDateMutator;
pub use change_elements::{ChangeListElementsMutator, ChangeMapValuesMutator, ChangeSetElementsMutator};
pub use change_enum::ChangeEnumMutator;
pub use change_primitive::ChangePrimitiveMutator;
pub use change_string::ChangeStringMutator;
pub use ensure::{EnsureCollectionNotEmptyMutator, EnsureMapNotEmptyMutator, EnsureMutator};

pub(crate) use change_date::seed_date;

use crate::context::PopulatorContext;
use crate::error::PopulateError;
use once_cell::sync::Lazy;
use populace_types::{
    builtin, DispatchError, TypeDescriptor, TypeDispatchTable, TypeDispatchTableBuilder, TypeName,
    TypeRegistry,
};
use populace_walk::Value;
use std::sync::Arc;

/// Produces the populated value of a slot
pub trait Mutator: Send + Sync + std::fmt::Debug {
    /// Populated replacement for `current`, a value declared as `ty`
    ///
    /// May return `current` itself (same reference) after changing it in
    /// place. `parent` is the object holding the slot, `None` for container
    /// elements and roots.
    ///
    /// # Errors
    /// Returns [`PopulateError::UnsupportedType`] if `ty` or `current` is
    /// outside this mutator's contract, or any nested creation failure
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError>;

    /// Mutator name (for logging and errors)
    fn name(&self) -> &'static str;
}

impl<M: Mutator + ?Sized> Mutator for Arc<M> {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        (**self).mutate(ty, current, parent, ctx)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

type Table = TypeDispatchTable<Arc<dyn Mutator>>;

static DEFAULTS: Lazy<Mutators> = Lazy::new(|| Mutators {
    table: default_builder().into_table(),
});

fn default_builder() -> MutatorsBuilder {
    let builder = builtin::PRIMITIVES
        .iter()
        .fold(MutatorsBuilder::new(), |builder, primitive| {
            builder.with_specific(*primitive, ChangePrimitiveMutator)
        });

    builder
        .with_specific(builtin::STRING, ChangeStringMutator)
        .with_specific(builtin::DATE, ChangeDateMutator)
        .with_super(builtin::ENUM, ChainMutator::new(EnsureMutator, ChangeEnumMutator))
        .with_super(
            builtin::COLLECTION,
            ChainMutator::new(EnsureMutator, EnsureCollectionNotEmptyMutator),
        )
        .with_super(
            builtin::LIST,
            ChainMutator::new(EnsureMutator, EnsureCollectionNotEmptyMutator)
                .then(ChangeListElementsMutator),
        )
        .with_super(
            builtin::SET,
            ChainMutator::new(EnsureMutator, EnsureCollectionNotEmptyMutator)
                .then(ChangeSetElementsMutator),
        )
        .with_super(
            builtin::MAP,
            ChainMutator::new(EnsureMutator, EnsureMapNotEmptyMutator).then(ChangeMapValuesMutator),
        )
        .with_array_default(ArrayMutator)
        .with_default(EnsureMutator)
}

/// Immutable mutator configuration
///
/// Defaults: primitives, `String` and `Date` are changed; enumerations are
/// ensured then moved to the next constant; lists, sets and maps are
/// ensured, filled with one element when empty, then have their elements
/// changed; arrays use [`ArrayMutator`]; everything else is only ensured
/// ([`EnsureMutator`]), its fields being populated by the walk.
#[derive(Debug, Clone)]
pub struct Mutators {
    table: Table,
}

impl Default for Mutators {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Mutators {
    /// Default configuration
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULTS.clone()
    }

    /// Builder seeded with the defaults
    #[must_use]
    pub fn builder() -> MutatorsBuilder {
        Self::defaults().to_builder()
    }

    /// Builder seeded with a copy of this configuration
    #[must_use]
    pub fn to_builder(&self) -> MutatorsBuilder {
        MutatorsBuilder {
            inner: self.table.to_builder(),
        }
    }

    /// Mutator for `ty`
    #[must_use]
    pub fn get(&self, ty: &TypeDescriptor, types: &TypeRegistry) -> &dyn Mutator {
        self.table.get(ty, types).as_ref()
    }

    /// Fallback mutator, for chaining with another
    #[must_use]
    pub fn default_mutator(&self) -> Arc<dyn Mutator> {
        Arc::clone(self.table.default_handler())
    }
}

/// Builder for [`Mutators`]
#[derive(Debug, Clone)]
pub struct MutatorsBuilder {
    inner: TypeDispatchTableBuilder<Arc<dyn Mutator>>,
}

impl MutatorsBuilder {
    fn new() -> Self {
        Self {
            inner: TypeDispatchTableBuilder::new(),
        }
    }

    /// Use `mutator` for exactly `ty`
    #[must_use]
    pub fn with_specific(mut self, ty: impl Into<TypeDescriptor>, mutator: impl Mutator + 'static) -> Self {
        self.inner = self.inner.with_specific(ty, Arc::new(mutator));
        self
    }

    /// Use `mutator` for `base` and its subtypes
    #[must_use]
    pub fn with_super(mut self, base: impl Into<TypeName>, mutator: impl Mutator + 'static) -> Self {
        self.inner = self.inner.with_super(base, Arc::new(mutator));
        self
    }

    /// Use `mutator` for types in package `prefix`
    #[must_use]
    pub fn with_package(mut self, prefix: &str, mutator: impl Mutator + 'static) -> Self {
        self.inner = self.inner.with_package(prefix, Arc::new(mutator));
        self
    }

    /// Use `mutator` for arrays
    #[must_use]
    pub fn with_array_default(mut self, mutator: impl Mutator + 'static) -> Self {
        self.inner = self.inner.with_array_default(Arc::new(mutator));
        self
    }

    /// Use `mutator` when nothing else matches
    #[must_use]
    pub fn with_default(mut self, mutator: impl Mutator + 'static) -> Self {
        self.inner = self.inner.with_default(Arc::new(mutator));
        self
    }

    /// Freeze the configuration
    ///
    /// # Errors
    /// Returns error if the table is incomplete
    pub fn build(self) -> Result<Mutators, DispatchError> {
        Ok(Mutators {
            table: self.inner.build()?,
        })
    }

    // The default builder always carries a default handler
    fn into_table(self) -> Table {
        match self.inner.build() {
            Ok(table) => table,
            Err(err) => unreachable!("default mutators are complete: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name_for(mutators: &Mutators, ty: &TypeDescriptor) -> &'static str {
        mutators.get(ty, &TypeRegistry::builtin()).name()
    }

    #[test]
    fn default_selection() {
        let mutators = Mutators::defaults();

        assert_eq!(name_for(&mutators, &TypeDescriptor::raw(builtin::U8)), "change_primitive");
        assert_eq!(name_for(&mutators, &TypeDescriptor::raw(builtin::STRING)), "change_string");
        assert_eq!(name_for(&mutators, &TypeDescriptor::raw(builtin::DATE)), "change_date");
        assert_eq!(
            name_for(&mutators, &TypeDescriptor::parameterized(builtin::ARRAY_LIST, [builtin::I32])),
            "chain"
        );
        assert_eq!(name_for(&mutators, &TypeDescriptor::array(builtin::I32)), "array");
        assert_eq!(name_for(&mutators, &TypeDescriptor::raw("demo::Person")), "ensure");
    }

    #[test]
    fn builder_overrides_copy() {
        let custom = Mutators::builder()
            .with_specific(builtin::STRING, EnsureMutator)
            .build()
            .unwrap();
        let string = TypeDescriptor::raw(builtin::STRING);

        assert_eq!(name_for(&custom, &string), "ensure");
        assert_eq!(name_for(&Mutators::defaults(), &string), "change_string");
    }

    #[test]
    fn empty_builder_needs_default() {
        let result = MutatorsBuilder::new().with_array_default(ArrayMutator).build();
        assert_eq!(result.unwrap_err(), DispatchError::MissingDefault);
    }
}
