//! Instance factories
//!
//! An [`InstanceFactory`] creates a fresh value of a type. [`InstanceFactories`]
//! selects one per type through a [`TypeDispatchTable`]; slots declared as
//! plain `std::Object` go to a separate null-object factory, since nothing
//! useful can be created for them.

mod array;
mod chained;
mod default;
mod enumeration;
mod logging;
mod non_concrete;
mod null_object;
mod primitive;

pub use array::ArrayInstanceFactory;
pub use chained::ChainedInstanceFactory;
pub use default::DefaultInstanceFactory;
pub use enumeration::EnumInstanceFactory;
pub use logging::LoggingInstanceFactory;
pub use non_concrete::NonConcreteInstanceFactory;
pub use null_object::NullObjectFactory;
pub use primitive::PrimitiveInstanceFactory;

use crate::error::InstanceCreationError;
use once_cell::sync::Lazy;
use populace_types::{
    builtin, DispatchError, TypeDescriptor, TypeDispatchTable, TypeDispatchTableBuilder, TypeName,
    TypeRegistry,
};
use populace_walk::Value;
use std::sync::Arc;

/// Creates new instances of types
pub trait InstanceFactory: Send + Sync + std::fmt::Debug {
    /// Create an instance of `ty`
    ///
    /// `parent` is the object that will hold the new value, if any; inner
    /// classes take it as their enclosing instance. `factories` is the
    /// complete configuration, for factories that delegate.
    ///
    /// Returns `Ok(None)` if this factory does not handle `ty`.
    ///
    /// # Errors
    /// Returns error if `ty` is handled but cannot be instantiated
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError>;

    /// Factory name (for logging and errors)
    fn name(&self) -> &'static str;
}

impl<F: InstanceFactory + ?Sized> InstanceFactory for Arc<F> {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        (**self).create(ty, parent, factories, types)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

type SharedFactory = Arc<dyn InstanceFactory>;

static DEFAULTS: Lazy<InstanceFactories> = Lazy::new(|| default_builder().into_factories());

fn default_builder() -> InstanceFactoriesBuilder {
    let builder = builtin::PRIMITIVES
        .iter()
        .fold(InstanceFactoriesBuilder::new(), |builder, primitive| {
            builder.with_specific(*primitive, PrimitiveInstanceFactory)
        });

    builder
        .with_super(builtin::ENUM, EnumInstanceFactory)
        .with_super(
            builtin::MAP,
            NonConcreteInstanceFactory::new(builtin::MAP, builtin::HASH_MAP, DefaultInstanceFactory),
        )
        .with_super(
            builtin::SET,
            NonConcreteInstanceFactory::new(builtin::SET, builtin::HASH_SET, DefaultInstanceFactory),
        )
        .with_super(
            builtin::LIST,
            NonConcreteInstanceFactory::new(builtin::LIST, builtin::ARRAY_LIST, DefaultInstanceFactory),
        )
        .with_super(
            builtin::COLLECTION,
            NonConcreteInstanceFactory::new(
                builtin::COLLECTION,
                builtin::ARRAY_LIST,
                DefaultInstanceFactory,
            ),
        )
        .with_array_default(ArrayInstanceFactory)
        .with_default(DefaultInstanceFactory)
        .with_null_object_factory(NullObjectFactory)
}

/// Immutable instance factory configuration
///
/// Defaults: primitives → [`PrimitiveInstanceFactory`], enumerations →
/// [`EnumInstanceFactory`], collection and map interfaces → their default
/// implementation via [`NonConcreteInstanceFactory`], arrays →
/// [`ArrayInstanceFactory`], `std::Object` → [`NullObjectFactory`],
/// everything else → [`DefaultInstanceFactory`].
#[derive(Debug, Clone)]
pub struct InstanceFactories {
    table: TypeDispatchTable<SharedFactory>,
    null_object: SharedFactory,
}

impl Default for InstanceFactories {
    fn default() -> Self {
        Self::defaults()
    }
}

impl InstanceFactories {
    /// Default configuration
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULTS.clone()
    }

    /// Builder seeded with the defaults
    #[must_use]
    pub fn builder() -> InstanceFactoriesBuilder {
        Self::defaults().to_builder()
    }

    /// Builder seeded with a copy of this configuration
    #[must_use]
    pub fn to_builder(&self) -> InstanceFactoriesBuilder {
        InstanceFactoriesBuilder {
            inner: self.table.to_builder(),
            null_object: Arc::clone(&self.null_object),
        }
    }

    /// Factory for `ty`
    #[must_use]
    pub fn get(&self, ty: &TypeDescriptor, types: &TypeRegistry) -> &dyn InstanceFactory {
        if ty.raw_name() == builtin::OBJECT {
            return self.null_object.as_ref();
        }
        self.table.get(ty, types).as_ref()
    }

    /// Fallback factory, for chaining in front of it
    #[must_use]
    pub fn default_factory(&self) -> Arc<dyn InstanceFactory> {
        Arc::clone(self.table.default_handler())
    }

    /// Factory used for `std::Object`
    #[must_use]
    pub fn null_object_factory(&self) -> Arc<dyn InstanceFactory> {
        Arc::clone(&self.null_object)
    }

    /// Create an instance of `ty`
    ///
    /// # Errors
    /// Returns [`InstanceCreationError::NoFactory`] if the selected factory
    /// declines the type, or the factory's own error
    pub fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        types: &TypeRegistry,
    ) -> Result<Value, InstanceCreationError> {
        let factory = self.get(ty, types);
        tracing::trace!("Creating {} with {}", ty, factory.name());
        factory
            .create(ty, parent, self, types)?
            .ok_or_else(|| InstanceCreationError::NoFactory { ty: ty.clone() })
    }
}

/// Builder for [`InstanceFactories`]
#[derive(Debug, Clone)]
pub struct InstanceFactoriesBuilder {
    inner: TypeDispatchTableBuilder<SharedFactory>,
    null_object: SharedFactory,
}

impl InstanceFactoriesBuilder {
    fn new() -> Self {
        Self {
            inner: TypeDispatchTableBuilder::new(),
            null_object: Arc::new(NullObjectFactory),
        }
    }

    /// Use `factory` for exactly `ty`
    #[must_use]
    pub fn with_specific(
        mut self,
        ty: impl Into<TypeDescriptor>,
        factory: impl InstanceFactory + 'static,
    ) -> Self {
        self.inner = self.inner.with_specific(ty, Arc::new(factory));
        self
    }

    /// Use `factory` for `base` and its subtypes
    #[must_use]
    pub fn with_super(mut self, base: impl Into<TypeName>, factory: impl InstanceFactory + 'static) -> Self {
        self.inner = self.inner.with_super(base, Arc::new(factory));
        self
    }

    /// Use `factory` for types in package `prefix`
    #[must_use]
    pub fn with_package(mut self, prefix: &str, factory: impl InstanceFactory + 'static) -> Self {
        self.inner = self.inner.with_package(prefix, Arc::new(factory));
        self
    }

    /// Use `factory` for arrays
    #[must_use]
    pub fn with_array_default(mut self, factory: impl InstanceFactory + 'static) -> Self {
        self.inner = self.inner.with_array_default(Arc::new(factory));
        self
    }

    /// Use `factory` when nothing else matches
    #[must_use]
    pub fn with_default(mut self, factory: impl InstanceFactory + 'static) -> Self {
        self.inner = self.inner.with_default(Arc::new(factory));
        self
    }

    /// Use `factory` for slots typed `std::Object`
    #[must_use]
    pub fn with_null_object_factory(mut self, factory: impl InstanceFactory + 'static) -> Self {
        self.null_object = Arc::new(factory);
        self
    }

    /// Freeze the configuration
    ///
    /// # Errors
    /// Returns error if the table is incomplete
    pub fn build(self) -> Result<InstanceFactories, DispatchError> {
        Ok(InstanceFactories {
            table: self.inner.build()?,
            null_object: self.null_object,
        })
    }

    // The default builder always carries a default handler
    fn into_factories(self) -> InstanceFactories {
        match self.build() {
            Ok(factories) => factories,
            Err(err) => unreachable!("default instance factories are complete: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name_for(ty: &TypeDescriptor) -> &'static str {
        InstanceFactories::defaults()
            .get(ty, &TypeRegistry::builtin())
            .name()
    }

    #[test]
    fn default_selection() {
        assert_eq!(name_for(&TypeDescriptor::raw(builtin::I64)), "primitive");
        assert_eq!(name_for(&TypeDescriptor::raw(builtin::OBJECT)), "null_object");
        assert_eq!(name_for(&TypeDescriptor::raw(builtin::LIST)), "non_concrete");
        assert_eq!(name_for(&TypeDescriptor::array(builtin::I32)), "array");
        assert_eq!(name_for(&TypeDescriptor::raw("demo::Person")), "default");
    }

    #[test]
    fn creates_default_implementations() {
        let factories = InstanceFactories::defaults();
        let types = TypeRegistry::builtin();

        let list = factories
            .create(&TypeDescriptor::parameterized(builtin::LIST, [builtin::STRING]), None, &types)
            .unwrap();
        assert_eq!(list.runtime_type(), Some(TypeName::new(builtin::ARRAY_LIST)));
        assert!(list.is_empty());

        let map = factories.create(&TypeDescriptor::raw(builtin::MAP), None, &types).unwrap();
        assert_eq!(map.runtime_type(), Some(TypeName::new(builtin::HASH_MAP)));

        let collection = factories
            .create(&TypeDescriptor::raw(builtin::COLLECTION), None, &types)
            .unwrap();
        assert_eq!(collection.runtime_type(), Some(TypeName::new(builtin::ARRAY_LIST)));
    }

    #[test]
    fn object_slots_get_null() {
        let value = InstanceFactories::defaults()
            .create(&TypeDescriptor::raw(builtin::OBJECT), None, &TypeRegistry::builtin())
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn declined_type_is_reported() {
        let factories = InstanceFactories::builder()
            .with_package("demo", PrimitiveInstanceFactory)
            .build()
            .unwrap();
        let ty = TypeDescriptor::raw("demo::Person");

        let err = factories.create(&ty, None, &TypeRegistry::builtin()).unwrap_err();
        assert_eq!(err, InstanceCreationError::NoFactory { ty });
    }

    #[test]
    fn empty_builder_needs_default() {
        let result = InstanceFactoriesBuilder::new().with_array_default(ArrayInstanceFactory).build();
        assert_eq!(result.unwrap_err(), DispatchError::MissingDefault);
    }
}
