//! Shared state for mutators and instance factories

use crate::error::{InstanceCreationError, PopulateError};
use crate::instance::InstanceFactories;
use crate::mutator::{Mutator, Mutators};
use populace_types::{builtin, TypeArg, TypeContext, TypeDescriptor, TypeName, TypeRegistry, TypeResolver};
use populace_walk::Value;
use std::sync::Arc;

/// Populator configuration handed to every mutator
///
/// Lets a mutator create instances and delegate to the mutators of nested
/// types.
#[derive(Debug, Clone)]
pub struct PopulatorContext {
    types: Arc<TypeRegistry>,
    mutators: Mutators,
    instance_factories: InstanceFactories,
}

impl Default for PopulatorContext {
    fn default() -> Self {
        Self::new(
            Arc::new(TypeRegistry::builtin()),
            Mutators::defaults(),
            InstanceFactories::defaults(),
        )
    }
}

impl PopulatorContext {
    /// Create context
    #[must_use]
    pub fn new(types: Arc<TypeRegistry>, mutators: Mutators, instance_factories: InstanceFactories) -> Self {
        Self {
            types,
            mutators,
            instance_factories,
        }
    }

    /// Type registry
    #[inline]
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Shared handle to the type registry
    #[inline]
    #[must_use]
    pub fn shared_types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Mutator configuration
    #[inline]
    #[must_use]
    pub fn mutators(&self) -> &Mutators {
        &self.mutators
    }

    /// Instance factory configuration
    #[inline]
    #[must_use]
    pub fn instance_factories(&self) -> &InstanceFactories {
        &self.instance_factories
    }

    /// Mutator for `ty`
    #[must_use]
    pub fn mutator(&self, ty: &TypeDescriptor) -> &dyn Mutator {
        self.mutators.get(ty, &self.types)
    }

    /// Apply the mutator for `ty` to `current`
    ///
    /// # Errors
    /// Returns the mutator's error
    pub fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
    ) -> Result<Value, PopulateError> {
        let mutator = self.mutator(ty);
        tracing::trace!("Mutating {:?} as {} with {}", current, ty, mutator.name());
        mutator.mutate(ty, current, parent, self)
    }

    /// Create an instance of `ty`
    ///
    /// # Errors
    /// Returns error if no factory can create the type
    pub fn create_instance(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
    ) -> Result<Value, InstanceCreationError> {
        self.instance_factories.create(ty, parent, &self.types)
    }

    /// Element type of `container`, declared as `ty`
    ///
    /// Binding of the `index`-th type parameter of `owner` (`E` of
    /// `std::collections::Collection`, `K` and `V` of
    /// `std::collections::Map`), resolved against the container's runtime
    /// type and its declaration. Falls back to `std::Object`.
    #[must_use]
    pub fn element_type(&self, ty: &TypeDescriptor, container: &Value, owner: &str, index: usize) -> TypeDescriptor {
        let raw = container
            .runtime_type()
            .unwrap_or_else(|| ty.raw_name().clone());
        let ctx = TypeContext::new(raw, Some(ty.clone()));
        match TypeResolver::new(&self.types).parameter(&TypeName::new(owner), index, &ctx) {
            Some(TypeArg::Type(element)) => element,
            _ => TypeDescriptor::raw(builtin::OBJECT),
        }
    }
}
