//! Default implementations for interfaces and abstract types

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{TypeDescriptor, TypeName, TypeRegistry};
use populace_walk::Value;
use std::sync::Arc;

/// Creates a default implementation when asked for a non-concrete type
///
/// Handles `base` and its subtypes. Concrete types go straight to the
/// delegate; interfaces and abstract types are created as `default_type`,
/// provided `default_type` is assignable to the requested type. Anything
/// else is declined.
#[derive(Debug, Clone)]
pub struct NonConcreteInstanceFactory {
    base: TypeName,
    default_type: TypeName,
    delegate: Arc<dyn InstanceFactory>,
}

impl NonConcreteInstanceFactory {
    /// Create factory for `base`, instantiating `default_type` through
    /// `delegate`
    #[must_use]
    pub fn new(
        base: impl Into<TypeName>,
        default_type: impl Into<TypeName>,
        delegate: impl InstanceFactory + 'static,
    ) -> Self {
        Self {
            base: base.into(),
            default_type: default_type.into(),
            delegate: Arc::new(delegate),
        }
    }

    /// Base type handled
    #[inline]
    #[must_use]
    pub fn base(&self) -> &TypeName {
        &self.base
    }

    /// Type created for non-concrete requests
    #[inline]
    #[must_use]
    pub fn default_type(&self) -> &TypeName {
        &self.default_type
    }
}

impl InstanceFactory for NonConcreteInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        let raw = ty.raw_name();
        if !types.is_assignable(raw, &self.base) {
            return Ok(None);
        }
        if types.get(raw).is_some_and(|def| def.is_concrete()) {
            return self.delegate.create(ty, parent, factories, types);
        }
        if !types.is_assignable(&self.default_type, raw) {
            tracing::debug!("{} is not assignable to {}, declining", self.default_type, raw);
            return Ok(None);
        }
        let concrete = TypeDescriptor::raw(self.default_type.clone());
        self.delegate.create(&concrete, parent, factories, types)
    }

    fn name(&self) -> &'static str {
        "non_concrete"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::DefaultInstanceFactory;
    use populace_types::{builtin, ClassDef, Shape};

    fn types() -> TypeRegistry {
        TypeRegistry::builder()
            .with_class(
                ClassDef::interface("demo::SortedSet")
                    .type_param("E")
                    .extends(builtin::SET)
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::TreeSet")
                    .type_param("E")
                    .extends("demo::SortedSet")
                    .shape(Shape::Set)
                    .build(),
            )
            .build()
            .unwrap()
    }

    fn create(ty: &str) -> Result<Option<Value>, InstanceCreationError> {
        NonConcreteInstanceFactory::new(builtin::SET, builtin::HASH_SET, DefaultInstanceFactory).create(
            &TypeDescriptor::raw(ty),
            None,
            &InstanceFactories::defaults(),
            &types(),
        )
    }

    #[test]
    fn interface_gets_default_type() {
        let set = create(builtin::SET).unwrap().unwrap();
        assert_eq!(set.runtime_type(), Some(TypeName::new(builtin::HASH_SET)));
    }

    #[test]
    fn concrete_type_goes_to_delegate() {
        let set = create("demo::TreeSet").unwrap().unwrap();
        assert_eq!(set.runtime_type(), Some(TypeName::new("demo::TreeSet")));
        assert!(set.is_empty());
    }

    #[test]
    fn incompatible_default_declines() {
        assert_eq!(create("demo::SortedSet").unwrap(), None);
    }

    #[test]
    fn unrelated_type_declines() {
        assert_eq!(create(builtin::LIST).unwrap(), None);
    }
}
