//! Factory for slots typed `std::Object`

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{TypeDescriptor, TypeRegistry};
use populace_walk::Value;

/// Leaves untyped slots null
///
/// A slot declared as `std::Object` says nothing about what it should hold,
/// so nothing is created. Install a custom factory with
/// `with_null_object_factory` to fill such slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullObjectFactory;

impl InstanceFactory for NullObjectFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        _factories: &InstanceFactories,
        _types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        tracing::debug!(
            "Cannot create instance of {} for parent {:?}, leaving null",
            ty,
            parent
        );
        Ok(Some(Value::Null))
    }

    fn name(&self) -> &'static str {
        "null_object"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use populace_types::builtin;

    #[test]
    fn yields_null() {
        let value = NullObjectFactory
            .create(
                &TypeDescriptor::raw(builtin::OBJECT),
                Some(&Value::object("demo::Holder")),
                &InstanceFactories::defaults(),
                &TypeRegistry::builtin(),
            )
            .unwrap();
        assert_eq!(value, Some(Value::Null));
    }
}
