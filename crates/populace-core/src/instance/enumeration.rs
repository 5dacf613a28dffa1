//! Enumeration instance factory

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{ClassKind, TypeDescriptor, TypeRegistry};
use populace_walk::{EnumValue, Value};

/// Creates the first constant of an enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnumInstanceFactory;

impl InstanceFactory for EnumInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _parent: Option<&Value>,
        _factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        let name = ty.raw_name();
        if types.kind(name) != Some(ClassKind::Enum) {
            return Err(InstanceCreationError::NotInstantiable {
                ty: ty.clone(),
                reason: "not a concrete enumeration",
            });
        }
        let Some(first) = types.enum_constants(name).first() else {
            return Err(InstanceCreationError::NotInstantiable {
                ty: ty.clone(),
                reason: "enumeration has no constants",
            });
        };
        Ok(Some(Value::Enum(EnumValue::new(name, 0, first))))
    }

    fn name(&self) -> &'static str {
        "enum"
    }
}
