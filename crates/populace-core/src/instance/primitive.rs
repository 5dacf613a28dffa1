//! Primitive instance factory

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{TypeDescriptor, TypeRegistry};
use populace_walk::Value;

/// Creates the zero value of primitive types; declines everything else
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PrimitiveInstanceFactory;

impl InstanceFactory for PrimitiveInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _parent: Option<&Value>,
        _factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        if !types.is_primitive(ty.raw_name()) {
            return Ok(None);
        }
        Ok(Some(Value::zero_of(ty.raw_name())))
    }

    fn name(&self) -> &'static str {
        "primitive"
    }
}
