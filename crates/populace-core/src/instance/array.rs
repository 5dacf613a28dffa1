//! Array instance factory

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{builtin, TypeArg, TypeDescriptor, TypeRegistry};
use populace_walk::Value;

/// Creates a one-slot array holding the component's zero value
///
/// Unresolved component types become `std::Object`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArrayInstanceFactory;

impl InstanceFactory for ArrayInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _parent: Option<&Value>,
        _factories: &InstanceFactories,
        _types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        if !ty.is_array() {
            return Ok(None);
        }
        let component = match ty.component() {
            Some(TypeArg::Type(component)) => component.clone(),
            _ => TypeDescriptor::raw(builtin::OBJECT),
        };
        let zero = Value::zero_of(component.raw_name());
        Ok(Some(Value::array(component, [zero])))
    }

    fn name(&self) -> &'static str {
        "array"
    }
}
