//! Array mutation

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::{builtin, TypeArg, TypeDescriptor};
use populace_walk::Value;

/// Ensures a non-empty array, then changes every slot
///
/// Null and empty arrays are replaced by a freshly created one, which has a
/// single slot with the default factories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArrayMutator;

impl Mutator for ArrayMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        if !ty.is_array() {
            return Err(PopulateError::unsupported(self.name(), ty));
        }
        let array = match current {
            Value::Null => ctx.create_instance(ty, parent)?,
            Value::Array(_) if current.is_empty() => ctx.create_instance(ty, parent)?,
            Value::Array(_) => current.clone(),
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };
        let Value::Array(data) = &array else {
            return Err(PopulateError::unsupported(self.name(), ty));
        };

        let component = match ty.component() {
            Some(TypeArg::Type(component)) => component.clone(),
            _ => data.borrow().component().clone(),
        };
        let component = if component.is_fully_resolved() {
            component
        } else {
            TypeDescriptor::raw(builtin::OBJECT)
        };

        let items = data.borrow().items.clone();
        for (index, item) in items.into_iter().enumerate() {
            let changed = ctx.mutate(&component, &item, None)?;
            if changed != item {
                if let Some(slot) = data.borrow_mut().items.get_mut(index) {
                    *slot = changed;
                }
            }
        }
        Ok(array)
    }

    fn name(&self) -> &'static str {
        "array"
    }
}
