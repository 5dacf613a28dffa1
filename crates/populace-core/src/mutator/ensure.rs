//! Mutators that make sure a value exists

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::{builtin, TypeDescriptor};
use populace_walk::Value;

/// Creates an instance when the current value is null; keeps it otherwise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnsureMutator;

impl Mutator for EnsureMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        if !current.is_null() {
            return Ok(current.clone());
        }
        Ok(ctx.create_instance(ty, parent)?)
    }

    fn name(&self) -> &'static str {
        "ensure"
    }
}

/// Adds one populated element to an empty list or set
///
/// The element type is the collection's resolved `E`. Null collections and
/// elements that populate to null are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnsureCollectionNotEmptyMutator;

impl Mutator for EnsureCollectionNotEmptyMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        match current {
            Value::Null => return Ok(Value::Null),
            Value::List(_) | Value::Set(_) if current.is_empty() => {}
            Value::List(_) | Value::Set(_) => return Ok(current.clone()),
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        }

        let element_type = ctx.element_type(ty, current, builtin::COLLECTION, 0);
        let element = populated(&element_type, ctx)?;
        if element.is_null() {
            tracing::debug!("No element could be created for {}, leaving it empty", ty);
            return Ok(current.clone());
        }

        match current {
            Value::List(list) => list.borrow_mut().items.push(element),
            Value::Set(set) => {
                set.borrow_mut().items.insert(element);
            }
            _ => {}
        }
        Ok(current.clone())
    }

    fn name(&self) -> &'static str {
        "ensure_collection_not_empty"
    }
}

/// Adds one populated entry to an empty map
///
/// Key and value types are the map's resolved `K` and `V`. Entries whose key
/// populates to null are not added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnsureMapNotEmptyMutator;

impl Mutator for EnsureMapNotEmptyMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let Value::Map(map) = current else {
            return match current {
                Value::Null => Ok(Value::Null),
                _ => Err(PopulateError::unsupported(self.name(), ty)),
            };
        };
        if !current.is_empty() {
            return Ok(current.clone());
        }

        let key = populated(&ctx.element_type(ty, current, builtin::MAP, 0), ctx)?;
        if key.is_null() {
            tracing::debug!("No key could be created for {}, leaving it empty", ty);
            return Ok(current.clone());
        }
        let value = populated(&ctx.element_type(ty, current, builtin::MAP, 1), ctx)?;
        map.borrow_mut().entries.insert(key, value);
        Ok(current.clone())
    }

    fn name(&self) -> &'static str {
        "ensure_map_not_empty"
    }
}

fn populated(ty: &TypeDescriptor, ctx: &PopulatorContext) -> Result<Value, PopulateError> {
    let created = ctx.create_instance(ty, None)?;
    ctx.mutate(ty, &created, None)
}
