//! Mutation of container contents

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::{builtin, TypeDescriptor};
use populace_walk::Value;

/// Changes every item of a list in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeListElementsMutator;

impl Mutator for ChangeListElementsMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let list = match current {
            Value::Null => return Ok(Value::Null),
            Value::List(list) => list,
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };

        let element_type = ctx.element_type(ty, current, builtin::COLLECTION, 0);
        let items = list.borrow().items.clone();
        for (index, item) in items.into_iter().enumerate() {
            let changed = ctx.mutate(&element_type, &item, None)?;
            if changed != item {
                if let Some(slot) = list.borrow_mut().items.get_mut(index) {
                    *slot = changed;
                }
            }
        }
        Ok(current.clone())
    }

    fn name(&self) -> &'static str {
        "change_list_elements"
    }
}

/// Changes every member of a set in place
///
/// Members are replaced at their position. A replacement that is already a
/// member shrinks the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeSetElementsMutator;

impl Mutator for ChangeSetElementsMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let set = match current {
            Value::Null => return Ok(Value::Null),
            Value::Set(set) => set,
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };

        let element_type = ctx.element_type(ty, current, builtin::COLLECTION, 0);
        let members = current.items();
        for member in members {
            let changed = ctx.mutate(&element_type, &member, None)?;
            if changed != member {
                set.borrow_mut().replace(&member, changed);
            }
        }
        Ok(current.clone())
    }

    fn name(&self) -> &'static str {
        "change_set_elements"
    }
}

/// Changes every value of a map in place, keeping the keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeMapValuesMutator;

impl Mutator for ChangeMapValuesMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let map = match current {
            Value::Null => return Ok(Value::Null),
            Value::Map(map) => map,
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };

        let value_type = ctx.element_type(ty, current, builtin::MAP, 1);
        let entries: Vec<(Value, Value)> = map
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in entries {
            let changed = ctx.mutate(&value_type, &value, None)?;
            if changed != value {
                if let Some(slot) = map.borrow_mut().entries.get_mut(&key) {
                    *slot = changed;
                }
            }
        }
        Ok(current.clone())
    }

    fn name(&self) -> &'static str {
        "change_map_values"
    }
}
