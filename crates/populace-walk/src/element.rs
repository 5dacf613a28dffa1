//! Container element descriptors

use crate::error::AccessError;
use crate::path::WalkerPath;
use crate::value::Value;
use populace_types::{TypeArg, TypeContext, TypeDescriptor};

/// Writable position inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSlot {
    /// List item by index
    ListItem(usize),

    /// Array slot by index
    ArraySlot(usize),

    /// Set member; writing removes it and inserts the replacement
    SetMember(Value),

    /// Map value under a fixed key
    MapValue(Value),
}

/// Element of a container as reported by an inspector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    slot: ElementSlot,
    declared_type: TypeArg,
}

impl RawElement {
    /// Create element at `slot` whose declared type is `declared_type`
    #[inline]
    #[must_use]
    pub fn new(slot: ElementSlot, declared_type: TypeArg) -> Self {
        Self {
            slot,
            declared_type,
        }
    }

    /// Position in the container
    #[inline]
    #[must_use]
    pub fn slot(&self) -> &ElementSlot {
        &self.slot
    }

    /// Declared element type, possibly an unresolved variable
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> &TypeArg {
        &self.declared_type
    }
}

/// Element of a specific container, valid for one visit
#[derive(Debug, Clone)]
pub struct ElementInfo {
    slot: ElementSlot,
    generic_type: TypeDescriptor,
    container: Value,
    path: WalkerPath,
}

impl ElementInfo {
    /// Bind `raw` to `container`
    #[must_use]
    pub fn new(raw: RawElement, generic_type: TypeDescriptor, container: Value, path: WalkerPath) -> Self {
        Self {
            slot: raw.slot,
            generic_type,
            container,
            path,
        }
    }

    /// Position in the container
    #[inline]
    #[must_use]
    pub fn slot(&self) -> &ElementSlot {
        &self.slot
    }

    /// Element type with type variables resolved against the container
    #[inline]
    #[must_use]
    pub fn generic_type(&self) -> &TypeDescriptor {
        &self.generic_type
    }

    pub(crate) fn set_generic_type(&mut self, ty: TypeDescriptor) {
        self.generic_type = ty;
    }

    /// Container holding the element
    #[inline]
    #[must_use]
    pub fn container(&self) -> &Value {
        &self.container
    }

    /// Path to this element
    #[inline]
    #[must_use]
    pub fn path(&self) -> &WalkerPath {
        &self.path
    }

    /// Current value
    ///
    /// # Errors
    /// Returns error if the slot no longer exists or the container is
    /// mutably borrowed
    pub fn get(&self) -> Result<Value, AccessError> {
        match (&self.slot, &self.container) {
            (ElementSlot::ListItem(index), Value::List(list)) => {
                let list = list.try_borrow().map_err(|_| AccessError::Borrowed)?;
                indexed(&list.items, *index)
            }
            (ElementSlot::ArraySlot(index), Value::Array(array)) => {
                let array = array.try_borrow().map_err(|_| AccessError::Borrowed)?;
                indexed(&array.items, *index)
            }
            (ElementSlot::SetMember(member), Value::Set(_)) => Ok(member.clone()),
            (ElementSlot::MapValue(key), Value::Map(map)) => {
                let map = map.try_borrow().map_err(|_| AccessError::Borrowed)?;
                map.entries.get(key).cloned().ok_or(AccessError::MissingElement)
            }
            (slot, container) => Err(mismatch(slot, container)),
        }
    }

    /// Replace the current value
    ///
    /// Set members are removed and the replacement inserted at the same
    /// position; map keys are kept.
    ///
    /// # Errors
    /// Returns error if the slot no longer exists or the container is
    /// borrowed
    pub fn set(&mut self, value: Value) -> Result<(), AccessError> {
        match (&mut self.slot, &self.container) {
            (ElementSlot::ListItem(index), Value::List(list)) => {
                let mut list = list.try_borrow_mut().map_err(|_| AccessError::Borrowed)?;
                store(&mut list.items, *index, value)
            }
            (ElementSlot::ArraySlot(index), Value::Array(array)) => {
                let mut array = array.try_borrow_mut().map_err(|_| AccessError::Borrowed)?;
                store(&mut array.items, *index, value)
            }
            (ElementSlot::SetMember(member), Value::Set(set)) => {
                let mut set = set.try_borrow_mut().map_err(|_| AccessError::Borrowed)?;
                set.replace(member, value.clone());
                *member = value;
                Ok(())
            }
            (ElementSlot::MapValue(key), Value::Map(map)) => {
                let mut map = map.try_borrow_mut().map_err(|_| AccessError::Borrowed)?;
                let entry = map.entries.get_mut(key).ok_or(AccessError::MissingElement)?;
                *entry = value;
                Ok(())
            }
            (slot, container) => Err(mismatch(slot, container)),
        }
    }

    /// Binding context of `value` held in this element
    #[must_use]
    pub fn context_of(&self, value: &Value) -> TypeContext {
        let raw = value
            .runtime_type()
            .unwrap_or_else(|| self.generic_type.raw_name().clone());
        TypeContext::new(raw, Some(self.generic_type.clone()))
    }
}

fn indexed(items: &[Value], index: usize) -> Result<Value, AccessError> {
    items.get(index).cloned().ok_or(AccessError::IndexOutOfBounds {
        index,
        len: items.len(),
    })
}

fn store(items: &mut [Value], index: usize, value: Value) -> Result<(), AccessError> {
    let len = items.len();
    let slot = items
        .get_mut(index)
        .ok_or(AccessError::IndexOutOfBounds { index, len })?;
    *slot = value;
    Ok(())
}

fn mismatch(slot: &ElementSlot, container: &Value) -> AccessError {
    let expected = match slot {
        ElementSlot::ListItem(_) => "list",
        ElementSlot::ArraySlot(_) => "array",
        ElementSlot::SetMember(_) => "set",
        ElementSlot::MapValue(_) => "map",
    };
    AccessError::WrongContainer {
        expected,
        found: container.type_label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use populace_types::builtin;

    fn info(slot: ElementSlot, container: &Value) -> ElementInfo {
        ElementInfo::new(
            RawElement::new(slot, TypeArg::from(builtin::STRING)),
            TypeDescriptor::raw(builtin::STRING),
            container.clone(),
            WalkerPath::root(builtin::ARRAY_LIST).element(0),
        )
    }

    #[test]
    fn list_item_read_write() {
        let list = Value::list(builtin::ARRAY_LIST, [Value::from("a")]);
        let mut element = info(ElementSlot::ListItem(0), &list);
        element.set(Value::from("b")).unwrap();
        assert_eq!(element.get().unwrap(), Value::from("b"));
        assert_eq!(list.items(), vec![Value::from("b")]);
    }

    #[test]
    fn out_of_bounds() {
        let array = Value::array(builtin::STRING, []);
        let err = info(ElementSlot::ArraySlot(1), &array).get().unwrap_err();
        assert_eq!(err, AccessError::IndexOutOfBounds { index: 1, len: 0 });
    }

    #[test]
    fn set_member_tracks_replacement() {
        let set = Value::set(builtin::HASH_SET, [Value::from("a"), Value::from("b")]);
        let mut element = info(ElementSlot::SetMember(Value::from("a")), &set);
        element.set(Value::from("z")).unwrap();
        assert_eq!(element.get().unwrap(), Value::from("z"));
        assert_eq!(set.items(), vec![Value::from("z"), Value::from("b")]);
    }

    #[test]
    fn map_value_keeps_key() {
        let map = Value::map(builtin::HASH_MAP, [(Value::from("k"), Value::I32(1))]);
        let mut element = info(ElementSlot::MapValue(Value::from("k")), &map);
        element.set(Value::I32(2)).unwrap();

        let Value::Map(data) = &map else { unreachable!() };
        let entries: Vec<_> = data.borrow().entries.clone().into_iter().collect();
        assert_eq!(entries, vec![(Value::from("k"), Value::I32(2))]);
    }

    #[test]
    fn wrong_container() {
        let list = Value::list(builtin::ARRAY_LIST, []);
        let err = info(ElementSlot::MapValue(Value::Null), &list).get().unwrap_err();
        assert!(matches!(err, AccessError::WrongContainer { expected: "map", .. }));
    }
}
