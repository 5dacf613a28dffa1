//! Primitive mutation

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::TypeDescriptor;
use populace_walk::Value;

/// Changes primitive values
///
/// Null and zero values are seeded: numbers become 1, `bool` becomes `true`
/// and `char` becomes `'a'`. Other values move on: integers add one
/// (wrapping), booleans toggle, characters advance to the next code point
/// (wrapping to `'a'`), floats scale by 1.5, falling back to 1.0 when the
/// result would not be finite or not differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangePrimitiveMutator;

impl Mutator for ChangePrimitiveMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        _ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let current = if current.is_null() {
            Value::zero_of(ty.raw_name())
        } else {
            current.clone()
        };
        if current.runtime_type().as_ref() != Some(ty.raw_name()) {
            return Err(PopulateError::unsupported(self.name(), ty));
        }

        let changed = match current {
            Value::Bool(v) => Value::Bool(!v),
            Value::Char(c) => Value::Char(next_char(c)),
            Value::I8(v) => Value::I8(v.wrapping_add(1)),
            Value::I16(v) => Value::I16(v.wrapping_add(1)),
            Value::I32(v) => Value::I32(v.wrapping_add(1)),
            Value::I64(v) => Value::I64(v.wrapping_add(1)),
            Value::U8(v) => Value::U8(v.wrapping_add(1)),
            Value::U16(v) => Value::U16(v.wrapping_add(1)),
            Value::U32(v) => Value::U32(v.wrapping_add(1)),
            Value::U64(v) => Value::U64(v.wrapping_add(1)),
            Value::F32(v) => {
                let scaled = v * 1.5;
                Value::F32(if scaled.is_finite() && scaled != v { scaled } else { 1.0 })
            }
            Value::F64(v) => {
                let scaled = v * 1.5;
                Value::F64(if scaled.is_finite() && scaled != v { scaled } else { 1.0 })
            }
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };
        Ok(changed)
    }

    fn name(&self) -> &'static str {
        "change_primitive"
    }
}

fn next_char(c: char) -> char {
    if c == '\0' {
        return 'a';
    }
    char::from_u32(u32::from(c) + 1).unwrap_or('a')
}
