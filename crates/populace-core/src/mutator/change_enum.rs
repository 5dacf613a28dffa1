//! Enumeration mutation

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::TypeDescriptor;
use populace_walk::{EnumValue, Value};

/// Moves enumeration values to the next constant, wrapping to the first
///
/// Null becomes the first constant of the declared type. The constants of
/// the value's own type are used when it is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeEnumMutator;

impl Mutator for ChangeEnumMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        let (enum_type, next) = match current {
            Value::Null => (ty.raw_name().clone(), 0),
            Value::Enum(value) => (value.ty().clone(), value.ordinal() + 1),
            _ => return Err(PopulateError::unsupported(self.name(), ty)),
        };

        let constants = ctx.types().enum_constants(&enum_type);
        if constants.is_empty() {
            return Err(PopulateError::unsupported(self.name(), ty));
        }
        let ordinal = next % constants.len();
        Ok(Value::Enum(EnumValue::new(enum_type, ordinal, &constants[ordinal])))
    }

    fn name(&self) -> &'static str {
        "change_enum"
    }
}
