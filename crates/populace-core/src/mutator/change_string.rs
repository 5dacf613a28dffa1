//! String mutation

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::{builtin, TypeDescriptor};
use populace_walk::Value;

const SEED: &str = "populace";
const SUFFIX: &str = " - populace";

/// Changes strings: null becomes `"populace"`, anything else gets
/// `" - populace"` appended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeStringMutator;

impl Mutator for ChangeStringMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        _ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        if ty.raw_name() != builtin::STRING {
            return Err(PopulateError::unsupported(self.name(), ty));
        }
        match current {
            Value::Null => Ok(Value::string(SEED)),
            Value::String(s) => Ok(Value::String(format!("{s}{SUFFIX}"))),
            _ => Err(PopulateError::unsupported(self.name(), ty)),
        }
    }

    fn name(&self) -> &'static str {
        "change_string"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn change(ty: &str, current: &Value) -> Result<Value, PopulateError> {
        ChangeStringMutator.mutate(
            &TypeDescriptor::raw(ty),
            current,
            None,
            &PopulatorContext::default(),
        )
    }

    #[test]
    fn null_is_seeded() {
        assert_eq!(change(builtin::STRING, &Value::Null).unwrap(), Value::from("populace"));
    }

    #[test]
    fn existing_value_is_extended() {
        assert_eq!(
            change(builtin::STRING, &Value::from("ada")).unwrap(),
            Value::from("ada - populace")
        );
    }

    #[test]
    fn other_types_are_unsupported() {
        assert!(change(builtin::DATE, &Value::Null).is_err());
        assert!(change(builtin::STRING, &Value::I32(1)).is_err());
    }

    proptest! {
        #[test]
        fn always_changes(s in ".*") {
            let changed = change(builtin::STRING, &Value::from(s.as_str())).unwrap();
            prop_assert_ne!(changed, Value::from(s));
        }
    }
}
