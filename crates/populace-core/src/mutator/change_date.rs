//! Date mutation

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use chrono::{DateTime, Duration, Utc};
use populace_types::{builtin, TypeDescriptor};
use populace_walk::Value;

/// Seed instant, 2015-01-01T00:00:00Z
const SEED_SECONDS: i64 = 1_420_070_400;

const STEP_SECONDS: i64 = 10;

/// Instant given to dates created from nothing
pub(crate) fn seed_date() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(SEED_SECONDS, 0).unwrap_or_default()
}

/// Changes dates: null becomes a fixed seed instant, anything else moves ten
/// seconds forward (back to the seed on overflow)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeDateMutator;

impl Mutator for ChangeDateMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        _parent: Option<&Value>,
        _ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        if ty.raw_name() != builtin::DATE {
            return Err(PopulateError::unsupported(self.name(), ty));
        }
        match current {
            Value::Null => Ok(Value::Date(seed_date())),
            Value::Date(date) => Ok(Value::Date(
                date.checked_add_signed(Duration::seconds(STEP_SECONDS))
                    .unwrap_or_else(seed_date),
            )),
            _ => Err(PopulateError::unsupported(self.name(), ty)),
        }
    }

    fn name(&self) -> &'static str {
        "change_date"
    }
}
