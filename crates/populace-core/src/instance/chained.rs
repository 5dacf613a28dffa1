//! Factory chaining

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{TypeDescriptor, TypeRegistry};
use populace_walk::Value;
use std::sync::Arc;

/// Tries `first`, falling back to `second` when `first` declines
///
/// Errors from `first` are returned as is; only `Ok(None)` falls through.
#[derive(Debug, Clone)]
pub struct ChainedInstanceFactory {
    first: Arc<dyn InstanceFactory>,
    second: Arc<dyn InstanceFactory>,
}

impl ChainedInstanceFactory {
    /// Chain two factories
    #[must_use]
    pub fn new(first: impl InstanceFactory + 'static, second: impl InstanceFactory + 'static) -> Self {
        Self {
            first: Arc::new(first),
            second: Arc::new(second),
        }
    }
}

impl InstanceFactory for ChainedInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        if let Some(value) = self.first.create(ty, parent, factories, types)? {
            return Ok(Some(value));
        }
        self.second.create(ty, parent, factories, types)
    }

    fn name(&self) -> &'static str {
        "chained"
    }
}
