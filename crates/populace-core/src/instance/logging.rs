//! Logging decorator

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use populace_types::{TypeDescriptor, TypeRegistry};
use populace_walk::Value;
use std::sync::Arc;

/// Logs every creation request and its outcome, then defers to `inner`
#[derive(Debug, Clone)]
pub struct LoggingInstanceFactory {
    inner: Arc<dyn InstanceFactory>,
}

impl LoggingInstanceFactory {
    /// Wrap `inner`
    #[must_use]
    pub fn new(inner: impl InstanceFactory + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl InstanceFactory for LoggingInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        let result = self.inner.create(ty, parent, factories, types);
        match &result {
            Ok(Some(value)) => {
                tracing::debug!("{} created {:?} for {}", self.inner.name(), value, ty);
            }
            Ok(None) => tracing::debug!("{} declined {}", self.inner.name(), ty),
            Err(err) => tracing::warn!("{} failed for {}: {}", self.inner.name(), ty, err),
        }
        result
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}
