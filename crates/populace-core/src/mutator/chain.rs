//! Mutator composition

use super::Mutator;
use crate::context::PopulatorContext;
use crate::error::PopulateError;
use populace_types::TypeDescriptor;
use populace_walk::Value;
use std::sync::Arc;

/// Applies mutators in order, each receiving the previous result
#[derive(Debug, Clone)]
pub struct ChainMutator {
    mutators: Vec<Arc<dyn Mutator>>,
}

impl ChainMutator {
    /// Chain `first` then `second`
    #[must_use]
    pub fn new(first: impl Mutator + 'static, second: impl Mutator + 'static) -> Self {
        Self {
            mutators: vec![Arc::new(first), Arc::new(second)],
        }
    }

    /// Append `next` to the chain
    #[must_use]
    pub fn then(mut self, next: impl Mutator + 'static) -> Self {
        self.mutators.push(Arc::new(next));
        self
    }

    /// Names of the chained mutators, in order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.mutators.iter().map(|m| m.name()).collect()
    }
}

impl Mutator for ChainMutator {
    fn mutate(
        &self,
        ty: &TypeDescriptor,
        current: &Value,
        parent: Option<&Value>,
        ctx: &PopulatorContext,
    ) -> Result<Value, PopulateError> {
        self.mutators.iter().try_fold(current.clone(), |value, mutator| {
            mutator.mutate(ty, &value, parent, ctx)
        })
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
