//! Graph population
//!
//! [`GraphPopulator`] walks a graph and, for every field and element it
//! reaches, replaces the current value with the output of the mutator
//! registered for its declared type.

use crate::context::PopulatorContext;
use crate::error::{ConfigError, PopulateError};
use crate::instance::{InstanceFactories, InstanceFactoriesBuilder};
use crate::mutator::{Mutators, MutatorsBuilder};
use populace_types::{ClassDef, TypeDescriptor, TypeRegistry};
use populace_walk::{
    CyclePolicy, ElementInfo, FieldFilter, FieldInfo, GraphWalker, GraphWalkerBuilder, Inspectors,
    InspectorsBuilder, Value, VisitError, Visitor, WalkerError,
};
use std::sync::Arc;

/// Immutable populator configuration
#[derive(Debug, Clone)]
pub struct GraphPopulator {
    walker: GraphWalker,
    context: PopulatorContext,
}

impl Default for GraphPopulator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraphPopulator {
    /// Builder with default configuration over the built-in types
    #[must_use]
    pub fn builder() -> GraphPopulatorBuilder {
        GraphPopulatorBuilder {
            walker: GraphWalker::builder(),
            mutators: Mutators::defaults(),
            instance_factories: InstanceFactories::defaults(),
        }
    }

    /// Builder seeded with this configuration
    #[must_use]
    pub fn to_builder(&self) -> GraphPopulatorBuilder {
        GraphPopulatorBuilder {
            walker: self.walker.to_builder(),
            mutators: self.context.mutators().clone(),
            instance_factories: self.context.instance_factories().clone(),
        }
    }

    /// Walker used for traversal
    #[inline]
    #[must_use]
    pub fn walker(&self) -> &GraphWalker {
        &self.walker
    }

    /// Context handed to mutators
    #[inline]
    #[must_use]
    pub fn context(&self) -> &PopulatorContext {
        &self.context
    }

    /// Populate every field and element reachable from `root`, in place
    ///
    /// Returns `root` itself. The root value is not replaced, only what it
    /// reaches.
    ///
    /// # Errors
    /// Returns [`PopulateError::Field`] or [`PopulateError::Element`] with
    /// the path of the first slot that could not be populated, or
    /// [`PopulateError::Walk`] if traversal failed
    pub fn populate(&self, root: Value) -> Result<Value, PopulateError> {
        self.populate_declared(root, None)
    }

    /// Create an instance of `ty`, then populate it
    ///
    /// # Errors
    /// Returns [`ConfigError::InnerClass`] for non-static inner classes,
    /// [`ConfigError::Type`] for malformed descriptors, a creation error if
    /// no instance can be made, or any [`GraphPopulator::populate`] error
    pub fn populate_type(&self, ty: &TypeDescriptor) -> Result<Value, PopulateError> {
        let types = self.context.types();
        types.validate(ty).map_err(ConfigError::from)?;
        if types.get(ty.raw_name()).and_then(ClassDef::enclosing).is_some() {
            return Err(ConfigError::InnerClass(ty.raw_name().clone()).into());
        }

        let instance = self.context.create_instance(ty, None)?;
        self.populate_declared(instance, Some(ty))
    }

    fn populate_declared(
        &self,
        root: Value,
        declared: Option<&TypeDescriptor>,
    ) -> Result<Value, PopulateError> {
        tracing::info!("Populating {:?}", root);
        let mut visitor = PopulateVisitor {
            context: &self.context,
        };
        self.walker
            .walk_declared(&root, declared, &mut visitor)
            .map_err(unwrap_visit_error)?;
        tracing::info!("Populated {:?}", root);
        Ok(root)
    }
}

/// Surface the populator's own error from a failed visit
fn unwrap_visit_error(err: WalkerError) -> PopulateError {
    match err {
        WalkerError::Visit { path, source } => match source.downcast::<PopulateError>() {
            Ok(inner) => *inner,
            Err(source) => PopulateError::Walk(WalkerError::Visit { path, source }),
        },
        other => PopulateError::Walk(other),
    }
}

struct PopulateVisitor<'a> {
    context: &'a PopulatorContext,
}

impl PopulateVisitor<'_> {
    fn populate_field(&self, field: &FieldInfo) -> Result<(), PopulateError> {
        let current = field.get()?;
        let mutated = self
            .context
            .mutate(field.generic_type(), &current, Some(field.owner()))?;
        if mutated != current {
            field.set(mutated)?;
        }
        Ok(())
    }

    fn populate_element(&self, element: &mut ElementInfo) -> Result<(), PopulateError> {
        let current = element.get()?;
        let mutated = self.context.mutate(element.generic_type(), &current, None)?;
        if mutated != current {
            element.set(mutated)?;
        }
        Ok(())
    }
}

impl Visitor for PopulateVisitor<'_> {
    fn visit_field(&mut self, field: &FieldInfo) -> Result<(), VisitError> {
        self.populate_field(field).map_err(|source| {
            boxed(PopulateError::Field {
                path: field.path().clone(),
                source: Box::new(source),
            })
        })
    }

    fn visit_element(&mut self, element: &mut ElementInfo) -> Result<(), VisitError> {
        self.populate_element(element).map_err(|source| {
            boxed(PopulateError::Element {
                path: element.path().clone(),
                source: Box::new(source),
            })
        })
    }
}

fn boxed(err: PopulateError) -> VisitError {
    Box::new(err)
}

/// Builder for [`GraphPopulator`]
#[derive(Debug, Clone)]
pub struct GraphPopulatorBuilder {
    walker: GraphWalkerBuilder,
    mutators: Mutators,
    instance_factories: InstanceFactories,
}

impl GraphPopulatorBuilder {
    /// Use `types` for all type lookups
    #[inline]
    #[must_use]
    pub fn with_types(mut self, types: impl Into<Arc<TypeRegistry>>) -> Self {
        self.walker = self.walker.with_types(types);
        self
    }

    /// Replace the field filter
    #[inline]
    #[must_use]
    pub fn with_field_filter(mut self, filter: FieldFilter) -> Self {
        self.walker = self.walker.with_field_filter(filter);
        self
    }

    /// Current field filter, for combining with another
    #[inline]
    #[must_use]
    pub fn field_filter(&self) -> &FieldFilter {
        self.walker.field_filter()
    }

    /// Replace the inspectors
    #[inline]
    #[must_use]
    pub fn with_inspectors(mut self, inspectors: Inspectors) -> Self {
        self.walker = self.walker.with_inspectors(inspectors);
        self
    }

    /// Builder over a copy of the current inspectors
    #[inline]
    #[must_use]
    pub fn inspectors_builder(&self) -> InspectorsBuilder {
        self.walker.inspectors_builder()
    }

    /// Replace the mutators
    #[inline]
    #[must_use]
    pub fn with_mutators(mut self, mutators: Mutators) -> Self {
        self.mutators = mutators;
        self
    }

    /// Builder over a copy of the current mutators
    #[inline]
    #[must_use]
    pub fn mutators_builder(&self) -> MutatorsBuilder {
        self.mutators.to_builder()
    }

    /// Replace the instance factories
    #[inline]
    #[must_use]
    pub fn with_instance_factories(mut self, instance_factories: InstanceFactories) -> Self {
        self.instance_factories = instance_factories;
        self
    }

    /// Builder over a copy of the current instance factories
    #[inline]
    #[must_use]
    pub fn instance_factories_builder(&self) -> InstanceFactoriesBuilder {
        self.instance_factories.to_builder()
    }

    /// Set the cycle policy
    #[inline]
    #[must_use]
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.walker = self.walker.with_cycle_policy(policy);
        self
    }

    /// Freeze the configuration
    #[must_use]
    pub fn build(self) -> GraphPopulator {
        let walker = self.walker.build();
        let context = PopulatorContext::new(
            Arc::clone(walker.types()),
            self.mutators,
            self.instance_factories,
        );
        GraphPopulator { walker, context }
    }
}
