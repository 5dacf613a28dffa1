//! Graph walker
//!
//! [`GraphWalker`] traverses an object graph depth first. For every value it
//! asks the configured [`Inspectors`] for fields and elements, calls the
//! [`Visitor`], re-reads the slot and descends into the result.
//!
//! # Cycles
//! The walker tracks the objects and containers on the active recursion
//! path. Reaching one of them again is handled by [`CyclePolicy`]. Shared
//! references that do not form a cycle are walked once per reference.
//!
//! It also tracks the declared types of the slots on that path. A field that
//! was null before its visit and was filled with a value of a slot type
//! already on the path (`Node.next` filled with a fresh `Node`) would
//! otherwise grow the graph without bound. Such a field is set back to null
//! under [`CyclePolicy::Skip`] and fails the walk under [`CyclePolicy::Fail`].

use crate::element::ElementInfo;
use crate::error::WalkerError;
use crate::field::FieldInfo;
use crate::filter::FieldFilter;
use crate::inspector::{Inspectors, InspectorsBuilder};
use crate::path::WalkerPath;
use crate::value::Value;
use crate::visitor::Visitor;
use populace_types::{builtin, TypeArg, TypeContext, TypeDescriptor, TypeRegistry, TypeResolver};
use std::collections::HashSet;
use std::sync::Arc;

/// Handling of a value reached again on its own recursion path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CyclePolicy {
    /// Do not descend again, and leave a self-repeating filled slot null
    /// (logged at debug level)
    #[default]
    Skip,

    /// Abort the walk with [`WalkerError::Cycle`]
    Fail,
}

/// Immutable walker configuration
#[derive(Debug, Clone)]
pub struct GraphWalker {
    types: Arc<TypeRegistry>,
    filter: FieldFilter,
    inspectors: Inspectors,
    cycle_policy: CyclePolicy,
}

impl Default for GraphWalker {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraphWalker {
    /// Builder with default configuration over the built-in types
    #[must_use]
    pub fn builder() -> GraphWalkerBuilder {
        GraphWalkerBuilder {
            types: Arc::new(TypeRegistry::builtin()),
            filter: FieldFilter::default(),
            inspectors: Inspectors::defaults(),
            cycle_policy: CyclePolicy::default(),
        }
    }

    /// Builder seeded with this configuration
    #[must_use]
    pub fn to_builder(&self) -> GraphWalkerBuilder {
        GraphWalkerBuilder {
            types: Arc::clone(&self.types),
            filter: self.filter.clone(),
            inspectors: self.inspectors.clone(),
            cycle_policy: self.cycle_policy,
        }
    }

    /// Type registry
    #[inline]
    #[must_use]
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Field filter
    #[inline]
    #[must_use]
    pub fn field_filter(&self) -> &FieldFilter {
        &self.filter
    }

    /// Inspector configuration
    #[inline]
    #[must_use]
    pub fn inspectors(&self) -> &Inspectors {
        &self.inspectors
    }

    /// Cycle policy
    #[inline]
    #[must_use]
    pub fn cycle_policy(&self) -> CyclePolicy {
        self.cycle_policy
    }

    /// Walk the graph reachable from `root`
    ///
    /// # Errors
    /// Returns the first visitor, inspector or access failure, or a cycle
    /// under [`CyclePolicy::Fail`], with the path where it happened
    pub fn walk(&self, root: &Value, visitor: &mut dyn Visitor) -> Result<(), WalkerError> {
        self.walk_declared(root, None, visitor)
    }

    /// Walk `root` knowing the declared type of the slot it came from
    ///
    /// # Errors
    /// As [`GraphWalker::walk`]
    pub fn walk_declared(
        &self,
        root: &Value,
        declared: Option<&TypeDescriptor>,
        visitor: &mut dyn Visitor,
    ) -> Result<(), WalkerError> {
        let Some(root_type) = root.runtime_type() else {
            return Ok(());
        };
        let declared = declared.cloned().or_else(|| root.runtime_descriptor());
        let ctx = TypeContext::new(root_type.clone(), declared);
        let path = WalkerPath::root(root_type);

        tracing::debug!("Walking graph from {}", path);
        let mut walk = Walk {
            walker: self,
            resolver: TypeResolver::new(&self.types),
            visitor,
            active: HashSet::new(),
            active_types: Vec::new(),
        };
        walk.value(root, &ctx, &path)
    }
}

/// Builder for [`GraphWalker`]
#[derive(Debug, Clone)]
pub struct GraphWalkerBuilder {
    types: Arc<TypeRegistry>,
    filter: FieldFilter,
    inspectors: Inspectors,
    cycle_policy: CyclePolicy,
}

impl GraphWalkerBuilder {
    /// Use `types` for field and ancestry lookups
    #[inline]
    #[must_use]
    pub fn with_types(mut self, types: impl Into<Arc<TypeRegistry>>) -> Self {
        self.types = types.into();
        self
    }

    /// Replace the field filter
    #[inline]
    #[must_use]
    pub fn with_field_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Current field filter, for combining with another
    #[inline]
    #[must_use]
    pub fn field_filter(&self) -> &FieldFilter {
        &self.filter
    }

    /// Replace the inspectors
    #[inline]
    #[must_use]
    pub fn with_inspectors(mut self, inspectors: Inspectors) -> Self {
        self.inspectors = inspectors;
        self
    }

    /// Builder over a copy of the current inspectors
    #[inline]
    #[must_use]
    pub fn inspectors_builder(&self) -> InspectorsBuilder {
        self.inspectors.to_builder()
    }

    /// Set the cycle policy
    #[inline]
    #[must_use]
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Freeze the configuration
    #[must_use]
    pub fn build(self) -> GraphWalker {
        GraphWalker {
            types: self.types,
            filter: self.filter,
            inspectors: self.inspectors,
            cycle_policy: self.cycle_policy,
        }
    }
}

struct Walk<'w, 'v> {
    walker: &'w GraphWalker,
    resolver: TypeResolver<'w>,
    visitor: &'v mut dyn Visitor,
    active: HashSet<usize>,
    active_types: Vec<TypeDescriptor>,
}

impl Walk<'_, '_> {
    fn value(&mut self, value: &Value, ctx: &TypeContext, path: &WalkerPath) -> Result<(), WalkerError> {
        let identity = value.identity();
        if let Some(id) = identity {
            if !self.active.insert(id) {
                return match self.walker.cycle_policy {
                    CyclePolicy::Skip => {
                        tracing::debug!("Cycle at {}, not descending", path);
                        Ok(())
                    }
                    CyclePolicy::Fail => Err(WalkerError::Cycle { path: path.clone() }),
                };
            }
        }

        let slot_type = ctx
            .declared()
            .cloned()
            .unwrap_or_else(|| self.resolver.descriptor(ctx));
        self.active_types.push(slot_type);
        let result = self.children(value, ctx, path);
        self.active_types.pop();
        if let Some(id) = identity {
            self.active.remove(&id);
        }
        result
    }

    fn children(&mut self, value: &Value, ctx: &TypeContext, path: &WalkerPath) -> Result<(), WalkerError> {
        let walker = self.walker;
        let types = &*walker.types;
        let descriptor = self.resolver.descriptor(ctx);
        let inspector = walker.inspectors.get(&descriptor, types);
        tracing::trace!("Inspecting {} as {} with {}", path, descriptor, inspector.name());

        if let Value::Object(_) = value {
            let fields = inspector
                .fields(ctx.raw_name(), types)
                .map_err(|source| WalkerError::Inspect {
                    path: path.clone(),
                    source,
                })?;

            for raw in fields {
                let field_path = path.field(raw.shared_name());
                let current = raw.get(value).map_err(|source| WalkerError::Access {
                    path: field_path.clone(),
                    source,
                })?;
                let generic = concrete(self.resolver.resolve(raw.declared_type(), ctx), &current);
                let was_null = current.is_null();
                let info = FieldInfo::new(raw, generic, value.clone(), field_path);

                if !walker.filter.include(&info) {
                    tracing::trace!("Field {} excluded by filter", info.path());
                    continue;
                }
                self.field(&info, was_null)?;
            }
        }

        if value.len().is_some() {
            let elements = inspector
                .elements(value, ctx, &self.resolver)
                .map_err(|source| WalkerError::Inspect {
                    path: path.clone(),
                    source,
                })?;

            for (index, raw) in elements.into_iter().enumerate() {
                let declared = self.resolver.resolve(raw.declared_type(), ctx);
                let mut info = ElementInfo::new(raw, TypeDescriptor::raw(builtin::OBJECT), value.clone(), path.element(index));
                let current = info.get().map_err(|source| WalkerError::Access {
                    path: info.path().clone(),
                    source,
                })?;
                if current.is_null() {
                    tracing::trace!("Element {} is null, skipping", info.path());
                    continue;
                }
                info.set_generic_type(concrete(declared, &current));
                self.element(&mut info)?;
            }
        }
        Ok(())
    }

    fn field(&mut self, info: &FieldInfo, was_null: bool) -> Result<(), WalkerError> {
        tracing::debug!("Visiting field {} of type {}", info.path(), info.generic_type());
        self.visitor
            .visit_field(info)
            .map_err(|source| WalkerError::Visit {
                path: info.path().clone(),
                source,
            })?;

        let updated = info.get().map_err(|source| WalkerError::Access {
            path: info.path().clone(),
            source,
        })?;
        if updated.is_null() {
            tracing::trace!("Field {} is null, not descending", info.path());
            return Ok(());
        }
        if was_null && self.active_types.contains(info.generic_type()) {
            return self.repeated_fill(info);
        }
        self.value(&updated, &info.context_of(&updated), info.path())
    }

    /// Field filled with a type that already encloses it
    fn repeated_fill(&self, info: &FieldInfo) -> Result<(), WalkerError> {
        match self.walker.cycle_policy {
            CyclePolicy::Skip => {
                tracing::debug!(
                    "Field {} would repeat {} beneath itself, leaving it null",
                    info.path(),
                    info.generic_type()
                );
                info.set(Value::Null).map_err(|source| WalkerError::Access {
                    path: info.path().clone(),
                    source,
                })
            }
            CyclePolicy::Fail => Err(WalkerError::Cycle {
                path: info.path().clone(),
            }),
        }
    }

    fn element(&mut self, info: &mut ElementInfo) -> Result<(), WalkerError> {
        tracing::debug!("Visiting element {} of type {}", info.path(), info.generic_type());
        self.visitor
            .visit_element(info)
            .map_err(|source| WalkerError::Visit {
                path: info.path().clone(),
                source,
            })?;

        let updated = info.get().map_err(|source| WalkerError::Access {
            path: info.path().clone(),
            source,
        })?;
        if updated.is_null() {
            return Ok(());
        }
        self.value(&updated, &info.context_of(&updated), info.path())
    }
}

/// Unresolved variables fall back to the runtime type of the current value,
/// then to `std::Object`
fn concrete(arg: TypeArg, current: &Value) -> TypeDescriptor {
    match arg {
        TypeArg::Type(ty) => ty,
        TypeArg::Var(_) => current
            .runtime_descriptor()
            .unwrap_or_else(|| TypeDescriptor::raw(builtin::OBJECT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisitError;
    use populace_types::{ClassDef, FieldDef};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        visits: Vec<String>,
        fail_at: Option<&'static str>,
        fill_null: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn visit_field(&mut self, field: &FieldInfo) -> Result<(), VisitError> {
            let path = field.path().to_string();
            if self.fail_at == Some(field.name()) {
                return Err("boom".into());
            }
            if self.fill_null == Some(field.name()) && field.get()?.is_null() {
                field.set(Value::object("demo::Node"))?;
            }
            self.visits.push(format!("{path}: {}", field.generic_type()));
            Ok(())
        }

        fn visit_element(&mut self, element: &mut ElementInfo) -> Result<(), VisitError> {
            self.visits
                .push(format!("{}: {}", element.path(), element.generic_type()));
            Ok(())
        }
    }

    fn types() -> TypeRegistry {
        let boxed = ClassDef::concrete("demo::Box").type_param("T");
        let t = boxed.var("T");
        TypeRegistry::builder()
            .with_class(
                ClassDef::concrete("demo::Person")
                    .field(FieldDef::new("name", builtin::STRING))
                    .field(FieldDef::new(
                        "tags",
                        TypeDescriptor::parameterized(builtin::LIST, [builtin::STRING]),
                    ))
                    .field(FieldDef::new("cache", builtin::STRING).transient())
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::Node")
                    .field(FieldDef::new("next", "demo::Node"))
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::Pair")
                    .field(FieldDef::new("left", "demo::Node"))
                    .field(FieldDef::new("right", "demo::Node"))
                    .build(),
            )
            .with_class(boxed.field(FieldDef::new("value", t)).build())
            .with_class(
                ClassDef::concrete("demo::StringBox")
                    .extends(TypeDescriptor::parameterized("demo::Box", [builtin::STRING]))
                    .build(),
            )
            .build()
            .unwrap()
    }

    fn walker() -> GraphWalker {
        GraphWalker::builder().with_types(types()).build()
    }

    fn person() -> Value {
        Value::object("demo::Person")
            .with_field("name", Value::from("ada"))
            .unwrap()
            .with_field(
                "tags",
                Value::list(builtin::ARRAY_LIST, [Value::from("x"), Value::Null]),
            )
            .unwrap()
    }

    #[test]
    fn visits_fields_then_elements() {
        let mut recorder = Recorder::default();
        walker().walk(&person(), &mut recorder).unwrap();

        assert_eq!(
            recorder.visits,
            vec![
                "Person.name: std::String",
                "Person.tags: std::collections::List<std::String>",
                "Person.tags[0]: std::String",
            ]
        );
    }

    #[test]
    fn include_all_visits_transient_fields() {
        let walker = walker()
            .to_builder()
            .with_field_filter(FieldFilter::IncludeAll)
            .build();
        let mut recorder = Recorder::default();
        walker.walk(&person(), &mut recorder).unwrap();
        assert!(recorder.visits.contains(&"Person.cache: std::String".to_string()));
    }

    #[test]
    fn cycle_is_skipped_by_default() {
        let node = Value::object("demo::Node");
        node.as_object_mut().unwrap().set("next", node.clone());

        let mut recorder = Recorder::default();
        walker().walk(&node, &mut recorder).unwrap();
        assert_eq!(recorder.visits, vec!["Node.next: demo::Node"]);
    }

    #[test]
    fn cycle_fails_when_configured() {
        let node = Value::object("demo::Node");
        node.as_object_mut().unwrap().set("next", node.clone());

        let walker = walker().to_builder().with_cycle_policy(CyclePolicy::Fail).build();
        let err = walker.walk(&node, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, WalkerError::Cycle { .. }));
        assert_eq!(err.path().to_string(), "Node.next");
    }

    #[test]
    fn self_typed_fill_is_undone() {
        let node = Value::object("demo::Node");
        let mut recorder = Recorder {
            fill_null: Some("next"),
            ..Recorder::default()
        };

        walker().walk(&node, &mut recorder).unwrap();

        assert_eq!(recorder.visits, vec!["Node.next: demo::Node"]);
        assert_eq!(node.field("next").unwrap(), Value::Null);
    }

    #[test]
    fn self_typed_fill_fails_when_configured() {
        let walker = walker().to_builder().with_cycle_policy(CyclePolicy::Fail).build();
        let mut recorder = Recorder {
            fill_null: Some("next"),
            ..Recorder::default()
        };

        let err = walker.walk(&Value::object("demo::Node"), &mut recorder).unwrap_err();

        assert!(matches!(err, WalkerError::Cycle { .. }));
        assert_eq!(err.path().to_string(), "Node.next");
    }

    #[test]
    fn fill_of_a_different_type_is_descended() {
        let mut recorder = Recorder {
            fill_null: Some("left"),
            ..Recorder::default()
        };
        let pair = Value::object("demo::Pair");

        walker().walk(&pair, &mut recorder).unwrap();

        assert!(pair.field("left").unwrap().is_reference());
    }

    #[test]
    fn shared_references_are_walked_each_time() {
        let leaf = Value::object("demo::Node");
        let inner = Value::object("demo::Node").with_field("next", leaf).unwrap();
        let pair = Value::object("demo::Pair")
            .with_field("left", inner.clone())
            .unwrap()
            .with_field("right", inner)
            .unwrap();

        let mut recorder = Recorder::default();
        walker().walk(&pair, &mut recorder).unwrap();
        assert_eq!(
            recorder.visits,
            vec![
                "Pair.left: demo::Node",
                "Pair.left.next: demo::Node",
                "Pair.left.next.next: demo::Node",
                "Pair.right: demo::Node",
                "Pair.right.next: demo::Node",
                "Pair.right.next.next: demo::Node",
            ]
        );
    }

    #[test]
    fn visitor_failure_carries_path() {
        let mut recorder = Recorder {
            fail_at: Some("tags"),
            ..Recorder::default()
        };
        let err = walker().walk(&person(), &mut recorder).unwrap_err();
        assert!(matches!(err, WalkerError::Visit { .. }));
        assert_eq!(err.path().to_string(), "Person.tags");
        assert_eq!(recorder.visits.len(), 1);
    }

    #[test]
    fn replaced_values_are_descended() {
        let mut recorder = Recorder {
            fill_null: Some("left"),
            ..Recorder::default()
        };
        walker()
            .walk(&Value::object("demo::Pair"), &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.visits,
            vec![
                "Pair.left: demo::Node",
                "Pair.left.next: demo::Node",
                "Pair.right: demo::Node",
            ]
        );
    }

    #[test]
    fn field_types_resolve_through_subclass() {
        let boxed = Value::object("demo::StringBox")
            .with_field("value", Value::from("v"))
            .unwrap();
        let mut recorder = Recorder::default();
        walker().walk(&boxed, &mut recorder).unwrap();
        assert_eq!(recorder.visits, vec!["StringBox.value: std::String"]);
    }

    #[test]
    fn unresolved_variable_uses_runtime_type() {
        let boxed = Value::object("demo::Box")
            .with_field("value", Value::I64(4))
            .unwrap();
        let mut recorder = Recorder::default();
        walker().walk(&boxed, &mut recorder).unwrap();
        assert_eq!(recorder.visits, vec!["Box.value: std::i64"]);

        let empty = Value::object("demo::Box");
        let mut recorder = Recorder::default();
        walker().walk(&empty, &mut recorder).unwrap();
        assert_eq!(recorder.visits, vec!["Box.value: std::Object"]);
    }

    #[test]
    fn null_root_is_a_no_op() {
        let mut recorder = Recorder::default();
        walker().walk(&Value::Null, &mut recorder).unwrap();
        assert!(recorder.visits.is_empty());
    }
}
