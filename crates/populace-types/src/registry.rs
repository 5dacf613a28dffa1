//! Type registry
//!
//! Provides [`TypeRegistry`], the immutable set of [`ClassDef`]s that every
//! other component consults for ancestry, assignability, fields and shapes.

use crate::class::{ClassDef, ClassKind, FieldDef, Shape};
use crate::descriptor::{TypeArg, TypeDescriptor, TypeVariable};
use crate::error::TypeError;
use crate::name::{builtin, TypeName};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

static BUILTINS: Lazy<IndexMap<TypeName, ClassDef>> = Lazy::new(|| {
    let mut classes = IndexMap::new();

    insert(
        &mut classes,
        ClassDef::concrete(builtin::OBJECT).shape(Shape::Object).build(),
    );
    for name in builtin::PRIMITIVES {
        insert(&mut classes, ClassDef::primitive(name));
    }
    insert(
        &mut classes,
        ClassDef::concrete(builtin::STRING).shape(Shape::Scalar).build(),
    );
    insert(
        &mut classes,
        ClassDef::concrete(builtin::DATE).shape(Shape::Scalar).build(),
    );
    insert(
        &mut classes,
        ClassDef::abstract_class(builtin::ENUM)
            .shape(Shape::Scalar)
            .build(),
    );

    insert(
        &mut classes,
        ClassDef::interface(builtin::COLLECTION).type_param("E").build(),
    );
    for (interface, concrete, shape) in [
        (builtin::LIST, builtin::ARRAY_LIST, Shape::List),
        (builtin::SET, builtin::HASH_SET, Shape::Set),
    ] {
        let def = ClassDef::interface(interface).type_param("E");
        let e = def.var("E");
        insert(
            &mut classes,
            def.extends(TypeDescriptor::parameterized(builtin::COLLECTION, [e]))
                .build(),
        );

        let def = ClassDef::concrete(concrete).type_param("E").shape(shape);
        let e = def.var("E");
        insert(
            &mut classes,
            def.extends(TypeDescriptor::parameterized(interface, [e])).build(),
        );
    }

    insert(
        &mut classes,
        ClassDef::interface(builtin::MAP)
            .type_param("K")
            .type_param("V")
            .build(),
    );
    let def = ClassDef::concrete(builtin::HASH_MAP)
        .type_param("K")
        .type_param("V")
        .shape(Shape::Map);
    let (k, v) = (def.var("K"), def.var("V"));
    insert(
        &mut classes,
        def.extends(TypeDescriptor::parameterized(builtin::MAP, [k, v]))
            .build(),
    );

    classes
});

fn insert(classes: &mut IndexMap<TypeName, ClassDef>, def: ClassDef) {
    classes.insert(def.name().clone(), def);
}

/// Immutable registry of class metadata
///
/// Always contains the [`builtin`] types. Arrays (`[]`) are implicit: they
/// have no entry, no fields and `std::Object` as their only ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    classes: IndexMap<TypeName, ClassDef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeRegistry {
    /// Registry holding only the built-in types
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            classes: BUILTINS.clone(),
        }
    }

    /// Builder seeded with the built-in types
    #[must_use]
    pub fn builder() -> TypeRegistryBuilder {
        Self::builtin().to_builder()
    }

    /// Builder seeded with every type of this registry
    #[must_use]
    pub fn to_builder(&self) -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            classes: self.classes.clone(),
            pending: Vec::new(),
        }
    }

    /// Class metadata for `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Class metadata for `name`
    ///
    /// # Errors
    /// Returns [`TypeError::UnknownType`] if `name` is not registered
    pub fn class(&self, name: &TypeName) -> Result<&ClassDef, TypeError> {
        self.get(name)
            .ok_or_else(|| TypeError::UnknownType(name.clone()))
    }

    /// Check if `name` is known (arrays always are)
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        name.is_array() || self.classes.contains_key(name)
    }

    /// Number of registered classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty (never true in practice)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over registered classes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    /// Declared type parameters of `name`, empty for unknown types
    #[must_use]
    pub fn type_params(&self, name: &TypeName) -> &[TypeVariable] {
        self.get(name).map_or(&[], ClassDef::type_params)
    }

    /// Kind of `name`, `None` for arrays and unknown types
    #[inline]
    #[must_use]
    pub fn kind(&self, name: &TypeName) -> Option<ClassKind> {
        self.get(name).map(ClassDef::kind)
    }

    /// Check if `name` is a primitive
    #[inline]
    #[must_use]
    pub fn is_primitive(&self, name: &TypeName) -> bool {
        self.kind(name) == Some(ClassKind::Primitive)
    }

    /// Build a parameterized descriptor, checking arity
    ///
    /// # Errors
    /// Returns error if `name` is unknown or the argument count is wrong
    pub fn parameterize<A: Into<TypeArg>>(
        &self,
        name: impl Into<TypeName>,
        args: impl IntoIterator<Item = A>,
    ) -> Result<TypeDescriptor, TypeError> {
        let ty = TypeDescriptor::parameterized(name, args);
        self.validate(&ty)?;
        Ok(ty)
    }

    /// Check that `ty` and all nested arguments are known and well-formed
    ///
    /// A raw descriptor of a generic type is accepted (raw use).
    ///
    /// # Errors
    /// Returns error on unknown types or arity mismatches
    pub fn validate(&self, ty: &TypeDescriptor) -> Result<(), TypeError> {
        let expected = if ty.is_array() {
            1
        } else {
            self.class(ty.raw_name())?.type_params().len()
        };
        let found = ty.args().len();
        let raw_use = found == 0 && !ty.is_array();
        if found != expected && !raw_use {
            return Err(TypeError::ArityMismatch {
                ty: ty.raw_name().clone(),
                expected,
                found,
            });
        }
        for arg in ty.args() {
            if let TypeArg::Type(nested) = arg {
                self.validate(nested)?;
            }
        }
        Ok(())
    }

    /// Declared supertypes of `name`, transitively, nearest first
    ///
    /// Supertypes keep their declared form, so arguments may reference the
    /// type variables of the declaring class. Each raw type appears once.
    #[must_use]
    pub fn ancestors(&self, name: &TypeName) -> Vec<TypeDescriptor> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([name.clone()]);

        while let Some(current) = queue.pop_front() {
            let Some(def) = self.classes.get(&current) else {
                continue;
            };
            for supertype in def.supertypes() {
                if seen.insert(supertype.raw_name().clone()) {
                    out.push(supertype.clone());
                    queue.push_back(supertype.raw_name().clone());
                }
            }
        }
        out
    }

    /// `name` and its ancestors with their distance from `name`
    ///
    /// Non-primitive types end with `std::Object` unless already present.
    #[must_use]
    pub fn ancestor_names(&self, name: &TypeName) -> Vec<(TypeName, usize)> {
        let mut depths: HashMap<TypeName, usize> = HashMap::from([(name.clone(), 0)]);
        let mut out = vec![(name.clone(), 0)];
        let mut queue = VecDeque::from([name.clone()]);

        while let Some(current) = queue.pop_front() {
            let depth = depths[&current];
            let Some(def) = self.classes.get(&current) else {
                continue;
            };
            for supertype in def.supertypes() {
                let raw = supertype.raw_name();
                if !depths.contains_key(raw) {
                    depths.insert(raw.clone(), depth + 1);
                    out.push((raw.clone(), depth + 1));
                    queue.push_back(raw.clone());
                }
            }
        }

        let object = TypeName::new(builtin::OBJECT);
        if !self.is_primitive(name) && !depths.contains_key(&object) {
            let depth = out.iter().map(|(_, d)| d + 1).max().unwrap_or(1);
            out.push((object, depth));
        }
        out
    }

    /// Check if a value of `sub` can be used where `sup` is expected
    ///
    /// Reflexive and transitive; every non-primitive type is assignable to
    /// `std::Object`.
    #[must_use]
    pub fn is_assignable(&self, sub: &TypeName, sup: &TypeName) -> bool {
        if sub == sup {
            return true;
        }
        if sup == builtin::OBJECT {
            return !self.is_primitive(sub);
        }
        self.ancestors(sub).iter().any(|a| a.raw_name() == sup)
    }

    /// Storage shape of `name`, inherited from the nearest ancestor that
    /// declares one; [`Shape::Object`] by default
    #[must_use]
    pub fn shape(&self, name: &TypeName) -> Shape {
        if let Some(shape) = self.get(name).and_then(ClassDef::declared_shape) {
            return shape;
        }
        self.ancestors(name)
            .iter()
            .filter_map(|a| self.get(a.raw_name()))
            .find_map(ClassDef::declared_shape)
            .unwrap_or(Shape::Object)
    }

    /// All instance fields of `name`: own fields first, then those of each
    /// class ancestor, each in declaration order
    #[must_use]
    pub fn all_fields(&self, name: &TypeName) -> Vec<(&TypeName, &FieldDef)> {
        let mut chain = vec![name.clone()];
        chain.extend(self.ancestors(name).iter().map(|a| a.raw_name().clone()));

        chain
            .iter()
            .filter_map(|n| self.classes.get(n))
            .filter(|def| def.kind() != ClassKind::Interface)
            .flat_map(|def| def.fields().iter().map(move |f| (def.name(), f)))
            .collect()
    }

    /// Constants of enumeration `name`, empty for other types
    #[must_use]
    pub fn enum_constants(&self, name: &TypeName) -> &[Arc<str>] {
        self.get(name).map_or(&[], ClassDef::constants)
    }
}

/// Builder for [`TypeRegistry`]
#[derive(Debug, Clone)]
pub struct TypeRegistryBuilder {
    classes: IndexMap<TypeName, ClassDef>,
    pending: Vec<ClassDef>,
}

impl TypeRegistryBuilder {
    /// Register a class
    #[must_use]
    pub fn with_class(mut self, def: ClassDef) -> Self {
        self.pending.push(def);
        self
    }

    /// Validate and freeze the registry
    ///
    /// # Errors
    /// Returns error on duplicate types or fields, unknown references,
    /// undeclared type variables, arity mismatches or inheritance cycles
    pub fn build(self) -> Result<TypeRegistry, TypeError> {
        let mut registry = TypeRegistry {
            classes: self.classes,
        };
        let mut added = Vec::with_capacity(self.pending.len());
        for def in self.pending {
            if registry.classes.contains_key(def.name()) {
                return Err(TypeError::DuplicateType(def.name().clone()));
            }
            added.push(def.name().clone());
            insert(&mut registry.classes, def);
        }

        for name in &added {
            registry.check_class(name)?;
        }
        Ok(registry)
    }
}

impl TypeRegistry {
    fn check_class(&self, name: &TypeName) -> Result<(), TypeError> {
        let def = self.class(name)?;

        for supertype in def.supertypes() {
            if !self.contains(supertype.raw_name()) {
                return Err(TypeError::UnknownReference {
                    ty: name.clone(),
                    missing: supertype.raw_name().clone(),
                });
            }
            self.validate(supertype)?;
            check_variables(def, &TypeArg::Type(supertype.clone()))?;
        }
        if let Some(enclosing) = def.enclosing() {
            if !self.contains(enclosing) {
                return Err(TypeError::UnknownReference {
                    ty: name.clone(),
                    missing: enclosing.clone(),
                });
            }
        }
        if self.ancestors(name).iter().any(|a| a.raw_name() == name) {
            return Err(TypeError::CyclicInheritance(name.clone()));
        }

        for field in def.fields() {
            if let TypeArg::Type(ty) = field.ty() {
                self.validate(ty)?;
            }
            check_variables(def, field.ty())?;
        }

        let mut declared: HashMap<&str, &TypeName> = HashMap::new();
        for (owner, field) in self.all_fields(name) {
            if let Some(first) = declared.insert(field.name(), owner) {
                return Err(TypeError::DuplicateField {
                    ty: name.clone(),
                    field: field.name().to_string(),
                    declared_by: first.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_variables(def: &ClassDef, arg: &TypeArg) -> Result<(), TypeError> {
    match arg {
        TypeArg::Var(var) if !def.type_params().contains(var) => Err(TypeError::UndeclaredVariable {
            ty: def.name().clone(),
            var: var.clone(),
        }),
        TypeArg::Var(_) => Ok(()),
        TypeArg::Type(ty) => ty
            .args()
            .iter()
            .try_for_each(|nested| check_variables(def, nested)),
    }
}
