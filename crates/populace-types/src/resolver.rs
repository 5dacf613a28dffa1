//! Type variable resolution
//!
//! Recovers the concrete binding of a [`TypeVariable`] from the runtime type
//! of a value and the declared type of the slot holding it, walking the
//! declared supertypes of the runtime type.

use crate::descriptor::{TypeArg, TypeDescriptor, TypeVariable};
use crate::name::TypeName;
use crate::registry::TypeRegistry;
use std::collections::HashSet;

/// Binding context: runtime raw type plus the declared type of its slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeContext {
    raw: TypeName,
    declared: Option<TypeDescriptor>,
}

impl TypeContext {
    /// Create context for a value of type `raw` held in a slot declared as
    /// `declared`
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<TypeName>, declared: Option<TypeDescriptor>) -> Self {
        Self {
            raw: raw.into(),
            declared,
        }
    }

    /// Context of a raw type with no declared slot
    #[inline]
    #[must_use]
    pub fn raw(raw: impl Into<TypeName>) -> Self {
        Self::new(raw, None)
    }

    /// Context where the runtime type is the declared type
    #[inline]
    #[must_use]
    pub fn of(declared: TypeDescriptor) -> Self {
        Self {
            raw: declared.raw_name().clone(),
            declared: Some(declared),
        }
    }

    /// Runtime raw type
    #[inline]
    #[must_use]
    pub fn raw_name(&self) -> &TypeName {
        &self.raw
    }

    /// Declared type of the slot, if known
    #[inline]
    #[must_use]
    pub fn declared(&self) -> Option<&TypeDescriptor> {
        self.declared.as_ref()
    }
}

/// Resolves type variables against a [`TypeRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    types: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    /// Create resolver over `types`
    #[inline]
    #[must_use]
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Registry used for ancestry lookups
    #[inline]
    #[must_use]
    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    /// Resolve `var` in `ctx`
    ///
    /// Returns the variable itself when no binding can be found.
    #[must_use]
    pub fn resolve_variable(&self, var: &TypeVariable, ctx: &TypeContext) -> TypeArg {
        self.resolve_var(var, ctx, &mut HashSet::new())
    }

    /// Resolve every variable in `arg`, including nested arguments
    #[must_use]
    pub fn resolve(&self, arg: &TypeArg, ctx: &TypeContext) -> TypeArg {
        self.resolve_arg(arg, ctx, &mut HashSet::new())
    }

    /// The context's raw type parameterized with every argument that could
    /// be resolved
    #[must_use]
    pub fn descriptor(&self, ctx: &TypeContext) -> TypeDescriptor {
        if ctx.raw_name().is_array() {
            return match ctx.declared() {
                Some(declared) if declared.is_array() => {
                    match self.resolve(&TypeArg::Type(declared.clone()), ctx) {
                        TypeArg::Type(ty) => ty,
                        TypeArg::Var(_) => declared.clone(),
                    }
                }
                _ => TypeDescriptor::array(TypeArg::Type(TypeDescriptor::raw(
                    crate::name::builtin::OBJECT,
                ))),
            };
        }

        let params = self.types.type_params(ctx.raw_name());
        if params.is_empty() {
            return TypeDescriptor::raw(ctx.raw_name().clone());
        }
        TypeDescriptor::parameterized(
            ctx.raw_name().clone(),
            params.iter().map(|p| self.resolve_variable(p, ctx)),
        )
    }

    /// Binding of the `index`-th type parameter of `owner` in `ctx`
    ///
    /// Used to find element types: `Collection`'s `E`, `Map`'s `V`.
    #[must_use]
    pub fn parameter(&self, owner: &TypeName, index: usize, ctx: &TypeContext) -> Option<TypeArg> {
        let var = self.types.type_params(owner).get(index)?;
        Some(self.resolve_variable(var, ctx))
    }

    fn resolve_arg(
        &self,
        arg: &TypeArg,
        ctx: &TypeContext,
        active: &mut HashSet<TypeVariable>,
    ) -> TypeArg {
        match arg {
            TypeArg::Var(var) => self.resolve_var(var, ctx, active),
            TypeArg::Type(ty) if ty.is_fully_resolved() => arg.clone(),
            TypeArg::Type(ty) => TypeArg::Type(TypeDescriptor::parameterized(
                ty.raw_name().clone(),
                ty.args()
                    .iter()
                    .map(|nested| self.resolve_arg(nested, ctx, active))
                    .collect::<Vec<_>>(),
            )),
        }
    }

    fn resolve_var(
        &self,
        var: &TypeVariable,
        ctx: &TypeContext,
        active: &mut HashSet<TypeVariable>,
    ) -> TypeArg {
        if !active.insert(var.clone()) {
            return TypeArg::Var(var.clone());
        }
        let resolved = self
            .find_binding(var, ctx, active)
            .unwrap_or_else(|| TypeArg::Var(var.clone()));
        active.remove(var);
        resolved
    }

    fn find_binding(
        &self,
        var: &TypeVariable,
        ctx: &TypeContext,
        active: &mut HashSet<TypeVariable>,
    ) -> Option<TypeArg> {
        // Direct binding from the declared slot type
        if let Some(declared) = ctx.declared() {
            if let Some(arg) = self.argument_for(var, declared) {
                return Some(self.resolve_arg(&arg, ctx, active));
            }
        }

        let ancestors = self.types.ancestors(ctx.raw_name());

        // A supertype of the runtime type that binds the variable
        for supertype in &ancestors {
            if let Some(arg) = self.argument_for(var, supertype) {
                let resolved = self.resolve_arg(&arg, ctx, active);
                if resolved != TypeArg::Var(var.clone()) {
                    return Some(resolved);
                }
            }
        }

        // A supertype that passes the variable through: resolve its parameter
        for supertype in std::iter::once(ctx.declared().cloned())
            .flatten()
            .chain(ancestors)
        {
            let params = self.types.type_params(supertype.raw_name());
            let position = supertype
                .args()
                .iter()
                .position(|a| a.as_var() == Some(var));
            if let Some(alias) = position.and_then(|i| params.get(i)) {
                if alias != var {
                    if let resolved @ TypeArg::Type(_) = self.resolve_var(alias, ctx, active) {
                        return Some(resolved);
                    }
                }
            }
        }
        None
    }

    fn argument_for(&self, var: &TypeVariable, ty: &TypeDescriptor) -> Option<TypeArg> {
        if ty.raw_name() != var.declared_by() {
            return None;
        }
        let index = self
            .types
            .type_params(ty.raw_name())
            .iter()
            .position(|p| p == var)?;
        ty.args().get(index).cloned()
    }
}
