//! Type descriptors and type variables
//!
//! A [`TypeDescriptor`] is a raw [`TypeName`] plus ordered type arguments.
//! Each argument is either concrete or an unresolved [`TypeVariable`].
//! Arrays use the reserved raw name `[]` with the component as their only
//! argument.

use crate::name::{builtin, TypeName};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Generic parameter placeholder, scoped to the type that declares it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeVariable {
    declared_by: TypeName,
    name: Arc<str>,
}

impl TypeVariable {
    /// Create a variable named `name` declared by `declared_by`
    #[inline]
    #[must_use]
    pub fn new(declared_by: impl Into<TypeName>, name: &str) -> Self {
        Self {
            declared_by: declared_by.into(),
            name: Arc::from(name),
        }
    }

    /// Variable name, e.g. `T`
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that declares this variable
    #[inline]
    #[must_use]
    pub fn declared_by(&self) -> &TypeName {
        &self.declared_by
    }
}

impl Display for TypeVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Type argument: concrete descriptor or pending variable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// Concrete (possibly itself parameterized) type
    Type(TypeDescriptor),

    /// Unresolved type variable
    Var(TypeVariable),
}

impl TypeArg {
    /// Concrete descriptor, if resolved at the top level
    #[inline]
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Type(ty) => Some(ty),
            Self::Var(_) => None,
        }
    }

    /// Variable, if unresolved
    #[inline]
    #[must_use]
    pub fn as_var(&self) -> Option<&TypeVariable> {
        match self {
            Self::Type(_) => None,
            Self::Var(var) => Some(var),
        }
    }

    /// Check that no variable remains anywhere in this argument
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            Self::Type(ty) => ty.is_fully_resolved(),
            Self::Var(_) => false,
        }
    }

    /// Descriptor usable as a dispatch key
    ///
    /// Unresolved variables erase to `std::Object`.
    #[must_use]
    pub fn erase(&self) -> TypeDescriptor {
        match self {
            Self::Type(ty) => ty.clone(),
            Self::Var(_) => TypeDescriptor::raw(builtin::OBJECT),
        }
    }
}

impl From<TypeDescriptor> for TypeArg {
    fn from(ty: TypeDescriptor) -> Self {
        Self::Type(ty)
    }
}

impl From<TypeVariable> for TypeArg {
    fn from(var: TypeVariable) -> Self {
        Self::Var(var)
    }
}

impl From<&str> for TypeArg {
    fn from(name: &str) -> Self {
        Self::Type(TypeDescriptor::raw(name))
    }
}

impl Display for TypeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => Display::fmt(ty, f),
            Self::Var(var) => Display::fmt(var, f),
        }
    }
}

/// Raw type plus ordered type arguments
///
/// Immutable once constructed. Argument count is checked against the raw
/// type's declared parameters by
/// [`TypeRegistry::parameterize`](crate::TypeRegistry::parameterize) and
/// [`TypeRegistry::validate`](crate::TypeRegistry::validate).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: TypeName,
    args: Arc<[TypeArg]>,
}

impl TypeDescriptor {
    /// Descriptor of a raw type, without arguments
    #[inline]
    #[must_use]
    pub fn raw(name: impl Into<TypeName>) -> Self {
        Self {
            raw: name.into(),
            args: Arc::from(Vec::new()),
        }
    }

    /// Descriptor with type arguments
    #[must_use]
    pub fn parameterized<A: Into<TypeArg>>(
        name: impl Into<TypeName>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        Self {
            raw: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Array of `component`
    #[inline]
    #[must_use]
    pub fn array(component: impl Into<TypeArg>) -> Self {
        Self::parameterized(builtin::ARRAY, [component.into()])
    }

    /// Raw type name
    #[inline]
    #[must_use]
    pub fn raw_name(&self) -> &TypeName {
        &self.raw
    }

    /// Type arguments in declaration order
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    /// Check if this type carries arguments
    #[inline]
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    /// Check if this is an array type
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.raw.is_array()
    }

    /// Array component, `None` for non-array types
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<&TypeArg> {
        if self.is_array() {
            self.args.first()
        } else {
            None
        }
    }

    /// Same raw type without arguments
    #[inline]
    #[must_use]
    pub fn erased(&self) -> Self {
        Self::raw(self.raw.clone())
    }

    /// Check that no variable remains anywhere in the arguments
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.args.iter().all(TypeArg::is_fully_resolved)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(name: &str) -> Self {
        Self::raw(name)
    }
}

impl From<TypeName> for TypeDescriptor {
    fn from(name: TypeName) -> Self {
        Self::raw(name)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(component) = self.component() {
            return write!(f, "{component}[]");
        }
        write!(f, "{}", self.raw)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(arg: impl Into<TypeArg>) -> TypeDescriptor {
        TypeDescriptor::parameterized(builtin::LIST, [arg.into()])
    }

    #[test]
    fn descriptor_display() {
        let ty = list_of(builtin::STRING);
        assert_eq!(ty.to_string(), "std::collections::List<std::String>");

        let array = TypeDescriptor::array(builtin::I32);
        assert_eq!(array.to_string(), "std::i32[]");
    }

    #[test]
    fn descriptor_identity_includes_args() {
        assert_ne!(list_of(builtin::STRING), list_of(builtin::I32));
        assert_eq!(list_of(builtin::STRING), list_of(builtin::STRING));
        assert_eq!(list_of(builtin::STRING).erased(), TypeDescriptor::raw(builtin::LIST));
    }

    #[test]
    fn descriptor_resolution_state() {
        let var = TypeVariable::new("demo::Box", "T");
        assert!(!list_of(var.clone()).is_fully_resolved());
        assert!(list_of(builtin::STRING).is_fully_resolved());
        assert!(!TypeArg::Var(var).is_fully_resolved());
    }

    #[test]
    fn unresolved_variable_erases_to_object() {
        let var = TypeArg::Var(TypeVariable::new("demo::Box", "T"));
        assert_eq!(var.erase(), TypeDescriptor::raw(builtin::OBJECT));
    }

    #[test]
    fn array_component() {
        let array = TypeDescriptor::array(builtin::STRING);
        assert!(array.is_array());
        assert_eq!(array.component(), Some(&TypeArg::from(builtin::STRING)));
        assert_eq!(list_of(builtin::STRING).component(), None);
    }
}
