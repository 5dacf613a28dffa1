//! Class metadata
//!
//! [`ClassDef`] is the explicit stand-in for runtime type information: it
//! names a type's parameters, supertypes and fields, and says how instances
//! are stored and constructed.

use crate::descriptor::{TypeArg, TypeDescriptor, TypeVariable};
use crate::name::{builtin, TypeName};
use std::sync::Arc;

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Built-in scalar with a zero value (never null in a field)
    Primitive,

    /// Interface: no fields, never instantiated directly
    Interface,

    /// Abstract class: may declare fields, never instantiated directly
    Abstract,

    /// Concrete class
    Concrete,

    /// Enumeration with declared constants
    Enum,
}

/// Storage layout of instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Named field slots
    Object,

    /// Single scalar value
    Scalar,

    /// Ordered sequence
    List,

    /// Unique members
    Set,

    /// Key/value entries
    Map,
}

/// Declared field of a class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    name: Arc<str>,
    ty: TypeArg,
    transient: bool,
    tags: Vec<Arc<str>>,
}

impl FieldDef {
    /// Create field `name` with declared generic type `ty`
    #[inline]
    #[must_use]
    pub fn new(name: &str, ty: impl Into<TypeArg>) -> Self {
        Self {
            name: Arc::from(name),
            ty: ty.into(),
            transient: false,
            tags: Vec::new(),
        }
    }

    /// Mark the field transient
    #[inline]
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Attach a free-form tag (annotation stand-in)
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(Arc::from(tag));
        self
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared field name
    #[inline]
    #[must_use]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Declared generic type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeArg {
        &self.ty
    }

    /// Check if the field is transient
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// Check if the field carries `tag`
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| &**t == tag)
    }

    /// All tags
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[Arc<str>] {
        &self.tags
    }
}

/// Metadata of a registered type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    name: TypeName,
    kind: ClassKind,
    shape: Option<Shape>,
    type_params: Vec<TypeVariable>,
    supertypes: Vec<TypeDescriptor>,
    fields: Vec<FieldDef>,
    constants: Vec<Arc<str>>,
    default_constructor: bool,
    enclosing: Option<TypeName>,
}

impl ClassDef {
    /// Start a concrete class
    #[must_use]
    pub fn concrete(name: impl Into<TypeName>) -> ClassDefBuilder {
        ClassDefBuilder::new(name.into(), ClassKind::Concrete)
    }

    /// Start an abstract class
    #[must_use]
    pub fn abstract_class(name: impl Into<TypeName>) -> ClassDefBuilder {
        ClassDefBuilder::new(name.into(), ClassKind::Abstract)
    }

    /// Start an interface
    #[must_use]
    pub fn interface(name: impl Into<TypeName>) -> ClassDefBuilder {
        ClassDefBuilder::new(name.into(), ClassKind::Interface)
    }

    /// Start an enumeration with `constants` in ordinal order
    ///
    /// Enumerations extend `std::Enum`.
    #[must_use]
    pub fn enumeration(name: impl Into<TypeName>, constants: &[&str]) -> ClassDefBuilder {
        let mut builder = ClassDefBuilder::new(name.into(), ClassKind::Enum)
            .shape(Shape::Scalar)
            .extends(TypeDescriptor::raw(builtin::ENUM));
        builder.def.constants = constants.iter().map(|c| Arc::from(*c)).collect();
        builder.def.default_constructor = false;
        builder
    }

    pub(crate) fn primitive(name: &str) -> Self {
        ClassDefBuilder::new(TypeName::new(name), ClassKind::Primitive)
            .shape(Shape::Scalar)
            .build()
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Kind of type
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Explicitly declared shape, `None` when inherited
    #[inline]
    #[must_use]
    pub fn declared_shape(&self) -> Option<Shape> {
        self.shape
    }

    /// Declared type parameters
    #[inline]
    #[must_use]
    pub fn type_params(&self) -> &[TypeVariable] {
        &self.type_params
    }

    /// Declared (possibly parameterized) direct supertypes
    #[inline]
    #[must_use]
    pub fn supertypes(&self) -> &[TypeDescriptor] {
        &self.supertypes
    }

    /// Fields declared by this class, excluding inherited ones
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Enumeration constants in ordinal order
    #[inline]
    #[must_use]
    pub fn constants(&self) -> &[Arc<str>] {
        &self.constants
    }

    /// Check if instances can be built without arguments
    #[inline]
    #[must_use]
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor
    }

    /// Enclosing type of a non-static inner class
    #[inline]
    #[must_use]
    pub fn enclosing(&self) -> Option<&TypeName> {
        self.enclosing.as_ref()
    }

    /// Check if instances can be created directly
    #[inline]
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, ClassKind::Concrete | ClassKind::Primitive)
    }
}

/// Builder for [`ClassDef`]
#[derive(Debug, Clone)]
pub struct ClassDefBuilder {
    def: ClassDef,
}

impl ClassDefBuilder {
    fn new(name: TypeName, kind: ClassKind) -> Self {
        Self {
            def: ClassDef {
                name,
                kind,
                shape: None,
                type_params: Vec::new(),
                supertypes: Vec::new(),
                fields: Vec::new(),
                constants: Vec::new(),
                default_constructor: kind == ClassKind::Concrete,
                enclosing: None,
            },
        }
    }

    /// Declare the next type parameter
    #[must_use]
    pub fn type_param(mut self, name: &str) -> Self {
        let var = TypeVariable::new(self.def.name.clone(), name);
        self.def.type_params.push(var);
        self
    }

    /// Declare a direct supertype (superclass or interface)
    #[must_use]
    pub fn extends(mut self, supertype: impl Into<TypeDescriptor>) -> Self {
        self.def.supertypes.push(supertype.into());
        self
    }

    /// Declare a field
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.def.fields.push(field);
        self
    }

    /// Set the storage shape
    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.def.shape = Some(shape);
        self
    }

    /// Remove the no-argument constructor
    #[must_use]
    pub fn without_default_constructor(mut self) -> Self {
        self.def.default_constructor = false;
        self
    }

    /// Make this a non-static inner class of `enclosing`
    #[must_use]
    pub fn inner_of(mut self, enclosing: impl Into<TypeName>) -> Self {
        self.def.enclosing = Some(enclosing.into());
        self
    }

    /// Variable declared by this class under `name`
    ///
    /// Convenience for field and supertype declarations.
    #[must_use]
    pub fn var(&self, name: &str) -> TypeVariable {
        TypeVariable::new(self.def.name.clone(), name)
    }

    /// Finish the definition
    #[must_use]
    pub fn build(self) -> ClassDef {
        self.def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_builder() {
        let def = ClassDef::concrete("demo::Box")
            .type_param("T")
            .field(FieldDef::new("value", TypeVariable::new("demo::Box", "T")))
            .build();

        assert_eq!(def.kind(), ClassKind::Concrete);
        assert!(def.has_default_constructor());
        assert_eq!(def.type_params().len(), 1);
        assert_eq!(def.fields()[0].name(), "value");
        assert!(def.fields()[0].ty().as_var().is_some());
    }

    #[test]
    fn enumeration_extends_enum() {
        let def = ClassDef::enumeration("demo::Colour", &["Red", "Green"]).build();
        assert_eq!(def.kind(), ClassKind::Enum);
        assert_eq!(def.constants().len(), 2);
        assert_eq!(def.supertypes(), &[TypeDescriptor::raw(builtin::ENUM)]);
        assert!(!def.is_concrete());
    }

    #[test]
    fn field_flags() {
        let field = FieldDef::new("cache", builtin::STRING)
            .transient()
            .with_tag("xml_transient");
        assert!(field.is_transient());
        assert!(field.has_tag("xml_transient"));
        assert!(!field.has_tag("other"));
    }

    #[test]
    fn abstract_and_interface_are_not_concrete() {
        assert!(!ClassDef::abstract_class("demo::Shape").build().is_concrete());
        assert!(!ClassDef::interface("demo::Named").build().has_default_constructor());
    }
}
