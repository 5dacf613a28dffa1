//! Field descriptors
//!
//! [`RawField`] is a declared field of a class; [`FieldInfo`] binds it to an
//! owning object, a resolved generic type and a path for one visit.

use crate::error::AccessError;
use crate::path::WalkerPath;
use crate::value::Value;
use populace_types::{FieldDef, TypeArg, TypeContext, TypeDescriptor, TypeName};
use std::sync::Arc;

/// Declared field plus the class that declares it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawField {
    declaring_class: TypeName,
    def: FieldDef,
}

impl RawField {
    /// Create raw field `def` declared by `declaring_class`
    #[inline]
    #[must_use]
    pub fn new(declaring_class: impl Into<TypeName>, def: FieldDef) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            def,
        }
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// Class declaring the field
    #[inline]
    #[must_use]
    pub fn declaring_class(&self) -> &TypeName {
        &self.declaring_class
    }

    /// Declared generic type, possibly a type variable
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> &TypeArg {
        self.def.ty()
    }

    /// Check if the field is transient
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.def.is_transient()
    }

    /// Check if the field carries `tag`
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.def.has_tag(tag)
    }

    /// Read the field of `owner`
    ///
    /// # Errors
    /// Returns error if `owner` is not an object or is mutably borrowed
    pub fn get(&self, owner: &Value) -> Result<Value, AccessError> {
        owner.field(self.def.name())
    }

    /// Write the field of `owner`
    ///
    /// # Errors
    /// Returns error if `owner` is not an object or is borrowed
    pub fn set(&self, owner: &Value, value: Value) -> Result<(), AccessError> {
        owner.as_object_mut()?.set(self.def.name(), value);
        Ok(())
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        self.def.shared_name()
    }
}

/// Field of a specific object, valid for one visit
#[derive(Debug, Clone)]
pub struct FieldInfo {
    raw: RawField,
    generic_type: TypeDescriptor,
    owner: Value,
    path: WalkerPath,
}

impl FieldInfo {
    /// Bind `raw` to `owner`
    #[must_use]
    pub fn new(raw: RawField, generic_type: TypeDescriptor, owner: Value, path: WalkerPath) -> Self {
        Self {
            raw,
            generic_type,
            owner,
            path,
        }
    }

    /// Underlying declared field
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &RawField {
        &self.raw
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.raw.name()
    }

    /// Declared type with type variables resolved against the owner
    #[inline]
    #[must_use]
    pub fn generic_type(&self) -> &TypeDescriptor {
        &self.generic_type
    }

    /// Object holding the field
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &Value {
        &self.owner
    }

    /// Path to this field
    #[inline]
    #[must_use]
    pub fn path(&self) -> &WalkerPath {
        &self.path
    }

    /// Check if the field is transient
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.raw.is_transient()
    }

    /// Current value
    ///
    /// # Errors
    /// Returns error if the owner is mutably borrowed
    pub fn get(&self) -> Result<Value, AccessError> {
        self.raw.get(&self.owner)
    }

    /// Replace the current value
    ///
    /// # Errors
    /// Returns error if the owner is borrowed
    pub fn set(&self, value: Value) -> Result<(), AccessError> {
        self.raw.set(&self.owner, value)
    }

    /// Binding context of `value` held in this field
    #[must_use]
    pub fn context_of(&self, value: &Value) -> TypeContext {
        let raw = value
            .runtime_type()
            .unwrap_or_else(|| self.generic_type.raw_name().clone());
        TypeContext::new(raw, Some(self.generic_type.clone()))
    }
}
