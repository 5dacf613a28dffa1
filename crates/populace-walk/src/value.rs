//! Dynamic value model
//!
//! [`Value`] holds an object graph: scalars and enum constants by value,
//! objects and containers as shared, mutable references. References compare
//! and hash by identity, so two distinct but equal-looking objects are
//! different values.

use crate::error::AccessError;
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use populace_types::{builtin, TypeArg, TypeDescriptor, TypeName};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shared object reference
pub type ObjectRef = Rc<RefCell<ObjectData>>;
/// Shared list reference
pub type ListRef = Rc<RefCell<ListData>>;
/// Shared set reference
pub type SetRef = Rc<RefCell<SetData>>;
/// Shared map reference
pub type MapRef = Rc<RefCell<MapData>>;
/// Shared array reference
pub type ArrayRef = Rc<RefCell<ArrayData>>;

/// Runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// `std::bool`
    Bool(bool),
    /// `std::char`
    Char(char),
    /// `std::i8`
    I8(i8),
    /// `std::i16`
    I16(i16),
    /// `std::i32`
    I32(i32),
    /// `std::i64`
    I64(i64),
    /// `std::u8`
    U8(u8),
    /// `std::u16`
    U16(u16),
    /// `std::u32`
    U32(u32),
    /// `std::u64`
    U64(u64),
    /// `std::f32`
    F32(f32),
    /// `std::f64`
    F64(f64),
    /// `std::String`
    String(String),
    /// `std::Date`
    Date(DateTime<Utc>),
    /// Enumeration constant
    Enum(EnumValue),
    /// Object with named field slots
    Object(ObjectRef),
    /// Ordered list
    List(ListRef),
    /// Insertion-ordered set
    Set(SetRef),
    /// Insertion-ordered map
    Map(MapRef),
    /// Fixed-length array
    Array(ArrayRef),
}

/// Enumeration constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    ty: TypeName,
    ordinal: usize,
    name: Arc<str>,
}

impl EnumValue {
    /// Create constant `name` at `ordinal` of enumeration `ty`
    #[inline]
    #[must_use]
    pub fn new(ty: impl Into<TypeName>, ordinal: usize, name: impl AsRef<str>) -> Self {
        Self {
            ty: ty.into(),
            ordinal,
            name: Arc::from(name.as_ref()),
        }
    }

    /// Enumeration type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    /// Position in declaration order
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Constant name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Object state: runtime type plus field slots
pub struct ObjectData {
    ty: TypeName,
    fields: IndexMap<Arc<str>, Value>,
    enclosing: Option<Weak<RefCell<ObjectData>>>,
}

impl ObjectData {
    /// Runtime type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    /// Value of slot `name`; a missing slot reads as [`Value::Null`]
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Write slot `name`, returning the previous value
    pub fn set(&mut self, name: &str, value: Value) -> Value {
        match self.fields.get_mut(name) {
            Some(slot) => std::mem::replace(slot, value),
            None => {
                self.fields.insert(Arc::from(name), value);
                Value::Null
            }
        }
    }

    /// Names of the slots present, in insertion order
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| &**k)
    }

    /// Enclosing instance of an inner class object
    ///
    /// Held weakly: `None` once the enclosing object has been dropped.
    #[must_use]
    pub fn enclosing(&self) -> Option<ObjectRef> {
        self.enclosing.as_ref().and_then(Weak::upgrade)
    }
}

/// List state
pub struct ListData {
    ty: TypeName,
    /// Items in order
    pub items: Vec<Value>,
}

impl ListData {
    /// Runtime type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }
}

/// Set state
pub struct SetData {
    ty: TypeName,
    /// Members in insertion order
    pub items: IndexSet<Value>,
}

impl SetData {
    /// Runtime type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    /// Replace `old` by `new`, keeping its position
    ///
    /// If `new` is already a member the set shrinks by one.
    pub fn replace(&mut self, old: &Value, new: Value) {
        if old == &new {
            return;
        }
        let position = self.items.get_index_of(old);
        self.items.shift_remove(old);
        if self.items.contains(&new) {
            return;
        }
        match position {
            Some(index) => {
                self.items.shift_insert(index.min(self.items.len()), new);
            }
            None => {
                self.items.insert(new);
            }
        }
    }
}

/// Map state
pub struct MapData {
    ty: TypeName,
    /// Entries in insertion order
    pub entries: IndexMap<Value, Value>,
}

impl MapData {
    /// Runtime type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeName {
        &self.ty
    }
}

/// Array state: component type plus fixed slots
pub struct ArrayData {
    component: TypeDescriptor,
    /// Slots by index
    pub items: Vec<Value>,
}

impl ArrayData {
    /// Declared component type
    #[inline]
    #[must_use]
    pub fn component(&self) -> &TypeDescriptor {
        &self.component
    }

    /// Full array type
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::array(TypeArg::Type(self.component.clone()))
    }
}

impl Value {
    /// New object of type `ty` with no slots
    #[must_use]
    pub fn object(ty: impl Into<TypeName>) -> Self {
        Self::object_with(ty, IndexMap::new(), None)
    }

    /// New object with initial slots and optional enclosing instance
    #[must_use]
    pub fn object_with(
        ty: impl Into<TypeName>,
        fields: IndexMap<Arc<str>, Value>,
        enclosing: Option<&ObjectRef>,
    ) -> Self {
        Self::Object(Rc::new(RefCell::new(ObjectData {
            ty: ty.into(),
            fields,
            enclosing: enclosing.map(Rc::downgrade),
        })))
    }

    /// Set slot `name` on an object, builder style
    ///
    /// # Errors
    /// Returns [`AccessError::NotAnObject`] for non-object values
    pub fn with_field(self, name: &str, value: Value) -> Result<Self, AccessError> {
        self.as_object_mut()?.set(name, value);
        Ok(self)
    }

    /// New list of runtime type `ty`
    #[must_use]
    pub fn list(ty: impl Into<TypeName>, items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(Rc::new(RefCell::new(ListData {
            ty: ty.into(),
            items: items.into_iter().collect(),
        })))
    }

    /// New set of runtime type `ty`
    #[must_use]
    pub fn set(ty: impl Into<TypeName>, items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(Rc::new(RefCell::new(SetData {
            ty: ty.into(),
            items: items.into_iter().collect(),
        })))
    }

    /// New map of runtime type `ty`
    #[must_use]
    pub fn map(ty: impl Into<TypeName>, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(Rc::new(RefCell::new(MapData {
            ty: ty.into(),
            entries: entries.into_iter().collect(),
        })))
    }

    /// New array of `component`
    #[must_use]
    pub fn array(component: impl Into<TypeDescriptor>, items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(ArrayData {
            component: component.into(),
            items: items.into_iter().collect(),
        })))
    }

    /// New string value
    #[inline]
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Zero value of primitive `ty`, [`Value::Null`] for everything else
    #[must_use]
    pub fn zero_of(ty: &TypeName) -> Self {
        match ty.as_str() {
            builtin::BOOL => Self::Bool(false),
            builtin::CHAR => Self::Char('\0'),
            builtin::I8 => Self::I8(0),
            builtin::I16 => Self::I16(0),
            builtin::I32 => Self::I32(0),
            builtin::I64 => Self::I64(0),
            builtin::U8 => Self::U8(0),
            builtin::U16 => Self::U16(0),
            builtin::U32 => Self::U32(0),
            builtin::U64 => Self::U64(0),
            builtin::F32 => Self::F32(0.0),
            builtin::F64 => Self::F64(0.0),
            _ => Self::Null,
        }
    }

    /// Check if this is [`Value::Null`]
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is an object or container reference
    #[inline]
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.identity().is_some()
    }

    /// Runtime raw type, `None` for [`Value::Null`]
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeName> {
        let name = match self {
            Self::Null => return None,
            Self::Bool(_) => builtin::BOOL,
            Self::Char(_) => builtin::CHAR,
            Self::I8(_) => builtin::I8,
            Self::I16(_) => builtin::I16,
            Self::I32(_) => builtin::I32,
            Self::I64(_) => builtin::I64,
            Self::U8(_) => builtin::U8,
            Self::U16(_) => builtin::U16,
            Self::U32(_) => builtin::U32,
            Self::U64(_) => builtin::U64,
            Self::F32(_) => builtin::F32,
            Self::F64(_) => builtin::F64,
            Self::String(_) => builtin::STRING,
            Self::Date(_) => builtin::DATE,
            Self::Enum(e) => return Some(e.ty.clone()),
            Self::Object(o) => return Some(o.borrow().ty.clone()),
            Self::List(l) => return Some(l.borrow().ty.clone()),
            Self::Set(s) => return Some(s.borrow().ty.clone()),
            Self::Map(m) => return Some(m.borrow().ty.clone()),
            Self::Array(_) => builtin::ARRAY,
        };
        Some(TypeName::new(name))
    }

    /// Runtime type as a descriptor; arrays carry their component
    #[must_use]
    pub fn runtime_descriptor(&self) -> Option<TypeDescriptor> {
        match self {
            Self::Array(a) => Some(a.borrow().descriptor()),
            other => other.runtime_type().map(TypeDescriptor::raw),
        }
    }

    /// Address of the shared state for references, `None` for scalars
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Object(o) => Some(Rc::as_ptr(o).cast::<()>() as usize),
            Self::List(l) => Some(Rc::as_ptr(l).cast::<()>() as usize),
            Self::Set(s) => Some(Rc::as_ptr(s).cast::<()>() as usize),
            Self::Map(m) => Some(Rc::as_ptr(m).cast::<()>() as usize),
            Self::Array(a) => Some(Rc::as_ptr(a).cast::<()>() as usize),
            _ => None,
        }
    }

    /// Borrow object state
    ///
    /// # Errors
    /// Returns error for non-objects or while the object is mutably borrowed
    pub fn as_object(&self) -> Result<Ref<'_, ObjectData>, AccessError> {
        match self {
            Self::Object(o) => o.try_borrow().map_err(|_| AccessError::Borrowed),
            other => Err(AccessError::NotAnObject(other.type_label())),
        }
    }

    /// Mutably borrow object state
    ///
    /// # Errors
    /// Returns error for non-objects or while the object is borrowed
    pub fn as_object_mut(&self) -> Result<RefMut<'_, ObjectData>, AccessError> {
        match self {
            Self::Object(o) => o.try_borrow_mut().map_err(|_| AccessError::Borrowed),
            other => Err(AccessError::NotAnObject(other.type_label())),
        }
    }

    /// Read field `name` of an object
    ///
    /// # Errors
    /// Returns error for non-objects
    pub fn field(&self, name: &str) -> Result<Value, AccessError> {
        Ok(self.as_object()?.get(name))
    }

    /// Number of items of a container, `None` for other values
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::List(l) => Some(l.borrow().items.len()),
            Self::Set(s) => Some(s.borrow().items.len()),
            Self::Map(m) => Some(m.borrow().entries.len()),
            Self::Array(a) => Some(a.borrow().items.len()),
            _ => None,
        }
    }

    /// Check if this is an empty container
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Items of a list, set or array, values of a map; empty otherwise
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        match self {
            Self::List(l) => l.borrow().items.clone(),
            Self::Set(s) => s.borrow().items.iter().cloned().collect(),
            Self::Map(m) => m.borrow().entries.values().cloned().collect(),
            Self::Array(a) => a.borrow().items.clone(),
            _ => Vec::new(),
        }
    }

    /// Same value or same reference
    ///
    /// Equivalent to `==`; spelled out where identity matters.
    #[inline]
    #[must_use]
    pub fn same(&self, other: &Value) -> bool {
        self == other
    }

    pub(crate) fn type_label(&self) -> String {
        self.runtime_type()
            .map_or_else(|| "null".to_string(), |t| t.to_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::U8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::F32(v) => v.to_bits().hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Date(v) => v.hash(state),
            Self::Enum(v) => v.hash(state),
            Self::Object(_) | Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Array(_) => {
                self.identity().hash(state);
            }
        }
    }
}

// Shallow: object graphs may be cyclic
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Char(v) => write!(f, "Char({v:?})"),
            Self::I8(v) => write!(f, "I8({v})"),
            Self::I16(v) => write!(f, "I16({v})"),
            Self::I32(v) => write!(f, "I32({v})"),
            Self::I64(v) => write!(f, "I64({v})"),
            Self::U8(v) => write!(f, "U8({v})"),
            Self::U16(v) => write!(f, "U16({v})"),
            Self::U32(v) => write!(f, "U32({v})"),
            Self::U64(v) => write!(f, "U64({v})"),
            Self::F32(v) => write!(f, "F32({v})"),
            Self::F64(v) => write!(f, "F64({v})"),
            Self::String(v) => write!(f, "String({v:?})"),
            Self::Date(v) => write!(f, "Date({v})"),
            Self::Enum(v) => write!(f, "Enum({}::{})", v.ty, v.name),
            Self::Object(_) => write!(f, "Object({})", self.type_label()),
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Array(_) => {
                write!(f, "{}(len={})", self.type_label(), self.len().unwrap_or(0))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}
