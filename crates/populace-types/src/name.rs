//! Qualified type names
//!
//! Provides [`TypeName`], the raw identity of a type, and the [`builtin`]
//! names every [`TypeRegistry`](crate::TypeRegistry) starts with.

use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Separator between namespace segments of a qualified name
pub const SEPARATOR: &str = "::";

/// Qualified name of a raw type
///
/// Names are `::`-separated paths; everything before the last separator is
/// the type's package.
///
/// # Examples
/// - `std::String` → package `std`, simple name `String`
/// - `demo::model::Person` → package `demo::model`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a name from its qualified form
    #[inline]
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Name of the reserved array type
    #[inline]
    #[must_use]
    pub fn array() -> Self {
        Self::new(builtin::ARRAY)
    }

    /// Qualified name as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package (namespace) part of the name, empty for unqualified names
    #[must_use]
    pub fn package(&self) -> &str {
        self.0
            .rfind(SEPARATOR)
            .map_or("", |idx| &self.0[..idx])
    }

    /// Last segment of the name
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0
            .rfind(SEPARATOR)
            .map_or(&*self.0, |idx| &self.0[idx + SEPARATOR.len()..])
    }

    /// Check if this is the reserved array type
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        &*self.0 == builtin::ARRAY
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&TypeName> for TypeName {
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Names of the types every registry knows about
pub mod builtin {
    /// Universal base type of every non-primitive type
    pub const OBJECT: &str = "std::Object";

    /// Boolean primitive
    pub const BOOL: &str = "std::bool";
    /// Character primitive
    pub const CHAR: &str = "std::char";
    /// 8-bit signed integer primitive
    pub const I8: &str = "std::i8";
    /// 16-bit signed integer primitive
    pub const I16: &str = "std::i16";
    /// 32-bit signed integer primitive
    pub const I32: &str = "std::i32";
    /// 64-bit signed integer primitive
    pub const I64: &str = "std::i64";
    /// 8-bit unsigned integer primitive
    pub const U8: &str = "std::u8";
    /// 16-bit unsigned integer primitive
    pub const U16: &str = "std::u16";
    /// 32-bit unsigned integer primitive
    pub const U32: &str = "std::u32";
    /// 64-bit unsigned integer primitive
    pub const U64: &str = "std::u64";
    /// 32-bit float primitive
    pub const F32: &str = "std::f32";
    /// 64-bit float primitive
    pub const F64: &str = "std::f64";

    /// Text
    pub const STRING: &str = "std::String";
    /// Instant in time (UTC)
    pub const DATE: &str = "std::Date";
    /// Base type of every enumeration
    pub const ENUM: &str = "std::Enum";

    /// Root collection interface, one parameter `E`
    pub const COLLECTION: &str = "std::collections::Collection";
    /// Ordered collection interface, one parameter `E`
    pub const LIST: &str = "std::collections::List";
    /// Unique collection interface, one parameter `E`
    pub const SET: &str = "std::collections::Set";
    /// Key/value interface, parameters `K` and `V`
    pub const MAP: &str = "std::collections::Map";
    /// Default concrete list
    pub const ARRAY_LIST: &str = "std::collections::ArrayList";
    /// Default concrete set
    pub const HASH_SET: &str = "std::collections::HashSet";
    /// Default concrete map
    pub const HASH_MAP: &str = "std::collections::HashMap";

    /// Reserved raw name of array types
    pub const ARRAY: &str = "[]";

    /// All primitive type names
    pub const PRIMITIVES: [&str; 12] = [BOOL, CHAR, I8, I16, I32, I64, U8, U16, U32, U64, F32, F64];
}
