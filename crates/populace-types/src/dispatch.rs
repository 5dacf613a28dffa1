//! Type-keyed dispatch tables
//!
//! A [`TypeDispatchTable`] maps a [`TypeDescriptor`] to a handler using five
//! kinds of registration, consulted in a fixed order:
//!
//! 1. exact match on the full descriptor, then on the raw type
//! 2. nearest registered supertype
//! 3. longest package prefix (whole `::` segments)
//! 4. array default, for arrays
//! 5. default
//!
//! Tables are frozen once built. Use [`TypeDispatchTable::to_builder`] to
//! derive a modified copy.

use crate::descriptor::TypeDescriptor;
use crate::error::DispatchError;
use crate::name::{TypeName, SEPARATOR};
use crate::registry::TypeRegistry;
use indexmap::IndexMap;
use radix_trie::Trie;
use std::fmt;

/// Builder for [`TypeDispatchTable`]
///
/// Registering the same key twice replaces the earlier handler.
#[derive(Debug, Clone)]
pub struct TypeDispatchTableBuilder<H> {
    specific: IndexMap<TypeDescriptor, H>,
    supers: IndexMap<TypeName, H>,
    packages: IndexMap<String, H>,
    array_default: Option<H>,
    default: Option<H>,
}

impl<H> Default for TypeDispatchTableBuilder<H> {
    fn default() -> Self {
        Self {
            specific: IndexMap::new(),
            supers: IndexMap::new(),
            packages: IndexMap::new(),
            array_default: None,
            default: None,
        }
    }
}

impl<H> TypeDispatchTableBuilder<H> {
    /// Create empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for exactly `ty`
    ///
    /// A raw descriptor also matches every parameterization of that type
    /// that has no exact registration of its own.
    #[must_use]
    pub fn with_specific(mut self, ty: impl Into<TypeDescriptor>, handler: H) -> Self {
        self.specific.insert(ty.into(), handler);
        self
    }

    /// Register a handler for `base` and every type assignable to it
    #[must_use]
    pub fn with_super(mut self, base: impl Into<TypeName>, handler: H) -> Self {
        self.supers.insert(base.into(), handler);
        self
    }

    /// Register a handler for every type whose package starts with `prefix`
    #[must_use]
    pub fn with_package(mut self, prefix: &str, handler: H) -> Self {
        self.packages.insert(normalize_prefix(prefix), handler);
        self
    }

    /// Register the handler for array types
    #[must_use]
    pub fn with_array_default(mut self, handler: H) -> Self {
        self.array_default = Some(handler);
        self
    }

    /// Register the fallback handler
    #[must_use]
    pub fn with_default(mut self, handler: H) -> Self {
        self.default = Some(handler);
        self
    }

    /// Freeze the table
    ///
    /// # Errors
    /// Returns error if no default handler was registered or a package
    /// prefix is empty
    pub fn build(self) -> Result<TypeDispatchTable<H>, DispatchError> {
        let default = self.default.ok_or(DispatchError::MissingDefault)?;
        if self.packages.keys().any(|k| k == SEPARATOR) {
            return Err(DispatchError::EmptyPackagePrefix);
        }
        Ok(TypeDispatchTable {
            package_index: index_packages(&self.packages),
            specific: self.specific,
            supers: self.supers,
            packages: self.packages,
            array_default: self.array_default,
            default,
        })
    }
}

/// Frozen type → handler table
pub struct TypeDispatchTable<H> {
    specific: IndexMap<TypeDescriptor, H>,
    supers: IndexMap<TypeName, H>,
    packages: IndexMap<String, H>,
    package_index: Trie<String, usize>,
    array_default: Option<H>,
    default: H,
}

impl<H> TypeDispatchTable<H> {
    /// Create empty builder
    #[must_use]
    pub fn builder() -> TypeDispatchTableBuilder<H> {
        TypeDispatchTableBuilder::new()
    }

    /// Handler for `ty`
    ///
    /// Never fails: the default handler is the last resort.
    #[must_use]
    pub fn get(&self, ty: &TypeDescriptor, types: &TypeRegistry) -> &H {
        if let Some(handler) = self.specific.get(ty) {
            return handler;
        }
        if ty.is_parameterized() {
            if let Some(handler) = self.specific.get(&ty.erased()) {
                return handler;
            }
        }
        if let Some(handler) = self.nearest_super(ty.raw_name(), types) {
            return handler;
        }
        if ty.is_array() {
            return self.array_default.as_ref().unwrap_or(&self.default);
        }
        self.package_handler(ty.raw_name()).unwrap_or(&self.default)
    }

    /// Fallback handler
    #[inline]
    #[must_use]
    pub fn default_handler(&self) -> &H {
        &self.default
    }

    /// Array handler, if registered
    #[inline]
    #[must_use]
    pub fn array_default(&self) -> Option<&H> {
        self.array_default.as_ref()
    }

    /// Handler registered for exactly `ty`
    #[inline]
    #[must_use]
    pub fn specific(&self, ty: &TypeDescriptor) -> Option<&H> {
        self.specific.get(ty)
    }

    /// Handler registered for supertype `base`
    #[inline]
    #[must_use]
    pub fn super_handler(&self, base: &TypeName) -> Option<&H> {
        self.supers.get(base)
    }

    /// Handler registered for package `prefix`
    #[must_use]
    pub fn package(&self, prefix: &str) -> Option<&H> {
        self.packages.get(&normalize_prefix(prefix))
    }

    fn nearest_super(&self, raw: &TypeName, types: &TypeRegistry) -> Option<&H> {
        if self.supers.is_empty() {
            return None;
        }
        let candidates: Vec<(TypeName, usize)> = types
            .ancestor_names(raw)
            .into_iter()
            .filter(|(name, _)| self.supers.contains_key(name))
            .collect();

        // Keep candidates that are not a supertype of another candidate
        candidates
            .iter()
            .filter(|(name, _)| {
                !candidates
                    .iter()
                    .any(|(other, _)| other != name && types.is_assignable(other, name))
            })
            .min_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)))
            .and_then(|(name, _)| self.supers.get(name))
    }

    fn package_handler(&self, raw: &TypeName) -> Option<&H> {
        let package = raw.package();
        if package.is_empty() {
            return None;
        }
        let key = format!("{package}{SEPARATOR}");
        let index = *self.package_index.get_ancestor_value(&key)?;
        self.packages.get_index(index).map(|(_, handler)| handler)
    }
}

impl<H: Clone> TypeDispatchTable<H> {
    /// Builder seeded with a copy of every registration of this table
    #[must_use]
    pub fn to_builder(&self) -> TypeDispatchTableBuilder<H> {
        TypeDispatchTableBuilder {
            specific: self.specific.clone(),
            supers: self.supers.clone(),
            packages: self.packages.clone(),
            array_default: self.array_default.clone(),
            default: Some(self.default.clone()),
        }
    }
}

impl<H: Clone> Clone for TypeDispatchTable<H> {
    fn clone(&self) -> Self {
        Self {
            specific: self.specific.clone(),
            supers: self.supers.clone(),
            packages: self.packages.clone(),
            package_index: index_packages(&self.packages),
            array_default: self.array_default.clone(),
            default: self.default.clone(),
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for TypeDispatchTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDispatchTable")
            .field("specific", &self.specific)
            .field("supers", &self.supers)
            .field("packages", &self.packages)
            .field("array_default", &self.array_default)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches(SEPARATOR);
    format!("{trimmed}{SEPARATOR}")
}

fn index_packages<H>(packages: &IndexMap<String, H>) -> Trie<String, usize> {
    let mut trie = Trie::new();
    for (index, prefix) in packages.keys().enumerate() {
        trie.insert(prefix.clone(), index);
    }
    trie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassDef;
    use crate::name::builtin;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    fn list_of(arg: &str) -> TypeDescriptor {
        TypeDescriptor::parameterized(builtin::LIST, [arg])
    }

    #[derive(Debug, Clone, Copy)]
    enum Entry {
        Specific(&'static str),
        Super(&'static str),
        Package(&'static str),
    }

    const ENTRIES: [Entry; 8] = [
        Entry::Specific(builtin::STRING),
        Entry::Super(builtin::COLLECTION),
        Entry::Super(builtin::LIST),
        Entry::Super(builtin::SET),
        Entry::Super(builtin::MAP),
        Entry::Super(builtin::OBJECT),
        Entry::Package("std"),
        Entry::Package("std::collections"),
    ];

    fn table_of(entries: &[Entry]) -> TypeDispatchTable<&'static str> {
        entries
            .iter()
            .fold(TypeDispatchTable::builder().with_default("default"), |builder, entry| {
                match *entry {
                    Entry::Specific(ty) => builder.with_specific(ty, ty),
                    Entry::Super(base) => builder.with_super(base, base),
                    Entry::Package(prefix) => builder.with_package(prefix, prefix),
                }
            })
            .build()
            .unwrap()
    }

    fn queries() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::raw(builtin::STRING),
            TypeDescriptor::raw(builtin::I32),
            TypeDescriptor::raw(builtin::HASH_SET),
            TypeDescriptor::raw(builtin::HASH_MAP),
            TypeDescriptor::parameterized(builtin::ARRAY_LIST, [builtin::STRING]),
            TypeDescriptor::array(builtin::STRING),
            TypeDescriptor::raw("demo::Person"),
        ]
    }

    fn picked_and_shuffled() -> impl Strategy<Value = (Vec<Entry>, Vec<Entry>)> {
        subsequence(ENTRIES.to_vec(), 0..=ENTRIES.len())
            .prop_flat_map(|picked| (Just(picked.clone()), Just(picked).prop_shuffle()))
    }

    proptest! {
        #[test]
        fn lookup_ignores_registration_order((picked, shuffled) in picked_and_shuffled()) {
            let types = TypeRegistry::builtin();
            let expected = table_of(&picked);
            let actual = table_of(&shuffled);
            for query in queries() {
                prop_assert_eq!(actual.get(&query, &types), expected.get(&query, &types));
            }
        }
    }

    #[test]
    fn missing_default_fails() {
        let result = TypeDispatchTable::<&str>::builder()
            .with_super(builtin::LIST, "list")
            .build();
        assert_eq!(result.unwrap_err(), DispatchError::MissingDefault);
    }

    #[test]
    fn empty_package_prefix_fails() {
        let result = TypeDispatchTable::builder()
            .with_package("", "root")
            .with_default("default")
            .build();
        assert_eq!(result.unwrap_err(), DispatchError::EmptyPackagePrefix);
    }

    #[test]
    fn exact_beats_super() {
        let types = TypeRegistry::builtin();
        let table = TypeDispatchTable::builder()
            .with_super(builtin::LIST, "any list")
            .with_specific(list_of(builtin::STRING), "string list")
            .with_default("default")
            .build()
            .unwrap();

        assert_eq!(*table.get(&list_of(builtin::STRING), &types), "string list");
        assert_eq!(*table.get(&list_of(builtin::I32), &types), "any list");
    }

    #[test]
    fn raw_specific_matches_parameterized() {
        let types = TypeRegistry::builtin();
        let table = TypeDispatchTable::builder()
            .with_specific(builtin::LIST, "raw list")
            .with_default("default")
            .build()
            .unwrap();
        assert_eq!(*table.get(&list_of(builtin::STRING), &types), "raw list");
    }

    #[test]
    fn nearest_super_is_order_independent() {
        let types = TypeRegistry::builtin();
        let array_list = TypeDescriptor::parameterized(builtin::ARRAY_LIST, [builtin::STRING]);

        let forward = TypeDispatchTable::builder()
            .with_super(builtin::COLLECTION, "collection")
            .with_super(builtin::LIST, "list")
            .with_default("default")
            .build()
            .unwrap();
        let backward = TypeDispatchTable::builder()
            .with_super(builtin::LIST, "list")
            .with_super(builtin::COLLECTION, "collection")
            .with_default("default")
            .build()
            .unwrap();

        assert_eq!(*forward.get(&array_list, &types), "list");
        assert_eq!(*backward.get(&array_list, &types), "list");
        assert_eq!(
            *forward.get(&TypeDescriptor::raw(builtin::HASH_SET), &types),
            "collection"
        );
    }

    #[test]
    fn unrelated_supers_tie_break_by_distance() {
        let types = TypeRegistry::builder()
            .with_class(ClassDef::interface("demo::Named").build())
            .with_class(ClassDef::interface("demo::Tagged").build())
            .with_class(ClassDef::abstract_class("demo::Base").extends("demo::Tagged").build())
            .with_class(
                ClassDef::concrete("demo::Item")
                    .extends("demo::Base")
                    .extends("demo::Named")
                    .build(),
            )
            .build()
            .unwrap();
        let table = TypeDispatchTable::builder()
            .with_super("demo::Tagged", "tagged")
            .with_super("demo::Named", "named")
            .with_default("default")
            .build()
            .unwrap();

        assert_eq!(*table.get(&TypeDescriptor::raw("demo::Item"), &types), "named");
    }

    #[test]
    fn package_longest_prefix() {
        let types = TypeRegistry::builtin();
        let table = TypeDispatchTable::builder()
            .with_package("demo", "demo")
            .with_package("demo::model::", "model")
            .with_default("default")
            .build()
            .unwrap();

        let get = |name: &str| *table.get(&TypeDescriptor::raw(name), &types);
        assert_eq!(get("demo::model::Person"), "model");
        assert_eq!(get("demo::model::inner::Leaf"), "model");
        assert_eq!(get("demo::Other"), "demo");
        assert_eq!(get("demonstration::Other"), "default");
        assert_eq!(get("Unqualified"), "default");
    }

    #[test]
    fn array_default_only_for_arrays() {
        let types = TypeRegistry::builtin();
        let table = TypeDispatchTable::builder()
            .with_package("std", "std")
            .with_array_default("array")
            .with_default("default")
            .build()
            .unwrap();

        assert_eq!(*table.get(&TypeDescriptor::array(builtin::STRING), &types), "array");
        assert_eq!(*table.get(&TypeDescriptor::raw(builtin::STRING), &types), "std");
    }

    #[test]
    fn to_builder_copies_entries() {
        let types = TypeRegistry::builtin();
        let table = TypeDispatchTable::builder()
            .with_super(builtin::MAP, "map")
            .with_default("default")
            .build()
            .unwrap();
        let extended = table
            .to_builder()
            .with_specific(builtin::STRING, "string")
            .build()
            .unwrap();

        assert_eq!(table.specific(&TypeDescriptor::raw(builtin::STRING)), None);
        assert_eq!(*extended.get(&TypeDescriptor::raw(builtin::STRING), &types), "string");
        assert_eq!(*extended.get(&TypeDescriptor::raw(builtin::HASH_MAP), &types), "map");
    }

    #[test]
    fn re_registration_replaces() {
        let table = TypeDispatchTable::builder()
            .with_default("first")
            .with_default("second")
            .with_super(builtin::SET, "a")
            .with_super(builtin::SET, "b")
            .build()
            .unwrap();
        assert_eq!(*table.default_handler(), "second");
        assert_eq!(table.super_handler(&TypeName::new(builtin::SET)), Some(&"b"));
    }
}
