//! Field filters
//!
//! A [`FieldFilter`] decides which fields the walker visits. Filters are
//! plain values: they compare and hash structurally, so configurations
//! holding them can be compared. `Any` and `All` compare their members as
//! sets.

use crate::field::FieldInfo;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// User-supplied field predicate
pub trait FieldPredicate: Send + Sync {
    /// Check if `field` should be visited
    fn include(&self, field: &FieldInfo) -> bool;
}

impl<F> FieldPredicate for F
where
    F: Fn(&FieldInfo) -> bool + Send + Sync,
{
    fn include(&self, field: &FieldInfo) -> bool {
        self(field)
    }
}

/// Predicate deciding which fields are walked
#[derive(Clone)]
pub enum FieldFilter {
    /// Visit every field
    IncludeAll,

    /// Skip transient fields
    ExcludeTransient,

    /// Skip fields with this name
    ExcludeNamed(Arc<str>),

    /// Skip fields carrying this tag
    ExcludeTagged(Arc<str>),

    /// Named custom predicate; equal only to clones of itself
    Custom(Arc<str>, Arc<dyn FieldPredicate>),

    /// Inverse of the inner filter
    Not(Box<FieldFilter>),

    /// Both filters must include
    And(Box<FieldFilter>, Box<FieldFilter>),

    /// Either filter must include
    Or(Box<FieldFilter>, Box<FieldFilter>),

    /// At least one filter must include
    Any(Vec<FieldFilter>),

    /// Every filter must include
    All(Vec<FieldFilter>),
}

impl Default for FieldFilter {
    fn default() -> Self {
        Self::ExcludeTransient
    }
}

impl FieldFilter {
    /// Filter excluding fields named `name`
    #[must_use]
    pub fn exclude_named(name: &str) -> Self {
        Self::ExcludeNamed(Arc::from(name))
    }

    /// Filter excluding fields tagged `tag`
    #[must_use]
    pub fn exclude_tagged(tag: &str) -> Self {
        Self::ExcludeTagged(Arc::from(tag))
    }

    /// Filter from a custom predicate
    #[must_use]
    pub fn custom(name: &str, predicate: impl FieldPredicate + 'static) -> Self {
        Self::Custom(Arc::from(name), Arc::new(predicate))
    }

    /// Inverse of this filter
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Include only fields both filters include
    #[must_use]
    pub fn and(self, other: FieldFilter) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Include fields either filter includes
    #[must_use]
    pub fn or(self, other: FieldFilter) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Include fields any of `filters` includes
    ///
    /// An empty list includes nothing.
    #[must_use]
    pub fn any(filters: impl IntoIterator<Item = FieldFilter>) -> Self {
        Self::Any(filters.into_iter().collect())
    }

    /// Include fields all of `filters` include
    ///
    /// An empty list includes everything.
    #[must_use]
    pub fn all(filters: impl IntoIterator<Item = FieldFilter>) -> Self {
        Self::All(filters.into_iter().collect())
    }

    /// Check if `field` should be visited
    #[must_use]
    pub fn include(&self, field: &FieldInfo) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeTransient => !field.is_transient(),
            Self::ExcludeNamed(name) => field.name() != &**name,
            Self::ExcludeTagged(tag) => !field.raw().has_tag(tag),
            Self::Custom(_, predicate) => predicate.include(field),
            Self::Not(inner) => !inner.include(field),
            Self::And(a, b) => a.include(field) && b.include(field),
            Self::Or(a, b) => a.include(field) || b.include(field),
            Self::Any(filters) => filters.iter().any(|f| f.include(field)),
            Self::All(filters) => filters.iter().all(|f| f.include(field)),
        }
    }
}

fn same_members(a: &[FieldFilter], b: &[FieldFilter]) -> bool {
    a.len() == b.len() && a.iter().all(|f| b.contains(f)) && b.iter().all(|f| a.contains(f))
}

fn unordered_hash(filters: &[FieldFilter]) -> u64 {
    filters
        .iter()
        .map(|f| {
            let mut hasher = DefaultHasher::new();
            f.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add)
}

impl PartialEq for FieldFilter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IncludeAll, Self::IncludeAll) | (Self::ExcludeTransient, Self::ExcludeTransient) => true,
            (Self::ExcludeNamed(a), Self::ExcludeNamed(b))
            | (Self::ExcludeTagged(a), Self::ExcludeTagged(b)) => a == b,
            (Self::Custom(na, a), Self::Custom(nb, b)) => na == nb && Arc::ptr_eq(a, b),
            (Self::Not(a), Self::Not(b)) => a == b,
            (Self::And(a1, a2), Self::And(b1, b2)) | (Self::Or(a1, a2), Self::Or(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            (Self::Any(a), Self::Any(b)) | (Self::All(a), Self::All(b)) => same_members(a, b),
            _ => false,
        }
    }
}

impl Eq for FieldFilter {}

impl Hash for FieldFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::IncludeAll | Self::ExcludeTransient => {}
            Self::ExcludeNamed(s) | Self::ExcludeTagged(s) => s.hash(state),
            Self::Custom(name, predicate) => {
                name.hash(state);
                Arc::as_ptr(predicate).cast::<()>().hash(state);
            }
            Self::Not(inner) => inner.hash(state),
            Self::And(a, b) | Self::Or(a, b) => {
                a.hash(state);
                b.hash(state);
            }
            Self::Any(filters) | Self::All(filters) => unordered_hash(filters).hash(state),
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeAll => f.write_str("IncludeAll"),
            Self::ExcludeTransient => f.write_str("ExcludeTransient"),
            Self::ExcludeNamed(name) => write!(f, "ExcludeNamed({name})"),
            Self::ExcludeTagged(tag) => write!(f, "ExcludeTagged({tag})"),
            Self::Custom(name, _) => write!(f, "Custom({name})"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::And(a, b) => write!(f, "({a} && {b})"),
            Self::Or(a, b) => write!(f, "({a} || {b})"),
            Self::Any(filters) => write_group(f, "ANY", filters),
            Self::All(filters) => write_group(f, "ALL", filters),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, label: &str, filters: &[FieldFilter]) -> fmt::Result {
    write!(f, "{label} {{")?;
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{filter}")?;
    }
    f.write_str("}")
}

impl fmt::Debug for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RawField;
    use crate::path::WalkerPath;
    use crate::value::Value;
    use populace_types::{builtin, FieldDef, TypeDescriptor};
    use proptest::prelude::*;
    use proptest::sample::subsequence;
    use std::collections::HashSet;

    fn field(def: FieldDef) -> FieldInfo {
        FieldInfo::new(
            RawField::new("demo::Thing", def),
            TypeDescriptor::raw(builtin::STRING),
            Value::object("demo::Thing"),
            WalkerPath::root("demo::Thing"),
        )
    }

    #[test]
    fn builtin_filters() {
        let plain = field(FieldDef::new("name", builtin::STRING));
        let transient = field(FieldDef::new("cache", builtin::STRING).transient());
        let tagged = field(FieldDef::new("raw", builtin::STRING).with_tag("xml_transient"));

        assert!(FieldFilter::default().include(&plain));
        assert!(!FieldFilter::default().include(&transient));
        assert!(FieldFilter::IncludeAll.include(&transient));
        assert!(!FieldFilter::exclude_named("name").include(&plain));
        assert!(!FieldFilter::exclude_tagged("xml_transient").include(&tagged));
        assert!(FieldFilter::exclude_tagged("xml_transient").include(&plain));
    }

    #[test]
    fn combinators() {
        let plain = field(FieldDef::new("name", builtin::STRING));
        let named = FieldFilter::exclude_named("name");

        assert!(named.clone().not().include(&plain));
        assert!(!FieldFilter::IncludeAll.and(named.clone()).include(&plain));
        assert!(FieldFilter::IncludeAll.or(named.clone()).include(&plain));
        assert!(FieldFilter::any([named.clone(), FieldFilter::IncludeAll]).include(&plain));
        assert!(!FieldFilter::all([named, FieldFilter::IncludeAll]).include(&plain));
        assert!(!FieldFilter::any([]).include(&plain));
    }

    #[test]
    fn custom_predicate() {
        let short = FieldFilter::custom("short names", |f: &FieldInfo| f.name().len() < 5);
        assert!(short.include(&field(FieldDef::new("id", builtin::I32))));
        assert!(!short.include(&field(FieldDef::new("address", builtin::STRING))));
        assert_eq!(short, short.clone());
        assert_ne!(short, FieldFilter::custom("short names", |_: &FieldInfo| true));
    }

    #[test]
    fn any_and_all_compare_as_sets() {
        let a = FieldFilter::exclude_named("a");
        let b = FieldFilter::exclude_named("b");

        let forward = FieldFilter::any([a.clone(), b.clone()]);
        let backward = FieldFilter::any([b.clone(), a.clone()]);
        assert_eq!(forward, backward);

        let mut set = HashSet::new();
        set.insert(forward);
        assert!(set.contains(&backward));

        assert_ne!(FieldFilter::any([a.clone(), b.clone()]), FieldFilter::all([a.clone(), b]));
        assert_ne!(FieldFilter::any([a.clone()]), FieldFilter::any([a.clone(), a]));
    }

    #[test]
    fn display() {
        let filter = FieldFilter::any([FieldFilter::ExcludeTransient, FieldFilter::exclude_named("x")]);
        assert_eq!(filter.to_string(), "ANY {ExcludeTransient,ExcludeNamed(x)}");
    }

    fn hash_of(filter: &FieldFilter) -> u64 {
        let mut hasher = DefaultHasher::new();
        filter.hash(&mut hasher);
        hasher.finish()
    }

    fn names() -> impl Strategy<Value = (Vec<&'static str>, Vec<&'static str>)> {
        subsequence(vec!["a", "b", "c", "d", "e"], 1..=5)
            .prop_flat_map(|picked| (Just(picked.clone()), Just(picked).prop_shuffle()))
    }

    proptest! {
        #[test]
        fn groups_ignore_member_order((picked, shuffled) in names()) {
            let members = |names: &[&str]| -> Vec<FieldFilter> {
                names.iter().map(|name| FieldFilter::exclude_named(name)).collect()
            };

            let any = FieldFilter::any(members(&picked));
            let any_shuffled = FieldFilter::any(members(&shuffled));
            prop_assert_eq!(&any, &any_shuffled);
            prop_assert_eq!(hash_of(&any), hash_of(&any_shuffled));

            let all = FieldFilter::all(members(&picked));
            let all_shuffled = FieldFilter::all(members(&shuffled));
            prop_assert_eq!(&all, &all_shuffled);
            prop_assert_eq!(hash_of(&all), hash_of(&all_shuffled));
        }
    }
}
