//! Walker paths
//!
//! A [`WalkerPath`] records how a value was reached from the root of a walk:
//! the root type followed by field names and element positions. Rendered as
//! `Person.tags[0]` in logs and errors.

use populace_types::TypeName;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Single step of a [`WalkerPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Named field
    Field(Arc<str>),

    /// Element position within a container
    Element(usize),
}

/// Route from the walk root to the current value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WalkerPath {
    root: TypeName,
    segments: SmallVec<[PathSegment; 8]>,
}

impl WalkerPath {
    /// Path of the root value
    #[inline]
    #[must_use]
    pub fn root(root: impl Into<TypeName>) -> Self {
        Self {
            root: root.into(),
            segments: SmallVec::new(),
        }
    }

    /// Path of field `name` of the current value
    #[must_use]
    pub fn field(&self, name: &Arc<str>) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Field(Arc::clone(name)));
        child
    }

    /// Path of the element at `index` of the current value
    #[must_use]
    pub fn element(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Element(index));
        child
    }

    /// Root type
    #[inline]
    #[must_use]
    pub fn root_type(&self) -> &TypeName {
        &self.root
    }

    /// Segments after the root
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl Display for WalkerPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.simple_name())?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Element(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
