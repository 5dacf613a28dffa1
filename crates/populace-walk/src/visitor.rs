//! Visitor callbacks

use crate::element::ElementInfo;
use crate::error::VisitError;
use crate::field::FieldInfo;

/// Callbacks invoked by [`GraphWalker`](crate::GraphWalker)
///
/// Each field and each non-null element is visited once per walk, before
/// the walker descends into it. A visitor may replace the value through the
/// descriptor; the walker descends into whatever the slot holds afterwards.
/// Returning an error aborts the walk.
pub trait Visitor {
    /// Visit a field that passed the field filter
    ///
    /// # Errors
    /// Any error aborts the walk
    fn visit_field(&mut self, field: &FieldInfo) -> Result<(), VisitError>;

    /// Visit a container element
    ///
    /// # Errors
    /// Any error aborts the walk
    fn visit_element(&mut self, element: &mut ElementInfo) -> Result<(), VisitError>;
}
