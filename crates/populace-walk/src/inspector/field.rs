use super::Inspector;
use crate::error::InspectError;
use crate::field::RawField;
use populace_types::{TypeName, TypeRegistry};

/// Inspector for plain objects
///
/// Fields of the object's own class first, then those of each superclass,
/// each in declaration order. Objects have no elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldInspector;

impl Inspector for FieldInspector {
    fn fields(&self, ty: &TypeName, types: &TypeRegistry) -> Result<Vec<RawField>, InspectError> {
        Ok(types
            .all_fields(ty)
            .into_iter()
            .map(|(owner, def)| RawField::new(owner, def.clone()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "field"
    }
}
