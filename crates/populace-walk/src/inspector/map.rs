use super::{unsupported, Inspector};
use crate::element::{ElementSlot, RawElement};
use crate::error::InspectError;
use crate::value::Value;
use populace_types::{builtin, TypeArg, TypeContext, TypeName, TypeResolver};

/// Inspector for map values; keys are never visited
#[derive(Debug, Clone, Copy, Default)]
pub struct MapValueInspector;

impl Inspector for MapValueInspector {
    fn elements(
        &self,
        value: &Value,
        ctx: &TypeContext,
        resolver: &TypeResolver<'_>,
    ) -> Result<Vec<RawElement>, InspectError> {
        let Value::Map(map) = value else {
            return Err(unsupported(self.name(), value));
        };
        let value_type = resolver
            .parameter(&TypeName::new(builtin::MAP), 1, ctx)
            .unwrap_or_else(|| TypeArg::from(builtin::OBJECT));

        Ok(map
            .borrow()
            .entries
            .keys()
            .map(|key| RawElement::new(ElementSlot::MapValue(key.clone()), value_type.clone()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "map_value"
    }
}
