use super::{unsupported, Inspector};
use crate::element::{ElementSlot, RawElement};
use crate::error::InspectError;
use crate::value::Value;
use populace_types::{builtin, TypeArg, TypeContext, TypeName, TypeResolver};

/// Inspector for lists and sets
///
/// Elements are typed by the binding of `Collection`'s parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionInspector;

impl Inspector for CollectionInspector {
    fn elements(
        &self,
        value: &Value,
        ctx: &TypeContext,
        resolver: &TypeResolver<'_>,
    ) -> Result<Vec<RawElement>, InspectError> {
        let element_type = resolver
            .parameter(&TypeName::new(builtin::COLLECTION), 0, ctx)
            .unwrap_or_else(|| TypeArg::from(builtin::OBJECT));

        match value {
            Value::List(list) => Ok((0..list.borrow().items.len())
                .map(|i| RawElement::new(ElementSlot::ListItem(i), element_type.clone()))
                .collect()),
            Value::Set(set) => Ok(set
                .borrow()
                .items
                .iter()
                .map(|member| RawElement::new(ElementSlot::SetMember(member.clone()), element_type.clone()))
                .collect()),
            other => Err(unsupported(self.name(), other)),
        }
    }

    fn name(&self) -> &'static str {
        "collection"
    }
}
