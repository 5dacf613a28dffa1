use super::{unsupported, Inspector};
use crate::element::{ElementSlot, RawElement};
use crate::error::InspectError;
use crate::value::Value;
use populace_types::{TypeArg, TypeContext, TypeResolver};

/// Inspector for array slots
///
/// Slots are typed by the declared component when it is known, otherwise
/// by the array's own component type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayInspector;

impl Inspector for ArrayInspector {
    fn elements(
        &self,
        value: &Value,
        ctx: &TypeContext,
        resolver: &TypeResolver<'_>,
    ) -> Result<Vec<RawElement>, InspectError> {
        let Value::Array(array) = value else {
            return Err(unsupported(self.name(), value));
        };
        let array = array.borrow();
        let component = ctx
            .declared()
            .and_then(|declared| declared.component())
            .map(|component| resolver.resolve(component, ctx))
            .filter(TypeArg::is_fully_resolved)
            .unwrap_or_else(|| TypeArg::Type(array.component().clone()));

        Ok((0..array.items.len())
            .map(|i| RawElement::new(ElementSlot::ArraySlot(i), component.clone()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "array"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use populace_types::{builtin, TypeDescriptor, TypeName, TypeRegistry};

    #[test]
    fn slots_by_index() {
        let types = TypeRegistry::builtin();
        let resolver = TypeResolver::new(&types);
        let array = Value::array(builtin::I32, [Value::I32(1), Value::I32(2), Value::I32(3)]);
        let elements = ArrayInspector
            .elements(&array, &TypeContext::raw(TypeName::array()), &resolver)
            .unwrap();

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].slot(), &ElementSlot::ArraySlot(2));
        assert_eq!(elements[0].declared_type(), &TypeArg::from(builtin::I32));
    }

    #[test]
    fn declared_component_wins() {
        let types = TypeRegistry::builtin();
        let resolver = TypeResolver::new(&types);
        let array = Value::array(builtin::OBJECT, [Value::Null]);
        let ctx = TypeContext::new(TypeName::array(), Some(TypeDescriptor::array(builtin::STRING)));

        let elements = ArrayInspector.elements(&array, &ctx, &resolver).unwrap();
        assert_eq!(elements[0].declared_type(), &TypeArg::from(builtin::STRING));
    }

    #[test]
    fn rejects_objects() {
        let types = TypeRegistry::builtin();
        let resolver = TypeResolver::new(&types);
        let object = Value::object("demo::Thing");
        assert!(ArrayInspector
            .elements(&object, &TypeContext::raw("demo::Thing"), &resolver)
            .is_err());
    }
}
