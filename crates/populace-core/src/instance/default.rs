//! Construction from class metadata

use super::{InstanceFactories, InstanceFactory};
use crate::error::InstanceCreationError;
use crate::mutator::seed_date;
use indexmap::IndexMap;
use populace_types::{builtin, ClassKind, Shape, TypeDescriptor, TypeName, TypeRegistry};
use populace_walk::{ObjectRef, Value};
use std::sync::Arc;

/// Creates instances of concrete classes through their default constructor
///
/// Objects start with a slot per declared field (own and inherited), holding
/// the zero value for primitives and null otherwise. List, set and map shaped
/// classes start empty. Non-static inner classes take `parent` as their
/// enclosing instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultInstanceFactory;

impl InstanceFactory for DefaultInstanceFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        parent: Option<&Value>,
        _factories: &InstanceFactories,
        types: &TypeRegistry,
    ) -> Result<Option<Value>, InstanceCreationError> {
        let name = ty.raw_name();
        let def = types.class(name).map_err(|source| InstanceCreationError::Type {
            ty: ty.clone(),
            source,
        })?;

        let reason = match def.kind() {
            ClassKind::Primitive => return Ok(Some(Value::zero_of(name))),
            ClassKind::Interface => Some("interface"),
            ClassKind::Abstract => Some("abstract class"),
            ClassKind::Enum => Some("enumeration"),
            ClassKind::Concrete if !def.has_default_constructor() => Some("no default constructor"),
            ClassKind::Concrete => None,
        };
        if let Some(reason) = reason {
            return Err(InstanceCreationError::NotInstantiable {
                ty: ty.clone(),
                reason,
            });
        }

        let enclosing = match def.enclosing() {
            Some(outer) => Some(enclosing_instance(ty, outer, parent, types)?),
            None => None,
        };

        let value = match types.shape(name) {
            Shape::Scalar => scalar(ty)?,
            Shape::List => Value::list(name, []),
            Shape::Set => Value::set(name, []),
            Shape::Map => Value::map(name, []),
            Shape::Object => {
                let fields: IndexMap<Arc<str>, Value> = types
                    .all_fields(name)
                    .into_iter()
                    .map(|(_, field)| {
                        let zero = field
                            .ty()
                            .as_type()
                            .map_or(Value::Null, |declared| Value::zero_of(declared.raw_name()));
                        (Arc::clone(field.shared_name()), zero)
                    })
                    .collect();
                Value::object_with(name, fields, enclosing)
            }
        };
        Ok(Some(value))
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

fn scalar(ty: &TypeDescriptor) -> Result<Value, InstanceCreationError> {
    match ty.raw_name().as_str() {
        builtin::STRING => Ok(Value::string("")),
        builtin::DATE => Ok(Value::Date(seed_date())),
        _ => Err(InstanceCreationError::NotInstantiable {
            ty: ty.clone(),
            reason: "scalar type without a known representation",
        }),
    }
}

fn enclosing_instance<'a>(
    ty: &TypeDescriptor,
    outer: &TypeName,
    parent: Option<&'a Value>,
    types: &TypeRegistry,
) -> Result<&'a ObjectRef, InstanceCreationError> {
    match parent {
        Some(Value::Object(object)) if types.is_assignable(object.borrow().ty(), outer) => Ok(object),
        _ => Err(InstanceCreationError::MissingEnclosing {
            ty: ty.clone(),
            enclosing: outer.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use populace_types::{ClassDef, FieldDef, TypeError};
    use std::rc::Rc;
    use pretty_assertions::assert_eq;

    fn types() -> TypeRegistry {
        TypeRegistry::builder()
            .with_class(
                ClassDef::abstract_class("demo::Named")
                    .field(FieldDef::new("name", builtin::STRING))
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::Person")
                    .extends("demo::Named")
                    .field(FieldDef::new("age", builtin::I32))
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::Person::Badge")
                    .inner_of("demo::Person")
                    .field(FieldDef::new("id", builtin::I64))
                    .build(),
            )
            .with_class(
                ClassDef::concrete("demo::Sealed")
                    .without_default_constructor()
                    .build(),
            )
            .build()
            .unwrap()
    }

    fn create(ty: &str, parent: Option<&Value>) -> Result<Option<Value>, InstanceCreationError> {
        DefaultInstanceFactory.create(
            &TypeDescriptor::raw(ty),
            parent,
            &InstanceFactories::defaults(),
            &types(),
        )
    }

    #[test]
    fn zeroed_slots_for_own_and_inherited_fields() {
        let person = create("demo::Person", None).unwrap().unwrap();
        let data = person.as_object().unwrap();

        assert_eq!(data.slot_names().collect::<Vec<_>>(), vec!["age", "name"]);
        assert_eq!(data.get("age"), Value::I32(0));
        assert_eq!(data.get("name"), Value::Null);
    }

    #[test]
    fn refuses_non_concrete_classes() {
        let err = create("demo::Named", None).unwrap_err();
        assert_eq!(
            err,
            InstanceCreationError::NotInstantiable {
                ty: TypeDescriptor::raw("demo::Named"),
                reason: "abstract class",
            }
        );

        let err = create("demo::Sealed", None).unwrap_err();
        assert!(matches!(
            err,
            InstanceCreationError::NotInstantiable { reason: "no default constructor", .. }
        ));
    }

    #[test]
    fn unknown_type() {
        let err = create("demo::Missing", None).unwrap_err();
        assert!(matches!(
            err,
            InstanceCreationError::Type { source: TypeError::UnknownType(_), .. }
        ));
    }

    #[test]
    fn inner_class_binds_parent() {
        let person = create("demo::Person", None).unwrap().unwrap();
        let badge = create("demo::Person::Badge", Some(&person)).unwrap().unwrap();

        let data = badge.as_object().unwrap();
        assert_eq!(data.enclosing().map(Value::Object), Some(person));
    }

    #[test]
    fn inner_class_does_not_keep_parent_alive() {
        let person = create("demo::Person", None).unwrap().unwrap();
        let badge = create("demo::Person::Badge", Some(&person)).unwrap().unwrap();
        person.as_object_mut().unwrap().set("badge", badge.clone());
        let Value::Object(outer) = &person else { unreachable!() };
        let outer = Rc::downgrade(outer);

        drop(person);

        assert!(outer.upgrade().is_none());
        assert!(badge.as_object().unwrap().enclosing().is_none());
    }

    #[test]
    fn inner_class_needs_compatible_parent() {
        let err = create("demo::Person::Badge", None).unwrap_err();
        assert_eq!(
            err,
            InstanceCreationError::MissingEnclosing {
                ty: TypeDescriptor::raw("demo::Person::Badge"),
                enclosing: TypeName::new("demo::Person"),
            }
        );

        let stranger = Value::object("demo::Other");
        assert!(create("demo::Person::Badge", Some(&stranger)).is_err());
    }

    #[test]
    fn builtin_scalars_and_containers() {
        let types = TypeRegistry::builtin();
        let create = |ty: &str| {
            DefaultInstanceFactory
                .create(&TypeDescriptor::raw(ty), None, &InstanceFactories::defaults(), &types)
                .unwrap()
                .unwrap()
        };

        assert_eq!(create(builtin::STRING), Value::string(""));
        assert_eq!(create(builtin::DATE), Value::Date(seed_date()));
        assert!(create(builtin::HASH_SET).is_empty());
        assert_eq!(
            create(builtin::HASH_MAP).runtime_type(),
            Some(TypeName::new(builtin::HASH_MAP))
        );
    }
}
