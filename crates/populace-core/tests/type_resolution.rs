//! Type variables, inner classes and non-concrete declared types

use std::rc::Rc;

use populace_core::prelude::*;
use populace_core::{ConfigError, DefaultInstanceFactory, NonConcreteInstanceFactory};
use populace_test_utils::{init_tracing, sample_types, BADGE, BOX, SHAPE, STRING_BOX};
use populace_types::{builtin, ClassDef, FieldDef, TypeDescriptor, TypeName, TypeRegistry};
use pretty_assertions::assert_eq;

const CIRCLE: &str = "demo::Circle";
const CANVAS: &str = "demo::Canvas";
const BAG: &str = "demo::Bag";
const HOLDER: &str = "demo::Holder";
const TICKET: &str = "demo::Holder::Ticket";

fn types() -> TypeRegistry {
    sample_types()
        .to_builder()
        .with_class(ClassDef::concrete(CIRCLE).extends(SHAPE).build())
        .with_class(ClassDef::concrete(CANVAS).field(FieldDef::new("shape", SHAPE)).build())
        .with_class(
            ClassDef::concrete(BAG)
                .field(FieldDef::new(
                    "items",
                    TypeDescriptor::parameterized(builtin::COLLECTION, [builtin::STRING]),
                ))
                .build(),
        )
        .with_class(ClassDef::concrete(HOLDER).field(FieldDef::new("ticket", TICKET)).build())
        .with_class(
            ClassDef::concrete(TICKET)
                .inner_of(HOLDER)
                .field(FieldDef::new("seat", builtin::U16))
                .build(),
        )
        .build()
        .unwrap()
}

fn populator() -> GraphPopulator {
    GraphPopulator::builder().with_types(types()).build()
}

#[test]
fn variables_bound_by_supertype() {
    init_tracing();

    let boxed = populator().populate_type(&TypeDescriptor::raw(STRING_BOX)).unwrap();

    assert_eq!(boxed.field("value").unwrap(), Value::from("populace"));
}

#[test]
fn variables_bound_by_requested_type() {
    init_tracing();
    let ty = TypeDescriptor::parameterized(BOX, [builtin::I32]);

    let boxed = populator().populate_type(&ty).unwrap();

    assert_eq!(boxed.field("value").unwrap(), Value::I32(1));
}

#[test]
fn unbound_variables_fall_back_to_object() {
    init_tracing();

    let boxed = populator().populate_type(&TypeDescriptor::raw(BOX)).unwrap();

    assert_eq!(boxed.field("value").unwrap(), Value::Null);
}

#[test]
fn unbound_variables_use_runtime_type() {
    init_tracing();
    let boxed = Value::object(BOX).with_field("value", Value::from("kept")).unwrap();

    populator().populate(boxed.clone()).unwrap();

    assert_eq!(boxed.field("value").unwrap(), Value::from("kept - populace"));
}

#[test]
fn inner_class_roots_are_rejected() {
    init_tracing();

    let err = populator().populate_type(&TypeDescriptor::raw(BADGE)).unwrap_err();

    assert!(matches!(
        &err,
        PopulateError::Config(ConfigError::InnerClass(ty)) if *ty == TypeName::new(BADGE)
    ));
}

#[test]
fn inner_class_fields_bind_their_owner() {
    init_tracing();

    let holder = populator().populate_type(&TypeDescriptor::raw(HOLDER)).unwrap();

    let ticket = holder.field("ticket").unwrap();
    assert_eq!(ticket.field("seat").unwrap(), Value::U16(1));
    let enclosing = ticket.as_object().unwrap().enclosing();
    assert!(enclosing.is_some_and(|outer| Value::Object(outer).same(&holder)));
}

#[test]
fn inner_class_fields_release_their_owner() {
    init_tracing();
    let holder = populator().populate_type(&TypeDescriptor::raw(HOLDER)).unwrap();
    let ticket = holder.field("ticket").unwrap();
    let Value::Object(outer) = &holder else {
        panic!("expected an object, got {holder:?}");
    };
    let outer = Rc::downgrade(outer);

    drop(holder);

    assert!(outer.upgrade().is_none());
    assert!(ticket.as_object().unwrap().enclosing().is_none());
}

#[test]
fn collection_interface_gets_a_list() {
    init_tracing();

    let bag = populator().populate_type(&TypeDescriptor::raw(BAG)).unwrap();

    let items = bag.field("items").unwrap();
    assert_eq!(items.runtime_type(), Some(TypeName::new(builtin::ARRAY_LIST)));
    assert_eq!(items.len(), Some(1));
    assert!(matches!(&items.items()[0], Value::String(s) if s.starts_with(" - populace")));
}

#[test]
fn abstract_type_mapped_to_implementation() {
    init_tracing();
    let populator = GraphPopulator::builder().with_types(types());
    let factories = populator
        .instance_factories_builder()
        .with_super(SHAPE, NonConcreteInstanceFactory::new(SHAPE, CIRCLE, DefaultInstanceFactory))
        .build()
        .unwrap();
    let populator = populator.with_instance_factories(factories).build();

    let canvas = populator.populate_type(&TypeDescriptor::raw(CANVAS)).unwrap();

    assert_eq!(
        canvas.field("shape").unwrap().runtime_type(),
        Some(TypeName::new(CIRCLE))
    );
}
