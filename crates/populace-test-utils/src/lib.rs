//! Testing utilities for Populace workspace
//!
//! Shared fixtures: a small sample domain registered as a [`TypeRegistry`],
//! plus tracing setup for tests.

#![allow(missing_docs)]

use populace_types::{builtin, ClassDef, FieldDef, TypeDescriptor, TypeRegistry};
use populace_walk::Value;
use tracing_subscriber::EnvFilter;

pub const PERSON: &str = "demo::Person";
pub const ADDRESS: &str = "demo::Address";
pub const CONTACT: &str = "demo::Contact";
pub const COLOUR: &str = "demo::Colour";
pub const BOX: &str = "demo::Box";
pub const STRING_BOX: &str = "demo::StringBox";
pub const BADGE: &str = "demo::Person::Badge";
pub const SHAPE: &str = "demo::Shape";
pub const NODE: &str = "demo::Node";

/// Tag marking fields an annotation-driven adapter should skip
pub const XML_TRANSIENT: &str = "xml::transient";

pub const COLOURS: [&str; 3] = ["Red", "Green", "Blue"];

/// `demo::Person { name: String, age: i32, tags: List<String> }`
pub fn person_types() -> TypeRegistry {
    TypeRegistry::builder()
        .with_class(person_class())
        .build()
        .unwrap()
}

/// The whole sample domain
pub fn sample_types() -> TypeRegistry {
    let boxed = ClassDef::concrete(BOX).type_param("T");
    let t = boxed.var("T");
    let boxed = boxed.field(FieldDef::new("value", t)).build();

    TypeRegistry::builder()
        .with_class(person_class())
        .with_class(
            ClassDef::concrete(ADDRESS)
                .field(FieldDef::new("street", builtin::STRING))
                .field(FieldDef::new("postcode", builtin::U32))
                .build(),
        )
        .with_class(
            ClassDef::concrete(CONTACT)
                .field(FieldDef::new("owner", PERSON))
                .field(FieldDef::new("address", ADDRESS))
                .field(FieldDef::new("favourite", COLOUR))
                .field(FieldDef::new("since", builtin::DATE))
                .field(FieldDef::new(
                    "aliases",
                    TypeDescriptor::parameterized(builtin::SET, [builtin::STRING]),
                ))
                .field(FieldDef::new(
                    "scores",
                    TypeDescriptor::parameterized(builtin::MAP, [builtin::STRING, builtin::I64]),
                ))
                .field(FieldDef::new("lucky", TypeDescriptor::array(builtin::U8)))
                .field(FieldDef::new("password", builtin::STRING).transient())
                .field(FieldDef::new("legacy", builtin::STRING).with_tag(XML_TRANSIENT))
                .field(FieldDef::new("attachment", builtin::OBJECT))
                .build(),
        )
        .with_class(ClassDef::enumeration(COLOUR, &COLOURS).build())
        .with_class(boxed)
        .with_class(
            ClassDef::concrete(STRING_BOX)
                .extends(TypeDescriptor::parameterized(BOX, [builtin::STRING]))
                .build(),
        )
        .with_class(
            ClassDef::concrete(BADGE)
                .inner_of(PERSON)
                .field(FieldDef::new("id", builtin::I64))
                .build(),
        )
        .with_class(ClassDef::abstract_class(SHAPE).build())
        .with_class(
            ClassDef::concrete(NODE)
                .field(FieldDef::new("label", builtin::STRING))
                .field(FieldDef::new("next", NODE))
                .build(),
        )
        .build()
        .unwrap()
}

fn person_class() -> ClassDef {
    ClassDef::concrete(PERSON)
        .field(FieldDef::new("name", builtin::STRING))
        .field(FieldDef::new("age", builtin::I32))
        .field(FieldDef::new(
            "tags",
            TypeDescriptor::parameterized(builtin::LIST, [builtin::STRING]),
        ))
        .build()
}

/// Person with every field unset
pub fn empty_person() -> Value {
    Value::object(PERSON)
        .with_field("name", Value::Null)
        .unwrap()
        .with_field("age", Value::I32(0))
        .unwrap()
        .with_field("tags", Value::Null)
        .unwrap()
}

/// Install a test-writer subscriber filtered by `RUST_LOG`; safe to call
/// from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
