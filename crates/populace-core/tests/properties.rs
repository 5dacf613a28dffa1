//! Every populated slot differs from what it held before

use populace_core::prelude::*;
use populace_test_utils::{init_tracing, sample_types, ADDRESS, COLOUR, COLOURS, CONTACT};
use populace_walk::EnumValue;
use proptest::prelude::*;

fn populator() -> GraphPopulator {
    GraphPopulator::builder().with_types(sample_types()).build()
}

fn address(street: &str, postcode: u32) -> Value {
    Value::object(ADDRESS)
        .with_field("street", Value::from(street))
        .unwrap()
        .with_field("postcode", Value::U32(postcode))
        .unwrap()
}

proptest! {
    #[test]
    fn scalar_fields_always_change(street in ".*", postcode in any::<u32>()) {
        init_tracing();
        let before = address(&street, postcode);
        let after = populator().populate(address(&street, postcode)).unwrap();

        prop_assert_ne!(after.field("street").unwrap(), before.field("street").unwrap());
        prop_assert_ne!(after.field("postcode").unwrap(), before.field("postcode").unwrap());
    }

    #[test]
    fn enum_fields_always_change(ordinal in 0..COLOURS.len()) {
        init_tracing();
        let original = Value::Enum(EnumValue::new(COLOUR, ordinal, COLOURS[ordinal]));
        let contact = Value::object(CONTACT).with_field("favourite", original.clone()).unwrap();

        populator().populate(contact.clone()).unwrap();

        prop_assert_ne!(contact.field("favourite").unwrap(), original);
    }

    #[test]
    fn date_fields_always_change(seconds in 0i64..4_000_000_000) {
        init_tracing();
        let Some(since) = chrono::DateTime::<chrono::Utc>::from_timestamp(seconds, 0) else {
            return Ok(());
        };
        let contact = Value::object(CONTACT).with_field("since", Value::Date(since)).unwrap();

        populator().populate(contact.clone()).unwrap();

        prop_assert_ne!(contact.field("since").unwrap(), Value::Date(since));
    }

    #[test]
    fn repeated_population_keeps_changing(rounds in 1usize..5) {
        init_tracing();
        let populator = populator();
        let value = address("a", 0);
        let mut seen = vec![value.field("street").unwrap()];

        for _ in 0..rounds {
            populator.populate(value.clone()).unwrap();
            let street = value.field("street").unwrap();
            prop_assert!(!seen.contains(&street));
            seen.push(street);
        }
    }
}
