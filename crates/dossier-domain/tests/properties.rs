//! Property tests for the template model and skeleton builder

use dossier_domain::{build_skeleton, Node, Template};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn leaf() -> impl Strategy<Value = Value> {
    (
        prop_oneof![Just("locked"), Just("overwrite"), Just("append"), Just("custom")],
        "[a-z ]{0,16}",
    )
        .prop_map(|(rule, instruction)| json!({"update_rule": rule, "instruction": instruction}))
}

fn node() -> impl Strategy<Value = Value> {
    prop_oneof![leaf(), Just(json!("literal"))].prop_recursive(4, 32, 5, |inner| {
        prop::collection::vec(("[a-z0-9_]{1,6}", inner), 1..5).prop_map(|entries| {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key, value);
            }
            Value::Object(map)
        })
    })
}

fn template() -> impl Strategy<Value = Value> {
    node().prop_map(|n| json!({ "root": n, "extra": {"x": {"update_rule": "append", "instruction": "x"}} }))
}

proptest! {
    #[test]
    fn identify_leaves_is_deterministic(value in template()) {
        let first = Template::from_value(&value).unwrap();
        let second = Template::from_value(&value).unwrap();
        prop_assert_eq!(first.identify_leaves(), first.identify_leaves());
        prop_assert_eq!(first.identify_leaves(), second.identify_leaves());
    }

    #[test]
    fn every_leaf_pointer_resolves_to_its_field(value in template()) {
        let template = Template::from_value(&value).unwrap();
        for pointer in template.identify_leaves() {
            prop_assert!(matches!(template.resolve(&pointer), Ok(Node::Field(_))));
        }
    }

    #[test]
    fn skeleton_slots_match_lock_state(value in template()) {
        let template = Template::from_value(&value).unwrap();
        let skeleton = build_skeleton(&template);
        for (pointer, field) in skeleton.fields() {
            prop_assert_eq!(
                field.slots().is_some(),
                !field.update_rule().is_locked(),
                "slot presence wrong at {}",
                pointer
            );
        }
        prop_assert_eq!(skeleton.fields().len(), template.identify_leaves().len());
    }

    #[test]
    fn catalog_is_exactly_the_unlocked_leaves(value in template()) {
        let template = Template::from_value(&value).unwrap();
        let unlocked: Vec<_> = template
            .identify_leaves()
            .into_iter()
            .filter(|p| !template.resolve_field(p).unwrap().update_rule().is_locked())
            .collect();
        let catalog: Vec<_> = template.catalog().entries().iter().map(|e| e.pointer.clone()).collect();
        prop_assert_eq!(catalog, unlocked);
    }
}
