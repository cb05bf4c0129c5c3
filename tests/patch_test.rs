//! Integration tests for pointer maps and patch generation.

use idm_forms::{
    generate_patch_set, get_value_from_pointer, is_equal_set, to_json_pointer_map,
    PatchOperation,
};
use serde_json::{json, Value};

fn as_json(patch: &[PatchOperation]) -> Value {
    serde_json::to_value(patch).unwrap()
}

mod pointer_maps {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip_through_pointers() {
        let object = json!({
            "_id": "managed/user/1",
            "userName": "bjensen",
            "address": { "city": "Bristol", "postalCode": "BS1", "lines": ["a", "b"] },
            "preferences": { "updates": false, "marketing": true },
            "tags": {},
            "manager": null
        });

        assert_eq!(get_value_from_pointer(&object, "/"), Some(&object));
        let map = to_json_pointer_map(&object);
        assert_eq!(map.len(), 9);
        for (pointer, value) in &map {
            assert_eq!(get_value_from_pointer(&object, pointer), Some(value));
        }
    }
}

mod set_equality {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(v: Value) -> Vec<Value> {
        v.as_array().cloned().unwrap()
    }

    #[test]
    fn documented_cases() {
        assert!(is_equal_set(&set(json!([1])), &set(json!([1]))));
        assert!(!is_equal_set(&set(json!([1])), &set(json!([1, 3]))));
        assert!(is_equal_set(&set(json!([3, 1])), &set(json!([1, 3]))));
    }

    #[test]
    fn symmetric_for_mixed_arrays() {
        let cases = [
            (json!([{ "_ref": "a" }, 1]), json!([1, { "_ref": "a" }])),
            (json!([[1, [2]], "x"]), json!(["x", [[2], 1]])),
            (json!([{ "_ref": "a" }]), json!([{ "_ref": "b" }])),
            (json!([]), json!([null])),
        ];
        for (a, b) in cases {
            let (a, b) = (set(a), set(b));
            assert_eq!(is_equal_set(&a, &b), is_equal_set(&b, &a));
        }
    }
}

mod scalar_changes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_single_field() {
        let patch = generate_patch_set(&json!({ "a": 1, "b": 2 }), &json!({ "a": 1 }));
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "add", "field": "/b", "value": 2 }])
        );
    }

    #[test]
    fn adds_come_before_removes() {
        let patch = generate_patch_set(&json!({ "a": 1, "b": 2 }), &json!({ "c": 1 }));
        assert_eq!(
            as_json(&patch),
            json!([
                { "operation": "add", "field": "/a", "value": 1 },
                { "operation": "add", "field": "/b", "value": 2 },
                { "operation": "remove", "field": "/c" }
            ])
        );
    }

    #[test]
    fn new_container_is_added_whole() {
        let patch = generate_patch_set(
            &json!({ "address": { "city": "Bristol", "postalCode": "BS1" } }),
            &json!({}),
        );
        assert_eq!(
            as_json(&patch),
            json!([{
                "operation": "add",
                "field": "/address",
                "value": { "city": "Bristol", "postalCode": "BS1" }
            }])
        );
    }

    #[test]
    fn null_container_is_replaced_whole() {
        let patch = generate_patch_set(
            &json!({ "manager": { "_ref": "managed/user/2" } }),
            &json!({ "manager": null }),
        );
        assert_eq!(
            as_json(&patch),
            json!([{
                "operation": "replace",
                "field": "/manager",
                "value": { "_ref": "managed/user/2" }
            }])
        );
    }

    #[test]
    fn nested_leaf_is_replaced() {
        let patch = generate_patch_set(
            &json!({ "address": { "city": "Leeds", "postalCode": "BS1" } }),
            &json!({ "address": { "city": "Bristol", "postalCode": "BS1" } }),
        );
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "replace", "field": "/address/city", "value": "Leeds" }])
        );
    }

    #[test]
    fn removed_subtree_removes_first_missing_segment() {
        let patch = generate_patch_set(
            &json!({ "name": "x" }),
            &json!({ "name": "x", "address": { "city": "a", "postalCode": "b" } }),
        );
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "remove", "field": "/address" }])
        );
    }

    #[test]
    fn integer_and_float_forms_are_equal() {
        assert!(generate_patch_set(&json!({ "port": 8080.0 }), &json!({ "port": 8080 })).is_empty());
        assert!(generate_patch_set(&json!({ "a": [1.0, 2] }), &json!({ "a": [1, 2] })).is_empty());
        assert!(is_equal_set(&[json!(1)], &[json!(1.0)]));
    }

    #[test]
    fn null_value_removes_field() {
        let patch = generate_patch_set(&json!({ "a": null }), &json!({ "a": "x" }));
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "remove", "field": "/a" }])
        );
    }
}

mod array_changes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arrays_diff_as_sets() {
        let patch = generate_patch_set(&json!({ "a": [1, 2] }), &json!({ "a": [1, 3] }));
        assert_eq!(
            as_json(&patch),
            json!([
                { "operation": "add", "field": "/a/-", "value": 2 },
                { "operation": "remove", "field": "/a", "value": 3 }
            ])
        );
    }

    #[test]
    fn reordered_array_is_unchanged() {
        let patch = generate_patch_set(&json!({ "a": [3, 2, 1] }), &json!({ "a": [1, 2, 3] }));
        assert!(patch.is_empty());
    }

    #[test]
    fn nested_array_changes() {
        let patch = generate_patch_set(
            &json!({ "roles": { "effective": [{ "_ref": "r/1" }, { "_ref": "r/2" }] } }),
            &json!({ "roles": { "effective": [{ "_ref": "r/1" }] } }),
        );
        assert_eq!(
            as_json(&patch),
            json!([{
                "operation": "add",
                "field": "/roles/effective/-",
                "value": { "_ref": "r/2" }
            }])
        );
    }

    #[test]
    fn new_array_is_added_whole() {
        let patch = generate_patch_set(&json!({ "a": [1] }), &json!({}));
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "add", "field": "/a", "value": [1] }])
        );
    }

    #[test]
    fn array_replacing_scalar_is_replace() {
        let patch = generate_patch_set(&json!({ "a": [1] }), &json!({ "a": "one" }));
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "replace", "field": "/a", "value": [1] }])
        );
    }
}

mod deduplication {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sibling_leaves_collapse_into_one_container_add() {
        let patch = generate_patch_set(
            &json!({ "a": { "b": { "c": 1, "d": 2 } } }),
            &json!({ "a": { "x": 0 } }),
        );
        assert_eq!(
            as_json(&patch),
            json!([
                { "operation": "add", "field": "/a/b", "value": { "c": 1, "d": 2 } },
                { "operation": "remove", "field": "/a/x" }
            ])
        );
    }

    #[test]
    fn sibling_removals_collapse() {
        let patch = generate_patch_set(&json!({}), &json!({ "a": { "b": 1, "c": 2 } }));
        assert_eq!(
            as_json(&patch),
            json!([{ "operation": "remove", "field": "/a" }])
        );
    }
}
