//! Update integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use docstack_model::{DocumentErrorCode, Value};

    use crate::{seeded_collection, val};

    fn sam() -> Vec<serde_json::Value> {
        vec![json!({"_id": "2", "name": "Sam", "age": 40, "city": "NY", "interests": ["Coding", "Bike"]})]
    }

    #[test]
    fn test_should_increment_and_delete_fields() {
        let c = seeded_collection("inc", sam());
        c.update("2", &val(json!({"age": {"$inc": -10}, "city": {"$delete": true}})))
            .unwrap();
        assert_eq!(
            Value::from(c.find_by_id("2").unwrap()),
            val(json!({"_id": "2", "name": "Sam", "age": 30, "interests": ["Coding", "Bike"]}))
        );
    }

    #[test]
    fn test_should_append_and_set_fields() {
        let c = seeded_collection("append", sam());
        c.update(
            "2",
            &val(json!({"interests": {"$append": ["Cars", "Motobike"]}, "role": {"$set": "admin"}})),
        )
        .unwrap();
        assert_eq!(
            Value::from(c.find_by_id("2").unwrap()),
            val(json!({
                "_id": "2",
                "name": "Sam",
                "age": 40,
                "city": "NY",
                "interests": ["Coding", "Bike", "Cars", "Motobike"],
                "role": "admin"
            }))
        );
    }

    #[test]
    fn test_should_append_strings_and_replace_types() {
        let c = seeded_collection("strings", sam());
        let updated = c
            .update("2", &val(json!({"name": {"$append": " Joe"}, "age": {"$setOrReplace": "20"}})))
            .unwrap();
        assert_eq!(updated.get("name"), Some(&Value::from("Sam Joe")));
        assert_eq!(updated.get("age"), Some(&Value::from("20")));
    }

    #[test]
    fn test_should_treat_set_and_set_or_replace_as_aliases() {
        let a = seeded_collection("set", sam());
        let b = seeded_collection("set-or-replace", sam());
        let via_set = a.update("2", &val(json!({"city": {"$set": "LA"}}))).unwrap();
        let via_replace = b.update("2", &val(json!({"city": {"$setOrReplace": "LA"}}))).unwrap();
        assert_eq!(via_set, via_replace);
    }

    #[test]
    fn test_should_reject_id_mutation() {
        let c = seeded_collection("id", sam());
        let before = c.find_by_id("2").unwrap();
        let err = c.update("2", &val(json!({"_id": {"$inc": 2}}))).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::UnsupportedMutationKeyError);
        assert_eq!(c.find_by_id("2").unwrap(), before);
    }

    #[test]
    fn test_should_not_partially_apply_failed_mutation() {
        let c = seeded_collection("atomic", sam());
        let before = c.find_by_id("2").unwrap();
        let err = c
            .update("2", &val(json!({"age": {"$inc": 5}, "role": {"$set": "x"}, "name": {"$inc": 1}})))
            .unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::MutationTypeError);
        let err = c.update("2", &val(json!({"age": {"$append": [1]}}))).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::MutationTypeError);
        assert_eq!(c.find_by_id("2").unwrap(), before);
    }

    #[test]
    fn test_should_reject_unknown_mutation_operator() {
        let c = seeded_collection("unknown", sam());
        let err = c.update("2", &val(json!({"age": {"$mul": 2}}))).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::ParseError);
        let err = c.update("404", &val(json!({"age": {"$inc": 1}}))).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::NotFound);
    }

    #[test]
    fn test_should_never_merge_concurrent_updates() {
        let c = Arc::new(seeded_collection("concurrent", vec![json!({"_id": "c", "n": 0, "log": []})]));
        std::thread::scope(|s| {
            for worker in 0..4 {
                let c = Arc::clone(&c);
                s.spawn(move || {
                    for _ in 0..50 {
                        c.update(
                            "c",
                            &val(json!({"n": {"$inc": 1}, "log": {"$append": worker}})),
                        )
                        .unwrap();
                    }
                });
            }
        });
        let d = c.find_by_id("c").unwrap();
        assert_eq!(d.get("n"), Some(&Value::Number(200.0)));
        assert_eq!(d.get("log").and_then(Value::as_list).map(<[Value]>::len), Some(200));
    }
}
