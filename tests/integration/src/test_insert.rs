//! Insert and delete integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use docstack_model::{Document, DocumentErrorCode, Value};

    use crate::{doc, empty_collection, ids, people, seeded_collection, val};

    #[test]
    fn test_should_round_trip_nested_documents() {
        let c = empty_collection("nested");
        let nested = json!({
            "_id": "n1",
            "profile": {"name": "Ann", "address": {"city": "Oslo", "zip": "0150"}},
            "scores": [1, 2.5, -3],
            "mixed": [null, true, "s", [1, [2]], {"k": "v"}],
            "empty": {}
        });
        c.insert(doc(nested.clone())).unwrap();
        assert_eq!(Value::from(c.find_by_id("n1").unwrap()), val(nested));
    }

    #[test]
    fn test_should_match_nested_object_literal() {
        let c = empty_collection("nested-literal");
        c.insert(doc(json!({"_id": "a", "address": {"city": "NY", "zip": "10001"}})))
            .unwrap();
        let found = c
            .find(Some(&val(json!({"address": {"zip": "10001", "city": "NY"}}))), None)
            .unwrap();
        assert_eq!(ids(&found), vec!["a"]);
        let found = c.find(Some(&val(json!({"address": {"city": "NY"}}))), None).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_should_reject_duplicate_and_missing_ids() {
        let c = seeded_collection("dups", people());
        let err = c.insert(doc(json!({"_id": "2", "name": "Other"}))).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::DuplicateIdError);
        assert_eq!(c.find_by_id("2").unwrap().get("name"), Some(&Value::from("Sam")));

        let err = Document::try_from(json!({"name": "NoId"})).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::MissingIdError);
    }

    #[test]
    fn test_should_write_nothing_when_batch_is_invalid() {
        let c = empty_collection("batch");
        let err = c
            .insert_all(vec![
                doc(json!({"_id": "a"})),
                doc(json!({"_id": "b"})),
                doc(json!({"_id": "a"})),
            ])
            .unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::DuplicateIdError);
        assert!(c.is_empty());
    }

    #[test]
    fn test_should_keep_insertion_order() {
        let c = empty_collection("order");
        for id in ["b", "10", "a", "2"] {
            c.insert(Document::new(id)).unwrap();
        }
        assert_eq!(ids(&c.find(None, None).unwrap()), vec!["b", "10", "a", "2"]);
    }

    #[test]
    fn test_should_delete_documents() {
        let c = seeded_collection("delete", people());
        c.delete("1").unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.find_by_id("1").unwrap_err().code, DocumentErrorCode::NotFound);
        assert_eq!(c.delete("1").unwrap_err().code, DocumentErrorCode::NotFound);
        c.insert(doc(json!({"_id": "1", "name": "Back"}))).unwrap();
        assert_eq!(ids(&c.find(None, None).unwrap()), vec!["2", "3", "1"]);
    }
}
