//! Find integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use docstack_model::{DocumentErrorCode, Value};

    use crate::{empty_collection, ids, people, seeded_collection, val};

    #[test]
    fn test_should_find_by_explicit_equality() {
        let c = seeded_collection("eq", people());
        let found = c.find(Some(&val(json!({"name": {"$eq": "John"}}))), None).unwrap();
        assert_eq!(
            found.into_iter().map(Value::from).collect::<Vec<_>>(),
            vec![val(json!({"_id": "1", "name": "John", "age": 34, "city": "Denver"}))]
        );
    }

    #[test]
    fn test_should_find_with_field_or() {
        let c = seeded_collection("or", people());
        let found = c
            .find(Some(&val(json!({"age": {"$or": [{"$eq": 40}, {"$eq": 34}]}}))), None)
            .unwrap();
        assert_eq!(ids(&found), vec!["1", "2"]);
    }

    #[test]
    fn test_should_find_with_or_of_ranges() {
        let c = seeded_collection("ranges", people());
        let condition = val(json!({"age": {"$or": [
            {"$and": {"$ge": 39, "$lt": 41}},
            {"$and": {"$ge": 20, "$lt": 22}}
        ]}}));
        let found = c.find(Some(&condition), None).unwrap();
        assert_eq!(ids(&found), vec!["2", "3"]);
    }

    #[test]
    fn test_should_find_with_literal_and_array_conditions() {
        let c = seeded_collection("literal", people());
        let found = c.find(Some(&val(json!({"name": "Sam"}))), None).unwrap();
        assert_eq!(ids(&found), vec!["2", "3"]);

        let found = c
            .find(Some(&val(json!([{"name": "John"}, {"age": 40}]))), None)
            .unwrap();
        assert_eq!(ids(&found), vec!["1", "2"]);

        let found = c
            .find(Some(&val(json!({"name": "Sam", "city": "LA"}))), None)
            .unwrap();
        assert_eq!(ids(&found), vec!["3"]);
    }

    #[test]
    fn test_should_select_same_set_for_array_or_and_field_or() {
        let c = seeded_collection("duality", people());
        let by_array = c
            .find(Some(&val(json!([{"age": 21}, {"age": 34}]))), None)
            .unwrap();
        let by_field = c
            .find(Some(&val(json!({"age": {"$or": [{"$eq": 21}, {"$eq": 34}]}}))), None)
            .unwrap();
        assert_eq!(by_array, by_field);
        assert_eq!(ids(&by_array), vec!["1", "3"]);
    }

    #[test]
    fn test_should_honor_vacuous_conditions() {
        let c = seeded_collection("vacuous", people());
        assert_eq!(c.find(Some(&val(json!({}))), None).unwrap().len(), 3);
        assert!(c.find(Some(&val(json!([]))), None).unwrap().is_empty());
    }

    #[test]
    fn test_should_project_requested_fields() {
        let c = seeded_collection("project", people());
        let fields = vec!["name".to_owned(), "nickname".to_owned()];
        let found = c.find(None, Some(fields.as_slice())).unwrap();
        assert_eq!(found.len(), 3);
        for d in &found {
            assert_eq!(d.len(), 2);
            assert!(d.contains("_id"));
            assert!(d.contains("name"));
        }

        let found = c
            .find(Some(&val(json!({"age": {"$lt": 35}}))), Some(&["city".to_owned()][..]))
            .unwrap();
        assert_eq!(
            found.into_iter().map(Value::from).collect::<Vec<_>>(),
            vec![
                val(json!({"_id": "1", "city": "Denver"})),
                val(json!({"_id": "3", "city": "LA"})),
            ]
        );
    }

    #[test]
    fn test_should_exclude_documents_on_type_mismatch() {
        let c = seeded_collection(
            "mismatch",
            vec![
                json!({"_id": "1", "age": 30}),
                json!({"_id": "2", "age": "30"}),
                json!({"_id": "3"}),
            ],
        );
        let found = c.find(Some(&val(json!({"age": {"$ge": 18}}))), None).unwrap();
        assert_eq!(ids(&found), vec!["1"]);
    }

    #[test]
    fn test_should_match_missing_field_as_null() {
        let c = seeded_collection(
            "null",
            vec![json!({"_id": "1", "nick": null}), json!({"_id": "2"}), json!({"_id": "3", "nick": "x"})],
        );
        let found = c.find(Some(&val(json!({"nick": null}))), None).unwrap();
        assert_eq!(ids(&found), vec!["1", "2"]);
    }

    #[test]
    fn test_should_reject_malformed_conditions() {
        let c = empty_collection("malformed");
        for condition in [
            json!({"age": {"$gte": 1}}),
            json!({"age": {"$ge": 1, "$le": 5}}),
            json!({"age": {"$or": {"$eq": 1}}}),
            json!("age"),
        ] {
            let err = c.find(Some(&val(condition)), None).unwrap_err();
            assert_eq!(err.code, DocumentErrorCode::ParseError);
        }
    }

    #[test]
    fn test_should_reject_empty_field_test_instead_of_matching_empty_objects() {
        let c = seeded_collection(
            "empty-test",
            vec![json!({"_id": "1", "a": {}}), json!({"_id": "2", "a": 1})],
        );
        let err = c.find(Some(&val(json!({"a": {}}))), None).unwrap_err();
        assert_eq!(err.code, DocumentErrorCode::ParseError);

        let found = c.find(Some(&val(json!({"a": {"$eq": {}}}))), None).unwrap();
        assert_eq!(ids(&found), vec!["1"]);
    }
}
