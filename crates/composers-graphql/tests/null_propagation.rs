use crate::execute;
use crate::execute_pretty;
use crate::seeded;
use composers_graphql::serde_json_bytes::json;
use composers_graphql::ComposerRepository;
use composers_graphql::ResponseData;
use expect_test::expect;
use unindent::unindent;

#[test]
fn siblings_survive_a_null_item() {
    let response = execute_pretty(
        &seeded(),
        "{ composer(id: 8) { lastName compositions { title key } } }",
        json!(null),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "The field at path '/composer/compositions[0]/key' was declared as a non null type, but the code involved in retrieving data has wrongly returned a null value.  The graphql specification requires that the parent field be set to null, or if that is non nullable that it bubble up null to its parent and so on. The non-nullable type is 'Key' within parent type 'Piece'",
              "path": [
                "composer",
                "compositions",
                0,
                "key"
              ],
              "extensions": {
                "classification": "NullValueInNonNullableField"
              }
            }
          ],
          "data": {
            "composer": {
              "lastName": "Cage",
              "compositions": [
                null,
                {
                  "title": "Organ² / ASLSP",
                  "key": "Bb"
                }
              ]
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn aliases_name_the_path() {
    let response = execute(
        &seeded(),
        "{ cage: composer(id: 8) { works: compositions { tonality: key } } }",
        json!(null),
    );
    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert_eq!(
        serde_json::to_value(&error.path).unwrap(),
        serde_json::json!(["cage", "works", 0, "tonality"])
    );
    assert!(error
        .message
        .starts_with("The field at path '/cage/works[0]/tonality' was declared as a non null type"));
    assert_eq!(
        response.data().unwrap().get("cage"),
        Some(&json!({"works": [null, {"tonality": "Bb"}]}))
    );
}

#[test]
fn only_the_broken_item_is_lost() {
    let response = execute(
        &seeded(),
        "{ composers { compositions { key } } }",
        json!(null),
    );
    assert_eq!(response.errors.len(), 1);
    let composers = response.data().unwrap().get("composers").unwrap();
    assert_eq!(composers.as_array().unwrap().len(), 8);
    assert_eq!(composers[7], json!({"compositions": [null, {"key": "Bb"}]}));
    assert_eq!(composers[0]["compositions"][0], json!({"key": "Dm"}));
}

#[test]
fn missing_composer_nulls_the_whole_response() {
    let response = execute_pretty(
        &seeded(),
        "{ composer(id: 42) { lastName } composers(period: MODERN) { lastName } }",
        json!(null),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "No composer found with id '42'.",
              "locations": [
                {
                  "line": 1,
                  "column": 3
                }
              ],
              "path": [
                "composer"
              ],
              "extensions": {
                "classification": "DataFetchingException"
              }
            }
          ],
          "data": null
        }"#]]
    .assert_eq(&response);
}

#[test]
fn non_numeric_id_is_not_found() {
    let response = execute(&seeded(), r#"{ composer(id: "bach") { lastName } }"#, json!(null));
    assert_eq!(response.data, ResponseData::Null);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "No composer found with id 'bach'.");
    assert_eq!(
        response.errors[0].classification(),
        Some("DataFetchingException")
    );
}

#[test]
fn aborting_skips_later_fields() {
    let service = seeded();
    let response = execute(
        &service,
        &unindent(
            r#"
            mutation {
              deleteComposition(composerId: 42, title: "Bolero")
              other: deleteComposition(composerId: 7, title: "Bolero")
            }"#,
        ),
        json!(null),
    );
    assert_eq!(response.data, ResponseData::Null);
    assert_eq!(response.errors.len(), 1);
    let count = service.with_catalog(|catalog| catalog.composer(7).unwrap().compositions.len());
    assert_eq!(count, 2);
}
