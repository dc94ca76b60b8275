use crate::execute;
use crate::execute_pretty;
use crate::seeded;
use composers_graphql::serde_json_bytes::json;
use expect_test::expect;
use pretty_assertions::assert_eq;

const ALL_COMPOSERS: &str = include_str!("operations/queries/get-all-composers.graphql");
const MODERN_COMPOSERS: &str = include_str!("operations/queries/get-modern-composers.graphql");
const PERIOD_COMPOSERS: &str = include_str!("operations/queries/get-period-composers.graphql");
const COMPOSER_BY_ID: &str = include_str!("operations/queries/get-composer-by-id.graphql");
const COMPOSERS_COMPOSITIONS: &str =
    include_str!("operations/queries/get-composers-compositions.graphql");

fn last_names(document: &str) -> Vec<String> {
    let response = execute(&seeded(), document, json!(null));
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data().unwrap();
    data.get("composers")
        .and_then(|composers| composers.as_array())
        .unwrap()
        .iter()
        .map(|composer| composer["lastName"].as_str().unwrap().to_owned())
        .collect()
}

#[test]
fn all_composers_in_catalog_order() {
    let response = execute(&seeded(), ALL_COMPOSERS, json!(null));
    let composers = response.data().unwrap().get("composers").unwrap();
    let composers = composers.as_array().unwrap();
    let ids: Vec<_> = composers
        .iter()
        .map(|composer| composer["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert_eq!(
        composers[7],
        json!({"id": "8", "firstName": "John", "lastName": "Cage", "period": "POST_MODERN"})
    );
}

#[test]
fn modern_composers() {
    let response = execute_pretty(&seeded(), MODERN_COMPOSERS, json!(null));
    expect![[r#"
        {
          "data": {
            "composers": [
              {
                "firstName": "Maurice",
                "lastName": "Ravel",
                "period": "MODERN"
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn renaissance_and_baroque_composers() {
    let response = execute_pretty(&seeded(), PERIOD_COMPOSERS, json!(null));
    expect![[r#"
        {
          "data": {
            "renaissanceComposers": [
              {
                "firstName": "Giovanni",
                "lastName": "Palestrina",
                "period": "RENAISSANCE"
              }
            ],
            "baroqueComposers": [
              {
                "firstName": "Johann",
                "lastName": "Bach",
                "period": "BAROQUE"
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn composer_by_id() {
    let response = execute_pretty(&seeded(), COMPOSER_BY_ID, json!({"id": 1}));
    expect![[r#"
        {
          "data": {
            "composer": {
              "firstName": "Johann",
              "lastName": "Bach",
              "location": {
                "city": "Leipzig",
                "country": "Germany"
              }
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn composer_birthday() {
    let response = execute_pretty(
        &seeded(),
        COMPOSER_BY_ID,
        json!({"id": "1", "withBirthday": true}),
    );
    expect![[r#"
        {
          "data": {
            "composer": {
              "firstName": "Johann",
              "lastName": "Bach",
              "dateOfBirth": "1685-03-31",
              "location": {
                "city": "Leipzig",
                "country": "Germany"
              }
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn compositions_with_null_key() {
    let response = execute_pretty(
        &seeded(),
        COMPOSERS_COMPOSITIONS,
        json!({"lastName": "Cage"}),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "The field at path '/composers[0]/compositions[0]/key' was declared as a non null type, but the code involved in retrieving data has wrongly returned a null value.  The graphql specification requires that the parent field be set to null, or if that is non nullable that it bubble up null to its parent and so on. The non-nullable type is 'Key' within parent type 'Piece'",
              "path": [
                "composers",
                0,
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
            "composers": [
              {
                "firstName": "John",
                "lastName": "Cage",
                "compositions": [
                  null,
                  {
                    "__typename": "Piece",
                    "title": "Organ² / ASLSP",
                    "key": "Bb"
                  }
                ]
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn concerto_fragment() {
    let response = execute_pretty(
        &seeded(),
        COMPOSERS_COMPOSITIONS,
        json!({"lastName": "Rachmaninoff", "subtype": "Concerto"}),
    );
    expect![[r#"
        {
          "data": {
            "composers": [
              {
                "firstName": "Sergei",
                "lastName": "Rachmaninoff",
                "compositions": [
                  {
                    "__typename": "Concerto",
                    "title": "Piano Concerto No. 2",
                    "key": "Cm",
                    "soloInstrument": {
                      "name": "Piano",
                      "type": "KEYBOARD"
                    }
                  }
                ]
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn song_fragment() {
    let response = execute_pretty(
        &seeded(),
        COMPOSERS_COMPOSITIONS,
        json!({"lastName": "Schumann", "subtype": "Song"}),
    );
    expect![[r#"
        {
          "data": {
            "composers": [
              {
                "firstName": "Clara",
                "lastName": "Schumann",
                "compositions": [
                  {
                    "__typename": "Song",
                    "title": "Liebesfrühling",
                    "key": "C#",
                    "lyrics": "How often has spring returned\nFor the dead and desolate world!\nHow often was spring greeted on all sides\nBy happy songs in wood and field!\n\nHow often has spring returned!\nBut no spring burgeoned for me:\nThe songs of my heart are silent,\nFor spring can only be brought by you."
                  }
                ]
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn filters_by_location_and_instrument() {
    assert_eq!(
        last_names(r#"{ composers(country: "Austria") { lastName } }"#),
        ["Beethoven", "Mozart"]
    );
    assert_eq!(
        last_names(r#"{ composers(instrument: "Organ") { lastName } }"#),
        ["Bach", "Palestrina"]
    );
    assert_eq!(
        last_names(r#"{ composers(city: "Vienna", instrument: "Piano") { lastName } }"#),
        ["Beethoven"]
    );
    assert_eq!(
        last_names(r#"{ composers(period: ROMANTIC, country: "Russia") { lastName } }"#),
        ["Rachmaninoff"]
    );
}

#[test]
fn blank_filters_are_ignored() {
    assert_eq!(last_names(r#"{ composers(lastName: "") { lastName } }"#).len(), 8);
    assert_eq!(last_names(r#"{ composers(city: "  ") { lastName } }"#).len(), 8);
}

#[test]
fn compositions_filtered_by_key() {
    let response = execute_pretty(
        &seeded(),
        r#"{ composer(id: 3) { compositions(key: "Dm") { title } } }"#,
        json!(null),
    );
    expect![[r#"
        {
          "data": {
            "composer": {
              "compositions": [
                {
                  "title": "Requiem"
                }
              ]
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn skip_directive_with_literal() {
    let response = execute_pretty(
        &seeded(),
        "{ composer(id: 7) { lastName period @skip(if: true) } }",
        json!(null),
    );
    expect![[r#"
        {
          "data": {
            "composer": {
              "lastName": "Ravel"
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn typename_on_every_object() {
    let response = execute_pretty(
        &seeded(),
        "{ __typename composer(id: 2) { __typename primaryInstrument { __typename name } } }",
        json!(null),
    );
    expect![[r#"
        {
          "data": {
            "__typename": "Query",
            "composer": {
              "__typename": "Composer",
              "primaryInstrument": {
                "__typename": "Instrument",
                "name": "Piano"
              }
            }
          }
        }"#]]
    .assert_eq(&response);
}
