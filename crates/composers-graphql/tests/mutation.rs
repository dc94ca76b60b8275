use crate::execute;
use crate::execute_pretty;
use crate::seeded;
use composers_graphql::serde_json_bytes::json;
use composers_graphql::Catalog;
use composers_graphql::ComposerRepository;
use composers_graphql::ComposersService;
use expect_test::expect;
use unindent::unindent;

const ADD_COMPOSER: &str = include_str!("operations/mutations/add-composer.graphql");
const UPDATE_COMPOSER: &str = include_str!("operations/mutations/update-composer.graphql");
const ADD_COMPOSITIONS: &str = include_str!("operations/mutations/add-compositions.graphql");
const DELETE_COMPOSITION: &str = include_str!("operations/mutations/delete-composition.graphql");
const COMPOSER_BY_ID: &str = include_str!("operations/queries/get-composer-by-id.graphql");
const COMPOSERS_COMPOSITIONS: &str =
    include_str!("operations/queries/get-composers-compositions.graphql");

/// Each step observes the previous ones
#[test]
fn create_update_add_and_delete() {
    let service = seeded();

    let response = execute_pretty(&service, ADD_COMPOSER, json!(null));
    expect![[r#"
        {
          "data": {
            "createComposer": {
              "id": "9"
            }
          }
        }"#]]
    .assert_eq(&response);
    let response = execute_pretty(
        &service,
        COMPOSER_BY_ID,
        json!({"id": "9", "withBirthday": true}),
    );
    expect![[r#"
        {
          "data": {
            "composer": {
              "firstName": "Charles",
              "lastName": "Ives",
              "dateOfBirth": "1874-10-20",
              "location": {
                "city": "Danbury",
                "country": "United States"
              }
            }
          }
        }"#]]
    .assert_eq(&response);

    let response = execute_pretty(
        &service,
        UPDATE_COMPOSER,
        json!({
            "id": "9",
            "composer": {
                "lastName": "Ives",
                "dateOfBirth": "2021-11-04",
                "location": {"city": "New York", "country": "United States"}
            }
        }),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "You cannot change an existing date of birth.",
              "locations": [
                {
                  "line": 1,
                  "column": 46
                }
              ],
              "extensions": {
                "classification": "ValidationError"
              }
            }
          ],
          "data": {
            "updateComposer": {
              "id": "9"
            }
          }
        }"#]]
    .assert_eq(&response);
    let response = execute_pretty(
        &service,
        COMPOSER_BY_ID,
        json!({"id": "9", "withBirthday": true}),
    );
    expect![[r#"
        {
          "data": {
            "composer": {
              "firstName": "Charles",
              "lastName": "Ives",
              "dateOfBirth": "1874-10-20",
              "location": {
                "city": "New York",
                "country": "United States"
              }
            }
          }
        }"#]]
    .assert_eq(&response);

    let response = execute_pretty(
        &service,
        ADD_COMPOSITIONS,
        json!({
            "composerId": "9",
            "compositions": [
                {
                    "subtype": "Piece",
                    "title": "Central Park in the Dark",
                    "key": "A#m"
                },
                {
                    "subtype": "Concerto",
                    "title": "Emerson Concerto",
                    "key": "F",
                    "soloInstrument": {"name": "Piano", "type": "KEYBOARD"}
                }
            ]
        }),
    );
    expect![[r#"
        {
          "data": {
            "addCompositions": [
              {
                "__typename": "Piece",
                "title": "Central Park in the Dark"
              },
              {
                "__typename": "Concerto",
                "title": "Emerson Concerto"
              }
            ]
          }
        }"#]]
    .assert_eq(&response);
    let response = execute_pretty(&service, COMPOSERS_COMPOSITIONS, json!({"lastName": "Ives"}));
    expect![[r#"
        {
          "data": {
            "composers": [
              {
                "firstName": "Charles",
                "lastName": "Ives",
                "compositions": [
                  {
                    "__typename": "Piece",
                    "title": "Central Park in the Dark",
                    "key": "A#m"
                  },
                  {
                    "__typename": "Concerto",
                    "title": "Emerson Concerto",
                    "key": "F",
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

    let response = execute_pretty(
        &service,
        DELETE_COMPOSITION,
        json!({"composerId": "9", "title": "Emerson Concerto"}),
    );
    expect![[r#"
        {
          "data": {
            "deleteComposition": true
          }
        }"#]]
    .assert_eq(&response);
    let response = execute_pretty(&service, COMPOSERS_COMPOSITIONS, json!({"lastName": "Ives"}));
    expect![[r#"
        {
          "data": {
            "composers": [
              {
                "firstName": "Charles",
                "lastName": "Ives",
                "compositions": [
                  {
                    "__typename": "Piece",
                    "title": "Central Park in the Dark",
                    "key": "A#m"
                  }
                ]
              }
            ]
          }
        }"#]]
    .assert_eq(&response);

    // The soloist is the seed catalog's piano
    let pianos = service.into_catalog().instruments().filter(|i| i.name == "Piano").count();
    assert_eq!(pianos, 1);
}

#[test]
fn first_composer_of_an_empty_catalog() {
    let service = ComposersService::new(Catalog::default()).unwrap();
    let response = execute_pretty(&service, ADD_COMPOSER, json!(null));
    expect![[r#"
        {
          "data": {
            "createComposer": {
              "id": "1"
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn new_location_must_be_complete() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        r#"mutation { createComposer(composer: {lastName: "Satie", location: {city: "Paris"}}) { id } }"#,
        json!(null),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "A new location requires both a city and a country.",
              "locations": [
                {
                  "line": 1,
                  "column": 12
                }
              ],
              "path": [
                "createComposer"
              ],
              "extensions": {
                "classification": "ValidationError"
              }
            }
          ],
          "data": {
            "createComposer": null
          }
        }"#]]
    .assert_eq(&response);
    assert_eq!(service.with_catalog(|catalog| catalog.all_composers().len()), 8);
}

#[test]
fn partial_location_merges_into_the_existing_one() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        &unindent(
            r#"
            mutation {
              updateComposer(id: 7, composer: {location: {city: "Ciboure"}}) {
                location { city country }
              }
            }"#,
        ),
        json!(null),
    );
    expect![[r#"
        {
          "data": {
            "updateComposer": {
              "location": {
                "city": "Ciboure",
                "country": "France"
              }
            }
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn compositions_are_added_all_or_nothing() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        ADD_COMPOSITIONS,
        json!({
            "composerId": 4,
            "compositions": [
                {"subtype": "Piece", "title": "Romance", "key": "Ab"},
                {"subtype": "Song", "title": "Widmung", "key": "Ab"}
            ]
        }),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "The Song 'Widmung' requires lyrics.",
              "locations": [
                {
                  "line": 2,
                  "column": 3
                }
              ],
              "path": [
                "addCompositions"
              ],
              "extensions": {
                "classification": "ValidationError"
              }
            }
          ],
          "data": {
            "addCompositions": null
          }
        }"#]]
    .assert_eq(&response);
    let count = service.with_catalog(|catalog| catalog.composer(4).unwrap().compositions.len());
    assert_eq!(count, 2);
}

#[test]
fn unknown_subtype_is_rejected() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        ADD_COMPOSITIONS,
        json!({
            "composerId": "1",
            "compositions": {"subtype": "Sonata", "title": "Sonata in G"}
        }),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "Unknown composition subtype 'Sonata', expected one of Piece, Concerto, Song",
              "locations": [
                {
                  "line": 2,
                  "column": 3
                }
              ],
              "path": [
                "addCompositions"
              ],
              "extensions": {
                "classification": "ValidationError"
              }
            }
          ],
          "data": {
            "addCompositions": null
          }
        }"#]]
    .assert_eq(&response);
}

#[test]
fn deleting_a_missing_title_changes_nothing() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        DELETE_COMPOSITION,
        json!({"composerId": "2", "title": "Symphony No. 9"}),
    );
    expect![[r#"
        {
          "data": {
            "deleteComposition": false
          }
        }"#]]
    .assert_eq(&response);
    let count = service.with_catalog(|catalog| catalog.composer(2).unwrap().compositions.len());
    assert_eq!(count, 2);
}

#[test]
fn updating_an_unknown_composer_aborts() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        UPDATE_COMPOSER,
        json!({"id": "42", "composer": {"firstName": "Nobody"}}),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "No composer found with id '42'.",
              "locations": [
                {
                  "line": 2,
                  "column": 3
                }
              ],
              "path": [
                "updateComposer"
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
fn added_compositions_expose_their_variant_fields() {
    let service = seeded();
    let response = execute_pretty(
        &service,
        &unindent(
            r#"
            mutation AddVariants($compositions: [CompositionInput!]!) {
              addCompositions(composerId: 7, compositions: $compositions) {
                __typename
                title
                key
                ... on Concerto { soloInstrument { name } }
                ... on Song { lyrics }
              }
            }"#,
        ),
        json!({
            "compositions": [
                {"subtype": "Piece", "title": "Pavane", "key": "G"},
                {
                    "subtype": "Concerto",
                    "title": "Piano Concerto in G",
                    "key": "G",
                    "soloInstrument": {"name": "Piano", "type": "KEYBOARD"}
                },
                {
                    "subtype": "Song",
                    "title": "Shéhérazade",
                    "key": "Bbm",
                    "lyrics": "Asie, Asie, Asie"
                }
            ]
        }),
    );
    expect![[r#"
        {
          "data": {
            "addCompositions": [
              {
                "__typename": "Piece",
                "title": "Pavane",
                "key": "G"
              },
              {
                "__typename": "Concerto",
                "title": "Piano Concerto in G",
                "key": "G",
                "soloInstrument": {
                  "name": "Piano"
                }
              },
              {
                "__typename": "Song",
                "title": "Shéhérazade",
                "key": "Bbm",
                "lyrics": "Asie, Asie, Asie"
              }
            ]
          }
        }"#]]
    .assert_eq(&response);

    let response = execute(
        &service,
        r#"{ composer(id: 7) { compositions(subtype: "Song") { title ... on Song { lyrics } } } }"#,
        json!(null),
    );
    assert_eq!(
        response.data().unwrap().get("composer"),
        Some(&json!({"compositions": [{"title": "Shéhérazade", "lyrics": "Asie, Asie, Asie"}]}))
    );
    let count = service.with_catalog(|catalog| catalog.composer(7).unwrap().compositions.len());
    assert_eq!(count, 5);
}

#[test]
fn date_of_birth_conflict_in_a_literal() {
    let response = execute_pretty(
        &seeded(),
        r#"mutation { updateComposer(id: 1, composer: {dateOfBirth: "2000-01-01"}) { id } }"#,
        json!(null),
    );
    expect![[r#"
        {
          "errors": [
            {
              "message": "You cannot change an existing date of birth.",
              "locations": [
                {
                  "line": 1,
                  "column": 44
                }
              ],
              "extensions": {
                "classification": "ValidationError"
              }
            }
          ],
          "data": {
            "updateComposer": {
              "id": "1"
            }
          }
        }"#]]
    .assert_eq(&response);
}
