mod mutation;
mod null_propagation;
mod query;

use composers_graphql::ComposersService;
use composers_graphql::JsonValue;
use composers_graphql::Request;
use composers_graphql::Response;

/// Execute a document with variables given as a JSON object
fn execute(service: &ComposersService, document: &str, variables: JsonValue) -> Response {
    let variables = match variables {
        JsonValue::Object(map) => map,
        JsonValue::Null => Default::default(),
        other => panic!("variables must be an object, got {other}"),
    };
    service.execute(&Request::new(document).variables(variables))
}

/// Same as [`execute`], pretty-printed for snapshots
fn execute_pretty(service: &ComposersService, document: &str, variables: JsonValue) -> String {
    serde_json::to_string_pretty(&execute(service, document, variables)).unwrap()
}

fn seeded() -> ComposersService {
    ComposersService::seeded().unwrap()
}
