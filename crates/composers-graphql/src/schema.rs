//! The composers GraphQL schema

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;

/// Schema definition language source of the composers schema
pub const SDL: &str = include_str!("schema.graphql");

/// The embedded schema failed to parse or validate
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid composers schema: {0}")]
pub struct SchemaError(String);

/// Parse and validate [`SDL`]
pub fn composers_schema() -> Result<Valid<Schema>, SchemaError> {
    Schema::parse_and_validate(SDL, "schema.graphql").map_err(|err| SchemaError(err.to_string()))
}
