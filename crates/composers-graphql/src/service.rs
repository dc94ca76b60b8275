//! Handling of whole GraphQL requests: parsing, validation, operation selection and execution.
//!
//! Every failure becomes part of the returned [`Response`].

use crate::catalog::Catalog;
use crate::catalog::ComposerRepository;
use crate::execution::get_operation;
use crate::execution::Execution;
use crate::execution::RequestError;
use crate::resolvers::MutationRoot;
use crate::resolvers::QueryRoot;
use crate::response::ErrorClassification;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::response::Response;
use crate::scalars::ScalarRegistry;
use crate::schema::composers_schema;
use crate::schema::SchemaError;
use crate::JsonMap;
use apollo_compiler::ast;
use apollo_compiler::executable::OperationType;
use apollo_compiler::validation::DiagnosticList;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;
use parking_lot::Mutex;
use serde::Deserialize;
use serde::Serialize;

/// A [GraphQL request](https://spec.graphql.org/October2021/#sec-Execution) envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "JsonMap::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub variables: JsonMap,
}

/// Clients send `"variables": null` for "no variables"
fn deserialize_null_default<'de, D, T: Default + Deserialize<'de>>(
    deserializer: D,
) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <Option<T>>::deserialize(deserializer).map(|x| x.unwrap_or_default())
}

/// Executes requests against the composers schema over one catalog.
///
/// Mutations write through to the catalog, so later requests observe them.
pub struct ComposersService<R = Catalog> {
    schema: Valid<Schema>,
    scalars: ScalarRegistry,
    catalog: Mutex<R>,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn variables(mut self, variables: JsonMap) -> Self {
        self.variables = variables;
        self
    }
}

impl ComposersService<Catalog> {
    /// A service over the eight seed composers
    pub fn seeded() -> Result<Self, SchemaError> {
        Self::new(Catalog::seeded())
    }
}

impl<R: ComposerRepository> ComposersService<R> {
    pub fn new(catalog: R) -> Result<Self, SchemaError> {
        Ok(Self {
            schema: composers_schema()?,
            scalars: ScalarRegistry::composers(),
            catalog: Mutex::new(catalog),
        })
    }

    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    /// Read the catalog, for example to inspect the effect of mutations
    pub fn with_catalog<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.catalog.lock())
    }

    pub fn into_catalog(self) -> R {
        self.catalog.into_inner()
    }

    /// Execute one request.
    ///
    /// Request errors produce a response without `data`.
    pub fn execute(&self, request: &Request) -> Response {
        tracing::debug!(
            operation_name = request.operation_name.as_deref(),
            variables = request.variables.len(),
            "executing request"
        );
        match self.try_execute(request) {
            Ok(response) => {
                if !response.errors.is_empty() {
                    tracing::debug!(errors = response.errors.len(), "partial response");
                }
                response
            }
            Err(errors) => {
                for error in &errors {
                    tracing::warn!(
                        classification = error.classification(),
                        "request error: {}",
                        error.message
                    );
                }
                Response::from_request_errors(errors)
            }
        }
    }

    fn try_execute(&self, request: &Request) -> Result<Response, Vec<GraphQLError>> {
        let document = self.parse_and_validate(&request.query)?;
        let request_error = |err: RequestError| {
            vec![err.to_graphql_error(&document.sources)]
        };
        let operation =
            get_operation(&document, request.operation_name.as_deref()).map_err(request_error)?;
        let execution = Execution::new(&self.schema, &document)
            .operation(operation)
            .raw_variable_values(&request.variables)
            .scalars(&self.scalars);
        let catalog = &self.catalog;
        let result = match operation.operation_type {
            OperationType::Mutation => execution.execute_sync(&MutationRoot { catalog }),
            OperationType::Query | OperationType::Subscription => {
                execution.execute_sync(&QueryRoot { catalog })
            }
        };
        result.map_err(request_error)
    }

    fn parse_and_validate(
        &self,
        query: &str,
    ) -> Result<Valid<ExecutableDocument>, Vec<GraphQLError>> {
        let document = ast::Document::parse(query, "request.graphql").map_err(|with_errors| {
            diagnostics_to_errors(&with_errors.errors, ErrorClassification::InvalidSyntax)
        })?;
        document
            .to_executable_validate(&self.schema)
            .map_err(|with_errors| {
                diagnostics_to_errors(&with_errors.errors, ErrorClassification::ValidationError)
            })
    }
}

fn diagnostics_to_errors(
    diagnostics: &DiagnosticList,
    classification: ErrorClassification,
) -> Vec<GraphQLError> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            GraphQLError {
                message: diagnostic.error.to_string(),
                locations: diagnostic
                    .line_column_range()
                    .map(|range| GraphQLLocation {
                        line: range.start.line,
                        column: range.start.column,
                    })
                    .into_iter()
                    .collect(),
                path: Vec::new(),
                extensions: Default::default(),
            }
            .with_classification(classification)
        })
        .collect()
}
