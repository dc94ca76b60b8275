//! GraphQL [execution](https://spec.graphql.org/October2021/#sec-Execution)
//! based on callbacks resolving one field at a time.
//!
//! Start with [`Execution::new`],
//! then use builder-pattern methods to configure,
//! then call [`execute_sync`][Execution::execute_sync].
//! It takes an initial object value implementing the [`ObjectValue`] trait
//! that represents an instance of the root operation type (such as `Query`).
//! Trait methods are called as needed to resolve object fields,
//! which may in turn return more objects.

use crate::execution::engine::execute_selection_set;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::Propagate;
use crate::response::ErrorClassification;
use crate::response::GraphQLError;
use crate::response::Response;
use crate::response::ResponseData;
use crate::scalars::ScalarRegistry;
use crate::JsonMap;
use apollo_compiler::executable::Operation;
use apollo_compiler::executable::OperationType;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;
use std::fmt;

mod engine;
mod input_coercion;
mod resolver;
mod result_coercion;

pub use self::input_coercion::coerce_variable_values;
pub use self::resolver::ObjectValue;
pub use self::resolver::ResolveError;
pub use self::resolver::ResolveInfo;
pub use self::resolver::ResolvedValue;

/// Builder for configuring GraphQL execution
///
/// See [module-level documentation][self].
pub struct Execution<'a> {
    schema: &'a Valid<Schema>,
    document: &'a Valid<ExecutableDocument>,
    operation: Option<&'a Operation>,
    variable_values: Option<VariableValues<'a>>,
    scalars: Option<&'a ScalarRegistry>,
}

enum VariableValues<'a> {
    Raw(&'a JsonMap),
    Coerced(&'a CoercedVariables),
}

/// Variable values that went through [`coerce_variable_values`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedVariables(pub(crate) JsonMap);

/// A [request error](https://spec.graphql.org/October2021/#sec-Errors.Request-errors):
/// the request as a whole is faulty and execution does not start.
///
/// This results in a response without a `data` key,
/// unlike a null propagated to the root which gives `"data": null`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub(crate) message: String,
    pub(crate) location: Option<SourceSpan>,
    pub(crate) classification: ErrorClassification,
}

impl<'a> Execution<'a> {
    /// Create a new builder for configuring GraphQL execution
    ///
    /// See [module-level documentation][self].
    pub fn new(schema: &'a Valid<Schema>, document: &'a Valid<ExecutableDocument>) -> Self {
        Self {
            schema,
            document,
            operation: None,
            variable_values: None,
            scalars: None,
        }
    }

    /// Sets the operation to execute.
    ///
    /// Mutually exclusive with [`operation_name`][Self::operation_name].
    pub fn operation(mut self, operation: &'a Operation) -> Self {
        assert!(
            self.operation.is_none(),
            "operation to execute already provided"
        );
        self.operation = Some(operation);
        self
    }

    /// Sets the operation to execute.
    ///
    /// Mutually exclusive with [`operation`][Self::operation].
    ///
    /// If neither is called or if `None` is passed here,
    /// the document is expected to contain exactly one operation.
    pub fn operation_name(mut self, operation_name: Option<&str>) -> Result<Self, RequestError> {
        assert!(
            self.operation.is_none(),
            "operation to execute already provided"
        );
        self.operation = Some(get_operation(self.document, operation_name)?);
        Ok(self)
    }

    /// Provide values of the request’s variables,
    /// having already gone through [`coerce_variable_values`].
    ///
    /// Mutually exclusive with [`raw_variable_values`][Self::raw_variable_values].
    ///
    /// If neither is used, an empty map is assumed.
    pub fn coerced_variable_values(mut self, variable_values: &'a CoercedVariables) -> Self {
        assert!(
            self.variable_values.is_none(),
            "variable values already provided"
        );
        self.variable_values = Some(VariableValues::Coerced(variable_values));
        self
    }

    /// Provide values of the request’s variables.
    ///
    /// Mutually exclusive with [`coerced_variable_values`][Self::coerced_variable_values].
    ///
    /// If neither is used, an empty map is assumed.
    pub fn raw_variable_values(mut self, variable_values: &'a JsonMap) -> Self {
        assert!(
            self.variable_values.is_none(),
            "variable values already provided"
        );
        self.variable_values = Some(VariableValues::Raw(variable_values));
        self
    }

    /// Coercions for custom scalars.
    ///
    /// If not provided, custom scalar values pass through unchanged.
    pub fn scalars(mut self, scalars: &'a ScalarRegistry) -> Self {
        assert!(self.scalars.is_none(), "scalars already provided");
        self.scalars = Some(scalars);
        self
    }

    /// Perform execution with synchronous resolvers
    pub fn execute_sync(&self, initial_value: &dyn ObjectValue) -> Result<Response, RequestError> {
        let operation = match self.operation {
            Some(operation) => operation,
            None => get_operation(self.document, None)?,
        };

        let object_type_name = operation.object_type();
        let Some(root_operation_object_type_def) = self.schema.get_object(object_type_name) else {
            return Err(RequestError {
                message: format!("Undefined root operation type {object_type_name}"),
                location: object_type_name.location(),
                classification: ErrorClassification::ValidationError,
            });
        };

        let empty_scalars;
        let scalars = match self.scalars {
            Some(scalars) => scalars,
            None => {
                empty_scalars = ScalarRegistry::new();
                &empty_scalars
            }
        };
        let coerced;
        let variable_values = match self.variable_values {
            None => {
                coerced = CoercedVariables::default();
                &coerced.0
            }
            Some(VariableValues::Raw(values)) => {
                coerced = coerce_variable_values(self.schema, operation, values, scalars)?;
                &coerced.0
            }
            Some(VariableValues::Coerced(values)) => &values.0,
        };

        let mut errors = Vec::new();
        let mut context = ExecutionContext {
            schema: self.schema,
            document: self.document,
            operation,
            variable_values,
            scalars,
            errors: &mut errors,
        };
        let mode = match operation.operation_type {
            OperationType::Query | OperationType::Subscription => ExecutionMode::Normal,
            OperationType::Mutation => ExecutionMode::Sequential,
        };
        let result = execute_selection_set(
            &mut context,
            None,
            mode,
            root_operation_object_type_def,
            initial_value,
            &operation.selection_set.selections,
        );
        let data = match result {
            Ok(map) => ResponseData::Object(map),
            Err(propagate) => {
                tracing::debug!(
                    aborted = propagate == Propagate::Abort,
                    errors = errors.len(),
                    "null reached the root of the response"
                );
                ResponseData::Null
            }
        };
        Ok(Response { errors, data })
    }
}

/// Select the operation to execute by name.
///
/// Without a name, the document must contain exactly one operation.
pub fn get_operation<'doc>(
    document: &'doc ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'doc Operation, RequestError> {
    if let Ok(operation) = document.operations.get(operation_name) {
        return Ok(&**operation);
    }
    let message = match operation_name {
        Some(name) => format!("Unknown operation named '{name}'."),
        None if document.operations.anonymous.is_none() && document.operations.named.is_empty() => {
            "The document contains no operation.".to_owned()
        }
        None => "Must provide operation name if query contains multiple operations.".to_owned(),
    };
    Err(RequestError::new(message))
}

impl CoercedVariables {
    pub fn as_map(&self) -> &JsonMap {
        &self.0
    }

    pub fn into_inner(self) -> JsonMap {
        self.0
    }
}

impl RequestError {
    /// A request error classified as `ValidationError`
    pub(crate) fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            location: None,
            classification: ErrorClassification::ValidationError,
        }
    }

    pub(crate) fn with_classification(mut self, classification: ErrorClassification) -> Self {
        self.classification = classification;
        self
    }

    /// Set the location, unless a more precise one is already known
    pub(crate) fn at(mut self, location: Option<SourceSpan>) -> Self {
        self.location = self.location.or(location);
        self
    }

    pub(crate) fn in_variable(mut self, name: &str) -> Self {
        self.message = format!("Variable '{name}' has an invalid value: {}", self.message);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<SourceSpan> {
        self.location
    }

    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }

    pub fn to_graphql_error(&self, sources: &SourceMap) -> GraphQLError {
        GraphQLError::new(&self.message, self.location, sources)
            .with_classification(self.classification)
    }
}
