use crate::response::ErrorClassification;
use crate::response::GraphQLError;
use crate::scalars::CoercionError;
use crate::JsonMap;
use crate::JsonValue;
use apollo_compiler::ast::Value;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Operation;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;
use std::cell::RefCell;

/// A concrete GraphQL object whose fields can be resolved during execution.
pub trait ObjectValue {
    /// Returns the name of the concrete object type this resolver represents
    ///
    /// That name expected to be that of an object type defined in the schema.
    /// This is called when the schema indicates an abstract (interface or union) type.
    fn type_name(&self) -> &str;

    /// Resolves a concrete field of this object
    ///
    /// The resolved value is expected to match the type of the corresponding field definition
    /// in the schema.
    ///
    /// This is _not_ called for [introspection](https://spec.graphql.org/draft/#sec-Introspection)
    /// meta-fields `__typename`, `__type`, or `__schema`: those are handled separately.
    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError>;
}

/// What a resolver knows about the field being resolved
pub struct ResolveInfo<'a> {
    pub(crate) schema: &'a Valid<Schema>,
    pub(crate) document: &'a Valid<ExecutableDocument>,
    pub(crate) operation: &'a Operation,
    pub(crate) field: &'a Field,
    pub(crate) arguments: &'a JsonMap,
    pub(crate) errors: RefCell<Vec<GraphQLError>>,
}

/// A resolver failure, reported as a field error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ResolveError {
    pub message: String,
    pub classification: ErrorClassification,
    /// Abort the whole operation: `data` becomes null
    pub fatal: bool,
}

/// The value of a resolved field
pub enum ResolvedValue<'a> {
    /// * JSON null represents GraphQL null
    /// * A GraphQL enum value is represented as a JSON string
    /// * GraphQL built-in scalars are coerced according to their respective *Result Coercion* spec
    /// * Custom scalars go through their registered [`ScalarCoercion`][crate::scalars::ScalarCoercion]
    Leaf(JsonValue),

    /// Expected where the GraphQL type is an object, interface, or union type
    Object(Box<dyn ObjectValue + 'a>),

    /// Expected for GraphQL list types
    List(Box<dyn Iterator<Item = Result<ResolvedValue<'a>, ResolveError>> + 'a>),
}

impl<'a> ResolveInfo<'a> {
    pub fn schema(&self) -> &'a Valid<Schema> {
        self.schema
    }

    pub fn field_name(&self) -> &'a str {
        self.field.name.as_str()
    }

    /// Coerced argument values. Omitted arguments without a default are absent.
    pub fn arguments(&self) -> &'a JsonMap {
        self.arguments
    }

    /// A present and non-null argument
    pub fn argument(&self, name: &str) -> Option<&'a JsonValue> {
        self.arguments.get(name).filter(|value| !value.is_null())
    }

    /// Where the value of an argument comes from.
    ///
    /// For a variable this is the declared type of its definition in the operation,
    /// otherwise the literal in the field's argument list.
    pub fn argument_source(&self, argument_name: &str) -> Option<SourceSpan> {
        let argument = self
            .field
            .arguments
            .iter()
            .find(|argument| argument.name.as_str() == argument_name)?;
        match argument.value.as_ref() {
            Value::Variable(variable) => self
                .operation
                .variables
                .iter()
                .find(|definition| definition.name == *variable)?
                .ty
                .location(),
            _ => argument.value.location(),
        }
    }

    /// Report an error next to the value this resolver returns.
    /// It has no path, only the given location.
    pub fn report(
        &self,
        message: impl Into<String>,
        classification: ErrorClassification,
        location: Option<SourceSpan>,
    ) {
        let error = GraphQLError::new(message, location, &self.document.sources)
            .with_classification(classification);
        self.errors.borrow_mut().push(error);
    }

    pub(crate) fn take_errors(&self) -> Vec<GraphQLError> {
        self.errors.take()
    }
}

impl ResolveError {
    /// A field error classified as `DataFetchingException`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            classification: ErrorClassification::DataFetchingException,
            fatal: false,
        }
    }

    /// An error that aborts the operation
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            fatal: true,
            ..Self::new(message)
        }
    }

    pub fn with_classification(mut self, classification: ErrorClassification) -> Self {
        self.classification = classification;
        self
    }

    pub fn unknown_field(field_name: &str, object: &dyn ObjectValue) -> Self {
        Self::new(format!(
            "unexpected field name: {field_name} in type {}",
            object.type_name()
        ))
    }
}

impl From<CoercionError> for ResolveError {
    fn from(error: CoercionError) -> Self {
        Self::new(error.message()).with_classification(ErrorClassification::CoercionError)
    }
}

impl<'a> ResolvedValue<'a> {
    /// Construct a null leaf resolved value
    pub fn null() -> Self {
        Self::Leaf(JsonValue::Null)
    }

    /// Construct a leaf resolved value from something that is convertible to JSON
    pub fn leaf(json: impl Into<JsonValue>) -> Self {
        Self::Leaf(json.into())
    }

    /// Construct a leaf resolved value or null
    pub fn opt_leaf(json: Option<impl Into<JsonValue>>) -> Self {
        match json {
            Some(json) => Self::leaf(json),
            None => Self::null(),
        }
    }

    /// Construct an object resolved value
    pub fn object(resolver: impl ObjectValue + 'a) -> Self {
        Self::Object(Box::new(resolver))
    }

    /// Construct an object resolved value or null
    pub fn opt_object(opt_resolver: Option<impl ObjectValue + 'a>) -> Self {
        match opt_resolver {
            Some(resolver) => Self::Object(Box::new(resolver)),
            None => Self::null(),
        }
    }

    /// Construct a list resolved value from an iterator
    ///
    /// If errors can happen during iteration,
    /// construct the [`ResolvedValue::List`] enum variant directly instead.
    pub fn list<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        I::IntoIter: 'a,
    {
        Self::List(Box::new(iter.into_iter().map(Ok)))
    }
}
