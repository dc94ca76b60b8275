//! The [GraphQL response](https://spec.graphql.org/October2021/#sec-Response-Format)
//! returned for every request, successful or not.

use crate::JsonMap;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::Name;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// A [GraphQL response](https://spec.graphql.org/October2021/#sec-Response-Format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    // <https://spec.graphql.org/October2021/#note-6f005> suggests serializing this first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "ResponseData::is_absent")]
    #[serde(default = "ResponseData::absent")]
    pub data: ResponseData,
}

/// The `data` entry of a [`Response`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Option<JsonMap>")]
pub enum ResponseData {
    /// Execution returned an object.
    Object(JsonMap),

    /// Null was [propagated] all the way to the root of the response,
    /// or a resolver failure aborted the operation.
    ///
    /// [propagated]: https://spec.graphql.org/October2021/#sec-Handling-Field-Errors
    Null,

    /// A [request error] was encountered. Execution did not start.
    /// [`Response::data`] is skipped from serialization.
    ///
    /// [request error]: https://spec.graphql.org/October2021/#sec-Errors.Request-errors
    Absent,
}

/// A serializable [error](https://spec.graphql.org/October2021/#sec-Errors.Error-result-format),
/// as found in a GraphQL [response][Response].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations in relevant to the error, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<GraphQLLocation>,

    /// If non-empty, the error is a [field error]
    /// for the particular field found at this path in [`Response::data`].
    ///
    /// [field error]: https://spec.graphql.org/October2021/#sec-Errors.Field-errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub path: Vec<PathElement>,

    /// Holds the `classification` entry
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// A source location (line and column numbers) for a [`GraphQLError`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLLocation {
    /// The line number for this location, starting at 1 for the first line.
    pub line: usize,
    /// The column number for this location, starting at 1 and counting characters.
    pub column: usize,
}

/// An element of [`GraphQLError::path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// The relevant key in an object value
    Field(Name),

    /// The index of the relevant item in a list value
    ListIndex(usize),
}

/// The kind of failure an error reports, serialized as `extensions.classification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClassification {
    /// The document could not be parsed.
    InvalidSyntax,
    /// The document is invalid against the schema,
    /// the request could not be prepared,
    /// or a mutation argument broke a catalog rule.
    ValidationError,
    /// A custom scalar rejected an input or output value.
    CoercionError,
    /// A non-null field resolved to null.
    NullValueInNonNullableField,
    /// A resolver failed.
    DataFetchingException,
}

impl ErrorClassification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSyntax => "InvalidSyntax",
            Self::ValidationError => "ValidationError",
            Self::CoercionError => "CoercionError",
            Self::NullValueInNonNullableField => "NullValueInNonNullableField",
            Self::DataFetchingException => "DataFetchingException",
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Response {
    /// Create a response for a [request error]:
    /// handling of a request was aborted before execution started.
    ///
    /// [request error]: https://spec.graphql.org/October2021/#sec-Errors.Request-errors
    pub fn from_request_error(error: GraphQLError) -> Self {
        Self::from_request_errors(vec![error])
    }

    pub fn from_request_errors(errors: Vec<GraphQLError>) -> Self {
        Self {
            errors,
            data: ResponseData::Absent,
        }
    }

    /// Returns the `data` object, if execution produced one
    pub fn data(&self) -> Option<&JsonMap> {
        match &self.data {
            ResponseData::Object(map) => Some(map),
            ResponseData::Null | ResponseData::Absent => None,
        }
    }
}

impl GraphQLError {
    pub fn new(
        message: impl Into<String>,
        location: Option<SourceSpan>,
        sources: &SourceMap,
    ) -> Self {
        Self {
            message: message.into(),
            locations: GraphQLLocation::from_span(sources, location)
                .into_iter()
                .collect(),
            path: Vec::new(),
            extensions: JsonMap::new(),
        }
    }

    /// Set the `classification` extension
    pub fn with_classification(mut self, classification: ErrorClassification) -> Self {
        self.extensions
            .insert("classification", classification.as_str().into());
        self
    }

    /// The `classification` extension, if any
    pub fn classification(&self) -> Option<&str> {
        self.extensions.get("classification")?.as_str()
    }
}

impl GraphQLLocation {
    /// Convert a `SourceSpan` to a line and column number
    pub fn from_span(sources: &SourceMap, location: Option<SourceSpan>) -> Option<Self> {
        let start = location?.line_column_range(sources)?.start;
        Some(Self {
            line: start.line,
            column: start.column,
        })
    }
}

impl fmt::Display for PathElement {
    /// Formats as in `/composers[0]/key`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "/{name}"),
            Self::ListIndex(index) => write!(f, "[{index}]"),
        }
    }
}

impl ResponseData {
    /// For serde `skip_serializing_if`
    fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// For serde `default`
    fn absent() -> Self {
        Self::Absent
    }
}

impl Serialize for ResponseData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            // Skipped by `Response`, so only reachable when serialized on its own
            ResponseData::Absent | ResponseData::Null => serializer.serialize_unit(),
            ResponseData::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<Option<JsonMap>> for ResponseData {
    fn from(value: Option<JsonMap>) -> Self {
        match value {
            Some(data) => Self::Object(data),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_has_no_data() {
        let error = GraphQLError::new("boom", None, &Default::default())
            .with_classification(ErrorClassification::ValidationError);
        let response = Response::from_request_error(error);
        expect_test::expect![[r#"
            {
              "errors": [
                {
                  "message": "boom",
                  "extensions": {
                    "classification": "ValidationError"
                  }
                }
              ]
            }"#]]
        .assert_eq(&serde_json::to_string_pretty(&response).unwrap());
    }

    #[test]
    fn null_data_is_serialized() {
        let response = Response {
            errors: Vec::new(),
            data: ResponseData::Null,
        };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"data":null}"#);
    }

    #[test]
    fn path_elements_are_untagged() {
        let path = vec![
            PathElement::Field(Name::new("composers").unwrap()),
            PathElement::ListIndex(0),
        ];
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["composers",0]"#);
        let display: String = path.iter().map(|element| element.to_string()).collect();
        assert_eq!(display, "/composers[0]");
    }
}
