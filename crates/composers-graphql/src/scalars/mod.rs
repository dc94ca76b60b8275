//! Coercion of [custom scalars](https://spec.graphql.org/October2021/#sec-Scalars.Custom-Scalars)
//!
//! Each scalar converts values in three directions:
//! results on their way into a response, variable values from the request,
//! and literals written in the document.

use crate::JsonValue;
use apollo_compiler::ast::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

mod date;
mod key;

pub use self::date::DateScalar;
pub use self::key::KeyScalar;

/// A custom scalar rejected a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CoercionError {
    message: String,
}

/// Bidirectional conversion for one custom scalar type.
///
/// Every method returns the JSON wire representation of the value.
pub trait ScalarCoercion: Send + Sync {
    /// [Result coercion](https://spec.graphql.org/October2021/#sec-Scalars.Result-Coercion-and-Serialization)
    fn serialize(&self, value: &JsonValue) -> Result<JsonValue, CoercionError>;

    /// [Input coercion](https://spec.graphql.org/October2021/#sec-Scalars.Input-Coercion)
    /// of a value provided through request variables
    fn parse_value(&self, value: &JsonValue) -> Result<JsonValue, CoercionError>;

    /// [Input coercion](https://spec.graphql.org/October2021/#sec-Scalars.Input-Coercion)
    /// of a literal found in the document
    fn parse_literal(&self, value: &Value) -> Result<JsonValue, CoercionError>;
}

/// Custom scalar coercions, by scalar type name.
///
/// Scalars without an entry pass through unchanged.
#[derive(Clone, Default)]
pub struct ScalarRegistry {
    coercions: IndexMap<String, Arc<dyn ScalarCoercion>>,
}

impl CoercionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ScalarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `Date` and `Key`
    pub fn composers() -> Self {
        let mut registry = Self::new();
        registry
            .register("Date", DateScalar)
            .register("Key", KeyScalar);
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        coercion: impl ScalarCoercion + 'static,
    ) -> &mut Self {
        self.coercions.insert(name.into(), Arc::new(coercion));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ScalarCoercion> {
        self.coercions.get(name).map(|coercion| &**coercion)
    }
}

impl fmt::Debug for ScalarRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.coercions.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json_bytes::json;

    #[test]
    fn unregistered_scalars_are_absent() {
        let registry = ScalarRegistry::composers();
        assert!(registry.get("Date").is_some());
        assert!(registry.get("Key").is_some());
        assert!(registry.get("JSON").is_none());
        assert_eq!(format!("{registry:?}"), r#"{"Date", "Key"}"#);
    }

    #[test]
    fn registry_dispatches_by_name() {
        let registry = ScalarRegistry::composers();
        let key = registry.get("Key").unwrap();
        assert_eq!(key.parse_value(&json!("F#m")).unwrap(), json!("F#m"));
        assert!(key.parse_value(&json!("H")).is_err());
    }
}
