use crate::scalars::CoercionError;
use crate::scalars::ScalarCoercion;
use crate::JsonValue;
use apollo_compiler::ast::Value;
use regex::Regex;
use std::sync::LazyLock;

/// Pitch class, optional accidental, optional minor mode
const KEY_PATTERN_SOURCE: &str = "[A-G](b|#)?m?";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{KEY_PATTERN_SOURCE})$")).expect("Invalid regex pattern")
});

/// The `Key` scalar: a musical key such as `C`, `F#m` or `Bb`.
///
/// Input of any leaf kind is turned into its text first, so `Key` accepts
/// `"Dm"` and the enum-like literal `Dm` alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyScalar;

impl KeyScalar {
    pub fn is_valid(candidate: &str) -> bool {
        KEY_PATTERN.is_match(candidate)
    }

    pub fn validate(candidate: String) -> Result<JsonValue, CoercionError> {
        if Self::is_valid(&candidate) {
            Ok(candidate.into())
        } else {
            Err(CoercionError::new(format!(
                "Key must match the pattern: {KEY_PATTERN_SOURCE}"
            )))
        }
    }

    fn stringify(value: &JsonValue) -> String {
        match value {
            JsonValue::String(text) => text.as_str().to_owned(),
            other => other.to_string(),
        }
    }
}

impl ScalarCoercion for KeyScalar {
    fn serialize(&self, value: &JsonValue) -> Result<JsonValue, CoercionError> {
        Self::validate(Self::stringify(value))
    }

    fn parse_value(&self, value: &JsonValue) -> Result<JsonValue, CoercionError> {
        Self::validate(Self::stringify(value))
    }

    fn parse_literal(&self, value: &Value) -> Result<JsonValue, CoercionError> {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Enum(name) => name.to_string(),
            Value::Int(int) => int.as_str().to_owned(),
            Value::Float(float) => float.as_str().to_owned(),
            Value::Boolean(boolean) => boolean.to_string(),
            Value::Null => "null".to_owned(),
            Value::Variable(_) | Value::List(_) | Value::Object(_) => {
                return Err(CoercionError::new(format!(
                    "Expected a String literal for Key, got {value}"
                )))
            }
        };
        Self::validate(text)
    }
}
