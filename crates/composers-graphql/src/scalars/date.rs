use crate::scalars::CoercionError;
use crate::scalars::ScalarCoercion;
use crate::JsonValue;
use apollo_compiler::ast::Value;
use chrono::NaiveDate;

/// The `Date` scalar: an ISO-8601 calendar date such as `1685-03-31`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateScalar;

impl DateScalar {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Only the canonical form is accepted: `1874-1-2` or ` 1874-10-20` are not dates
    pub fn parse(input: &str) -> Result<NaiveDate, CoercionError> {
        let date = NaiveDate::parse_from_str(input, Self::FORMAT).map_err(|err| {
            CoercionError::new(format!("Invalid Date value '{input}': {err}"))
        })?;
        if Self::format(date) != input {
            return Err(CoercionError::new(format!(
                "Invalid Date value '{input}': expected YYYY-MM-DD"
            )));
        }
        Ok(date)
    }

    pub fn format(date: NaiveDate) -> String {
        date.format(Self::FORMAT).to_string()
    }

    fn canonical(input: &str) -> Result<JsonValue, CoercionError> {
        Ok(Self::format(Self::parse(input)?).into())
    }
}

impl ScalarCoercion for DateScalar {
    fn serialize(&self, value: &JsonValue) -> Result<JsonValue, CoercionError> {
        match value.as_str() {
            Some(date) => Self::canonical(date),
            None => Err(CoercionError::new(format!(
                "Expected a calendar date to serialize as Date, got {value}"
            ))),
        }
    }

    fn parse_value(&self, value: &JsonValue) -> Result<JsonValue, CoercionError> {
        match value.as_str() {
            Some(date) => Self::canonical(date),
            None => Err(CoercionError::new(format!(
                "Expected a String for Date, got {value}"
            ))),
        }
    }

    fn parse_literal(&self, value: &Value) -> Result<JsonValue, CoercionError> {
        match value {
            Value::String(date) => Self::canonical(date),
            _ => Err(CoercionError::new(format!(
                "Expected a String literal for Date, got {value}"
            ))),
        }
    }
}
