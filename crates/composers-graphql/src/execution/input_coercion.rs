use crate::execution::engine::ExecutionContext;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::Propagate;
use crate::execution::CoercedVariables;
use crate::execution::RequestError;
use crate::response::ErrorClassification;
use crate::response::GraphQLError;
use crate::scalars::ScalarRegistry;
use crate::JsonMap;
use crate::JsonValue;
use apollo_compiler::ast::Type;
use apollo_compiler::ast::Value;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Operation;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::validation::Valid;
use apollo_compiler::Node;
use apollo_compiler::Schema;

macro_rules! request_error {
    ($($arg: tt)+) => {
        return Err(RequestError::new(format_args!($($arg)+)))
    };
}

/// Coerce the values of variables from a GraphQL request to the types expected by the operation.
///
/// If type coercion fails, a request error is returned and the request must not be executed.
/// Custom scalars go through [`ScalarCoercion::parse_value`][crate::scalars::ScalarCoercion::parse_value].
///
/// This is [CoerceVariableValues()](https://spec.graphql.org/October2021/#CoerceVariableValues())
/// in the GraphQL specification.
pub fn coerce_variable_values(
    schema: &Valid<Schema>,
    operation: &Operation,
    values: &JsonMap,
    scalars: &ScalarRegistry,
) -> Result<CoercedVariables, RequestError> {
    let mut coerced_values = JsonMap::new();
    for variable_def in &operation.variables {
        let name = variable_def.name.as_str();
        let at_definition =
            |err: RequestError| err.in_variable(name).at(variable_def.location());
        if let Some((key, value)) = values.get_key_value(name) {
            let value = coerce_variable_value(
                schema,
                scalars,
                "variable",
                "",
                "",
                name,
                &variable_def.ty,
                value,
            )
            .map_err(at_definition)?;
            coerced_values.insert(key.clone(), value);
        } else if let Some(default) = &variable_def.default_value {
            let value = coerce_literal(schema, scalars, &variable_def.ty, default, &JsonMap::new())
                .map_err(|err| {
                    RequestError::new(format_args!(
                        "Invalid default value for variable '{name}': {}",
                        err.message
                    ))
                    .with_classification(err.classification)
                    .at(err.location)
                })?;
            coerced_values.insert(name, value);
        } else if variable_def.ty.is_non_null() {
            return Err(RequestError::new(format_args!(
                "Variable '{name}' has an invalid value: \
                 missing value for non-null type '{}'",
                variable_def.ty
            ))
            .at(variable_def.location()));
        } else {
            // Nullable variable with no provided value nor explicit default:
            // it stays absent, which is different from an explicit null
        }
    }
    Ok(CoercedVariables(coerced_values))
}

#[allow(clippy::too_many_arguments)] // internal, mirrors the recursion over input types
fn coerce_variable_value(
    schema: &Valid<Schema>,
    scalars: &ScalarRegistry,
    kind: &str,
    parent: &str,
    sep: &str,
    name: &str,
    ty: &Type,
    value: &JsonValue,
) -> Result<JsonValue, RequestError> {
    if value.is_null() {
        if ty.is_non_null() {
            request_error!("null value for non-null {kind} {parent}{sep}{name}")
        } else {
            return Ok(JsonValue::Null);
        }
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            return value
                .as_array()
                .map(Vec::as_slice)
                // If not an array, treat the value as an array of size one:
                .unwrap_or(std::slice::from_ref(value))
                .iter()
                .map(|item| {
                    coerce_variable_value(schema, scalars, kind, parent, sep, name, inner, item)
                })
                .collect();
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        request_error!("Undefined type {ty_name} for {kind} {parent}{sep}{name}")
    };
    match ty_def {
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_) => {
            request_error!("Non-input type {ty_name} for {kind} {parent}{sep}{name}.")
        }
        ExtendedType::Scalar(_) => match ty_name.as_str() {
            "Int" => {
                // https://spec.graphql.org/October2021/#sec-Int.Input-Coercion
                if value
                    .as_i64()
                    .is_some_and(|value| i32::try_from(value).is_ok())
                {
                    return Ok(value.clone());
                }
            }
            "Float" => {
                // https://spec.graphql.org/October2021/#sec-Float.Input-Coercion
                if value.is_number() {
                    return Ok(value.clone());
                }
            }
            "String" => {
                // https://spec.graphql.org/October2021/#sec-String.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
            }
            "Boolean" => {
                // https://spec.graphql.org/October2021/#sec-Boolean.Input-Coercion
                if value.is_boolean() {
                    return Ok(value.clone());
                }
            }
            "ID" => {
                // https://spec.graphql.org/October2021/#sec-ID.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
                if value.is_i64() || value.is_u64() {
                    return Ok(value.to_string().into());
                }
            }
            custom => {
                let Some(coercion) = scalars.get(custom) else {
                    return Ok(value.clone());
                };
                return coercion.parse_value(value).map_err(|err| {
                    RequestError::new(err.message())
                        .with_classification(ErrorClassification::CoercionError)
                });
            }
        },
        ExtendedType::Enum(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if let Some(str) = value.as_str() {
                if ty_def.values.keys().any(|value_name| value_name == str) {
                    return Ok(value.clone());
                }
            }
        }
        ExtendedType::InputObject(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Input-Objects.Input-Coercion
            if let Some(object) = value.as_object() {
                if let Some(key) = object
                    .keys()
                    .find(|key| !ty_def.fields.contains_key(key.as_str()))
                {
                    request_error!(
                        "Input object has key {} not in type {ty_name}",
                        key.as_str()
                    )
                }
                let mut object = object.clone();
                for (field_name, field_def) in &ty_def.fields {
                    if let Some(field_value) = object.get_mut(field_name.as_str()) {
                        *field_value = coerce_variable_value(
                            schema,
                            scalars,
                            "input field",
                            ty_name,
                            ".",
                            field_name,
                            &field_def.ty,
                            field_value,
                        )?
                    } else if let Some(default) = &field_def.default_value {
                        let default =
                            coerce_literal(schema, scalars, &field_def.ty, default, &JsonMap::new())
                                .map_err(|err| {
                                    RequestError::new(err.message)
                                        .with_classification(err.classification)
                                        .at(err.location)
                                })?;
                        object.insert(field_name.as_str(), default);
                    } else if field_def.ty.is_non_null() {
                        request_error!(
                            "Missing value for non-null input object field {ty_name}.{field_name}"
                        )
                    } else {
                        // Field not required
                    }
                }
                return Ok(object.into());
            }
        }
    }
    request_error!("Could not coerce {kind} {parent}{sep}{name}: {value} to type {ty_name}")
}

/// <https://spec.graphql.org/October2021/#CoerceArgumentValues()>
///
/// Variables were already coerced. Literals are coerced here,
/// failures are field errors located at the offending literal.
pub(crate) fn coerce_argument_values(
    ctx: &mut ExecutionContext<'_>,
    path: LinkedPath<'_>,
    field_def: &FieldDefinition,
    field: &Field,
) -> Result<JsonMap, Propagate> {
    let mut coerced_values = JsonMap::new();
    for arg_def in &field_def.arguments {
        let arg_name = &arg_def.name;
        let provided = field
            .arguments
            .iter()
            .find(|arg| arg.name == *arg_name)
            .map(|arg| &arg.value);
        let result = match provided {
            Some(value) => match value.as_ref() {
                Value::Variable(var_name) => match ctx.variable_values.get(var_name.as_str()) {
                    Some(var_value) if var_value.is_null() && arg_def.ty.is_non_null() => {
                        Err(LiteralError::new(
                            format!("null value for non-null argument {arg_name}"),
                            value.location(),
                        ))
                    }
                    Some(var_value) => Ok(Some(var_value.clone())),
                    None => default_argument_value(ctx, &arg_def.ty, &arg_def.default_value)
                        .map_err(|err| err.or_at(value.location())),
                },
                _ => coerce_literal(
                    ctx.schema,
                    ctx.scalars,
                    &arg_def.ty,
                    value,
                    ctx.variable_values,
                )
                .map(Some),
            },
            None => default_argument_value(ctx, &arg_def.ty, &arg_def.default_value)
                .map_err(|err| err.or_at(field.name.location())),
        };
        match result {
            Ok(Some(value)) => {
                coerced_values.insert(arg_name.as_str(), value);
            }
            Ok(None) => {}
            Err(err) => {
                ctx.errors.push(
                    GraphQLError::field_error(
                        format!("Argument '{arg_name}' has an invalid value: {}", err.message),
                        path,
                        err.location,
                        &ctx.document.sources,
                    )
                    .with_classification(err.classification),
                );
                return Err(Propagate::Null);
            }
        }
    }
    Ok(coerced_values)
}

fn default_argument_value(
    ctx: &ExecutionContext<'_>,
    ty: &Type,
    default_value: &Option<Node<Value>>,
) -> Result<Option<JsonValue>, LiteralError> {
    if let Some(default) = default_value {
        coerce_literal(ctx.schema, ctx.scalars, ty, default, &JsonMap::new()).map(Some)
    } else if ty.is_non_null() {
        Err(LiteralError::new(
            format!("missing value for non-null type '{ty}'"),
            None,
        ))
    } else {
        Ok(None)
    }
}

/// A literal in the document that cannot be coerced to its expected input type
struct LiteralError {
    message: String,
    location: Option<SourceSpan>,
    classification: ErrorClassification,
}

impl LiteralError {
    fn new(message: impl Into<String>, location: Option<SourceSpan>) -> Self {
        Self {
            message: message.into(),
            location,
            classification: ErrorClassification::ValidationError,
        }
    }

    fn or_at(mut self, location: Option<SourceSpan>) -> Self {
        self.location = self.location.or(location);
        self
    }
}

/// Input coercion of a literal, which may still contain variables nested in lists or objects.
fn coerce_literal(
    schema: &Valid<Schema>,
    scalars: &ScalarRegistry,
    ty: &Type,
    value: &Node<Value>,
    variable_values: &JsonMap,
) -> Result<JsonValue, LiteralError> {
    let invalid = |message: String| Err(LiteralError::new(message, value.location()));
    match value.as_ref() {
        Value::Null if ty.is_non_null() => {
            return invalid(format!("null value for non-null type '{ty}'"));
        }
        Value::Null => return Ok(JsonValue::Null),
        Value::Variable(var_name) => {
            return match variable_values.get(var_name.as_str()) {
                Some(var_value) if !(var_value.is_null() && ty.is_non_null()) => {
                    Ok(var_value.clone())
                }
                _ if ty.is_non_null() => {
                    invalid(format!("null value for non-null type '{ty}' in ${var_name}"))
                }
                _ => Ok(JsonValue::Null),
            };
        }
        _ => {}
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            return match value.as_ref() {
                Value::List(items) => items
                    .iter()
                    .map(|item| coerce_literal(schema, scalars, inner, item, variable_values))
                    .collect(),
                // A single value is treated as a list of size one
                _ => Ok(JsonValue::Array(vec![coerce_literal(
                    schema,
                    scalars,
                    inner,
                    value,
                    variable_values,
                )?])),
            };
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        return invalid(format!("undefined type {ty_name}"));
    };
    match (ty_def, value.as_ref()) {
        (ExtendedType::Scalar(_), value_ref) => match (ty_name.as_str(), value_ref) {
            ("Int", Value::Int(int)) => {
                if let Ok(int) = int.as_str().parse::<i32>() {
                    return Ok(int.into());
                }
                return invalid(format!("{} overflows Int", int.as_str()));
            }
            ("Float", Value::Int(int)) => {
                if let Ok(float) = int.as_str().parse::<f64>() {
                    return Ok(float.into());
                }
            }
            ("Float", Value::Float(float)) => {
                if let Ok(float) = float.as_str().parse::<f64>() {
                    return Ok(float.into());
                }
            }
            ("String", Value::String(string)) => return Ok(string.as_str().into()),
            ("Boolean", Value::Boolean(boolean)) => return Ok((*boolean).into()),
            ("ID", Value::String(string)) => return Ok(string.as_str().into()),
            ("ID", Value::Int(int)) => return Ok(int.as_str().into()),
            ("Int" | "Float" | "String" | "Boolean" | "ID", _) => {}
            (custom, _) => {
                return match scalars.get(custom) {
                    Some(coercion) => coercion.parse_literal(value).map_err(|err| LiteralError {
                        message: err.message().to_owned(),
                        location: value.location(),
                        classification: ErrorClassification::CoercionError,
                    }),
                    None => literal_to_json(value, variable_values),
                };
            }
        },
        (ExtendedType::Enum(enum_def), Value::Enum(enum_value)) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if enum_def.values.contains_key(enum_value) {
                return Ok(enum_value.as_str().into());
            }
        }
        (ExtendedType::InputObject(input_def), Value::Object(fields)) => {
            // https://spec.graphql.org/October2021/#sec-Input-Objects.Input-Coercion
            if let Some((key, _)) = fields
                .iter()
                .find(|(key, _)| !input_def.fields.contains_key(key))
            {
                return invalid(format!("input object has key {key} not in type {ty_name}"));
            }
            let mut object = JsonMap::new();
            for (field_name, field_def) in &input_def.fields {
                let provided = fields
                    .iter()
                    .find(|(key, _)| key == field_name)
                    .map(|(_, value)| value)
                    .filter(|value| match value.as_ref() {
                        Value::Variable(var_name) => {
                            variable_values.contains_key(var_name.as_str())
                        }
                        _ => true,
                    });
                if let Some(field_value) = provided {
                    let field_value = coerce_literal(
                        schema,
                        scalars,
                        &field_def.ty,
                        field_value,
                        variable_values,
                    )?;
                    object.insert(field_name.as_str(), field_value);
                } else if let Some(default) = &field_def.default_value {
                    let default =
                        coerce_literal(schema, scalars, &field_def.ty, default, variable_values)?;
                    object.insert(field_name.as_str(), default);
                } else if field_def.ty.is_non_null() {
                    return invalid(format!(
                        "missing value for non-null input object field {ty_name}.{field_name}"
                    ));
                }
            }
            return Ok(object.into());
        }
        _ => {}
    }
    invalid(format!("could not coerce {} to type {ty_name}", value.as_ref()))
}

/// A custom scalar without registered coercion takes the literal as JSON
fn literal_to_json(value: &Value, variable_values: &JsonMap) -> Result<JsonValue, LiteralError> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Variable(var_name) => variable_values
            .get(var_name.as_str())
            .cloned()
            .unwrap_or(JsonValue::Null),
        Value::Enum(value) => value.as_str().into(),
        Value::String(value) => value.as_str().into(),
        Value::Boolean(value) => (*value).into(),
        // Rely on `serde_json::Number`’s own parser to use whatever precision it supports
        Value::Int(value) => JsonValue::Number(value.as_str().parse().map_err(|_| {
            LiteralError::new(format!("Int value {} overflows", value.as_str()), None)
        })?),
        Value::Float(value) => JsonValue::Number(value.as_str().parse().map_err(|_| {
            LiteralError::new(format!("Float value {} overflows", value.as_str()), None)
        })?),
        Value::List(items) => items
            .iter()
            .map(|item| literal_to_json(item, variable_values))
            .collect::<Result<_, _>>()?,
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| Ok((key.as_str(), literal_to_json(value, variable_values)?)))
            .collect::<Result<_, LiteralError>>()?,
    })
}
