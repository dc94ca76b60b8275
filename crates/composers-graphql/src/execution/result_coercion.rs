use crate::execution::engine::execute_selection_set;
use crate::execution::engine::path_to_vec;
use crate::execution::engine::try_nullify;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::LinkedPathElement;
use crate::execution::engine::Propagate;
use crate::execution::resolver::ResolvedValue;
use crate::response::ErrorClassification;
use crate::response::GraphQLError;
use crate::response::PathElement;
use crate::JsonValue;
use apollo_compiler::executable::Field;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::Type;
use apollo_compiler::Name;

/// <https://spec.graphql.org/October2021/#CompleteValue()>
///
/// Returns `Err` for a field error being propagated upwards to find a nullable place
pub(crate) fn complete_value<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    parent_type: &Name,
    ty: &'a Type,
    resolved: ResolvedValue<'_>,
    fields: &[&'a Field],
) -> Result<JsonValue, Propagate> {
    let location = fields[0].name.location();
    macro_rules! field_error {
        ($classification: expr, $($arg: tt)+) => {
            {
                ctx.errors.push(
                    GraphQLError::field_error(
                        format!($($arg)+),
                        path,
                        location,
                        &ctx.document.sources
                    )
                    .with_classification($classification),
                );
                return Err(Propagate::Null);
            }
        };
    }
    if let ResolvedValue::Leaf(JsonValue::Null) = resolved {
        if ty.is_non_null() {
            ctx.errors.push(null_value_error(path, ty, parent_type));
            return Err(Propagate::Null);
        } else {
            return Ok(JsonValue::Null);
        }
    }
    if let ResolvedValue::List(iter) = resolved {
        match ty {
            Type::Named(_) | Type::NonNullNamed(_) => {
                field_error!(
                    ErrorClassification::DataFetchingException,
                    "Non-list type {ty} resolved to a list"
                )
            }
            Type::List(inner_ty) | Type::NonNullList(inner_ty) => {
                let mut completed_list = Vec::with_capacity(iter.size_hint().0);
                let mut propagated = None;
                for (index, inner_result) in iter.enumerate() {
                    let inner_path = LinkedPathElement {
                        element: PathElement::ListIndex(index),
                        next: path,
                    };
                    let inner_result = match inner_result {
                        Ok(inner_resolved) => complete_value(
                            ctx,
                            Some(&inner_path),
                            mode,
                            parent_type,
                            inner_ty,
                            inner_resolved,
                            fields,
                        ),
                        Err(error) => {
                            let propagate = if error.fatal {
                                Propagate::Abort
                            } else {
                                Propagate::Null
                            };
                            ctx.errors.push(error.into_field_error(
                                Some(&inner_path),
                                location,
                                &ctx.document.sources,
                            ));
                            Err(propagate)
                        }
                    };
                    // On field error, try to nullify that item
                    match try_nullify(inner_ty, inner_result) {
                        Ok(inner_value) => completed_list.push(inner_value),
                        Err(Propagate::Abort) => return Err(Propagate::Abort),
                        // If the item is non-null, the list is nullified once complete
                        Err(Propagate::Null) => propagated = Some(Propagate::Null),
                    }
                }
                return match propagated {
                    Some(propagate) => try_nullify(ty, Err(propagate)),
                    None => Ok(completed_list.into()),
                };
            }
        }
    }
    let ty_name = match ty {
        Type::List(_) | Type::NonNullList(_) => {
            field_error!(
                ErrorClassification::DataFetchingException,
                "List type {ty} resolved to an object"
            )
        }
        Type::Named(name) | Type::NonNullNamed(name) => name,
    };
    let Some(ty_def) = ctx.schema.types.get(ty_name) else {
        field_error!(
            ErrorClassification::ValidationError,
            "Undefined type {ty_name}"
        )
    };
    if let ExtendedType::InputObject(_) = ty_def {
        field_error!(
            ErrorClassification::ValidationError,
            "Field with input object type {ty_name}"
        )
    }
    let resolved_obj = match resolved {
        ResolvedValue::List(_) => unreachable!(), // early return above
        ResolvedValue::Leaf(json_value) => {
            let json_value = match ty_def {
                ExtendedType::InputObject(_) => unreachable!(), // early return above
                ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_) => {
                    field_error!(
                        ErrorClassification::DataFetchingException,
                        "Resolver returned a leaf value \
                         but expected an object for type {ty_name}"
                    )
                }
                ExtendedType::Enum(enum_def) => {
                    // https://spec.graphql.org/October2021/#sec-Enums.Result-Coercion
                    if !json_value
                        .as_str()
                        .is_some_and(|str| enum_def.values.contains_key(str))
                    {
                        field_error!(
                            ErrorClassification::DataFetchingException,
                            "Resolver returned {json_value}, expected enum {ty_name}"
                        )
                    }
                    json_value
                }
                ExtendedType::Scalar(_) => match ty_name.as_str() {
                    "Int" => {
                        // https://spec.graphql.org/October2021/#sec-Int.Result-Coercion
                        if let Some(int) = json_value.as_i64() {
                            if i32::try_from(int).is_err() {
                                field_error!(
                                    ErrorClassification::DataFetchingException,
                                    "Resolver returned {json_value} which overflows Int"
                                )
                            }
                        } else {
                            field_error!(
                                ErrorClassification::DataFetchingException,
                                "Resolver returned {json_value}, expected Int"
                            )
                        }
                        json_value
                    }
                    "Float" => {
                        // https://spec.graphql.org/October2021/#sec-Float.Result-Coercion
                        if !json_value.is_f64() {
                            field_error!(
                                ErrorClassification::DataFetchingException,
                                "Resolver returned {json_value}, expected Float"
                            )
                        }
                        json_value
                    }
                    "String" => {
                        // https://spec.graphql.org/October2021/#sec-String.Result-Coercion
                        if !json_value.is_string() {
                            field_error!(
                                ErrorClassification::DataFetchingException,
                                "Resolver returned {json_value}, expected String"
                            )
                        }
                        json_value
                    }
                    "Boolean" => {
                        // https://spec.graphql.org/October2021/#sec-Boolean.Result-Coercion
                        if !json_value.is_boolean() {
                            field_error!(
                                ErrorClassification::DataFetchingException,
                                "Resolver returned {json_value}, expected Boolean"
                            )
                        }
                        json_value
                    }
                    "ID" => {
                        // https://spec.graphql.org/October2021/#sec-ID.Result-Coercion
                        // Integers are serialized as strings
                        match json_value {
                            JsonValue::String(_) => json_value,
                            JsonValue::Number(number) if number.is_i64() || number.is_u64() => {
                                number.to_string().into()
                            }
                            _ => field_error!(
                                ErrorClassification::DataFetchingException,
                                "Resolver returned {json_value}, expected ID"
                            ),
                        }
                    }
                    custom => match ctx.scalars.get(custom) {
                        Some(coercion) => match coercion.serialize(&json_value) {
                            Ok(serialized) => serialized,
                            Err(error) => field_error!(
                                ErrorClassification::CoercionError,
                                "{}",
                                error.message()
                            ),
                        },
                        // Without a registered coercion, pass through any JSON value
                        None => json_value,
                    },
                },
            };
            return Ok(json_value);
        }
        ResolvedValue::Object(resolved_obj) => resolved_obj,
    };
    let object_type = match ty_def {
        ExtendedType::InputObject(_) => unreachable!(), // early return above
        ExtendedType::Enum(_) | ExtendedType::Scalar(_) => {
            field_error!(
                ErrorClassification::DataFetchingException,
                "Resolver returned a an object of type {}, expected {ty_name}",
                resolved_obj.type_name()
            )
        }
        ExtendedType::Interface(_) | ExtendedType::Union(_) => {
            // https://spec.graphql.org/October2021/#ResolveAbstractType()
            let object_type_name = resolved_obj.type_name();
            let Some(def) = ctx.schema.get_object(object_type_name) else {
                field_error!(
                    ErrorClassification::DataFetchingException,
                    "Resolver returned an object of type {object_type_name} \
                     not defined in the schema"
                )
            };
            let is_possible_type = match ty_def {
                ExtendedType::Union(union_def) => union_def.members.contains(&def.name),
                _ => def.implements_interfaces.contains(ty_name),
            };
            if !is_possible_type {
                field_error!(
                    ErrorClassification::DataFetchingException,
                    "Resolver returned an object of type {object_type_name} \
                     which is not a possible type of {ty_name}"
                )
            }
            def
        }
        ExtendedType::Object(def) => {
            debug_assert_eq!(ty_name, resolved_obj.type_name());
            def
        }
    };
    execute_selection_set(
        ctx,
        path,
        mode,
        object_type,
        &*resolved_obj,
        fields
            .iter()
            .flat_map(|field| &field.selection_set.selections),
    )
    .map(JsonValue::Object)
}

/// A non-null position resolved to null.
///
/// Carries a path but no location.
fn null_value_error(path: LinkedPath<'_>, ty: &Type, parent_type: &Name) -> GraphQLError {
    let path = path_to_vec(path);
    let display_path: String = path.iter().map(ToString::to_string).collect();
    let nullable_type = match ty {
        Type::NonNullNamed(name) | Type::Named(name) => name.to_string(),
        Type::NonNullList(inner) | Type::List(inner) => format!("[{inner}]"),
    };
    let message = format!(
        "The field at path '{display_path}' was declared as a non null type, \
         but the code involved in retrieving data has wrongly returned a null value.  \
         The graphql specification requires that the parent field be set to null, \
         or if that is non nullable that it bubble up null to its parent and so on. \
         The non-nullable type is '{nullable_type}' within parent type '{parent_type}'"
    );
    GraphQLError {
        message,
        locations: Vec::new(),
        path,
        extensions: Default::default(),
    }
    .with_classification(ErrorClassification::NullValueInNonNullableField)
}
