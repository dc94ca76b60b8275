use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::resolver::ObjectValue;
use crate::execution::resolver::ResolveError;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::ResolvedValue;
use crate::execution::result_coercion::complete_value;
use crate::response::GraphQLError;
use crate::response::PathElement;
use crate::scalars::ScalarRegistry;
use crate::JsonMap;
use crate::JsonValue;
use apollo_compiler::ast::Value;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Operation;
use apollo_compiler::executable::Selection;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::schema::Type;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;

/// <https://spec.graphql.org/October2021/#sec-Normal-and-Serial-Execution>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// Allowed to resolve fields in any order, including in parallel
    Normal,
    /// Top-level fields of a mutation operation must be executed in order
    Sequential,
}

/// Return in `Err` when a field error occurred at some non-nullable place
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Propagate {
    /// Replace the nearest nullable ancestor with null
    Null,
    /// A fatal resolver error: stop executing the operation
    Abort,
}

/// Linked-list version of `Vec<PathElement>`, taking advantage of the call stack
pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathElement,
    pub(crate) next: LinkedPath<'a>,
}

pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Valid<Schema>,
    pub(crate) document: &'a Valid<ExecutableDocument>,
    pub(crate) operation: &'a Operation,
    pub(crate) variable_values: &'a JsonMap,
    pub(crate) scalars: &'a ScalarRegistry,
    pub(crate) errors: &'a mut Vec<GraphQLError>,
}

/// <https://spec.graphql.org/October2021/#ExecuteSelectionSet()>
///
/// Every field of the set is executed before a propagated null is returned,
/// so errors of sibling fields are all reported.
pub(crate) fn execute_selection_set<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &ObjectType,
    object_value: &dyn ObjectValue,
    selections: impl IntoIterator<Item = &'a Selection>,
) -> Result<JsonMap, Propagate> {
    let mut grouped_field_set = IndexMap::new();
    collect_fields(
        ctx,
        object_type,
        selections,
        &mut HashSet::new(),
        &mut grouped_field_set,
    );

    if mode == ExecutionMode::Sequential {
        tracing::debug!(
            object_type = %object_type.name,
            fields = grouped_field_set.len(),
            "executing fields in order"
        );
    }

    let mut response_map = JsonMap::with_capacity(grouped_field_set.len());
    let mut propagated = None;
    for (&response_key, fields) in &grouped_field_set {
        // Indexing should not panic: `collect_fields` only creates a `Vec` to push to it
        let field_name = &fields[0].name;
        let Ok(field_def) = ctx.schema.type_field(&object_type.name, field_name) else {
            // Only reachable with a document that was not validated against this schema
            continue;
        };
        let field_path = LinkedPathElement {
            element: PathElement::Field(response_key.clone()),
            next: path,
        };
        match execute_field(
            ctx,
            Some(&field_path),
            mode,
            object_type,
            object_value,
            field_def,
            fields,
        ) {
            Ok(value) => {
                response_map.insert(response_key.as_str(), value);
            }
            Err(Propagate::Abort) => return Err(Propagate::Abort),
            Err(Propagate::Null) => propagated = Some(Propagate::Null),
        }
    }
    match propagated {
        Some(propagate) => Err(propagate),
        None => Ok(response_map),
    }
}

/// <https://spec.graphql.org/October2021/#CollectFields()>
fn collect_fields<'a>(
    ctx: &mut ExecutionContext<'a>,
    object_type: &ObjectType,
    selections: impl IntoIterator<Item = &'a Selection>,
    visited_fragments: &mut HashSet<&'a Name>,
    grouped_fields: &mut IndexMap<&'a Name, Vec<&'a Field>>,
) {
    for selection in selections {
        if eval_if_arg(selection, "skip", ctx.variable_values).unwrap_or(false)
            || !eval_if_arg(selection, "include", ctx.variable_values).unwrap_or(true)
        {
            continue;
        }
        match selection {
            Selection::Field(field) => grouped_fields
                .entry(field.response_key())
                .or_default()
                .push(field.as_ref()),
            Selection::FragmentSpread(spread) => {
                let new = visited_fragments.insert(&spread.fragment_name);
                if !new {
                    continue;
                }
                let Some(fragment) = ctx.document.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                if !does_fragment_type_apply(ctx.schema, object_type, fragment.type_condition()) {
                    continue;
                }
                collect_fields(
                    ctx,
                    object_type,
                    &fragment.selection_set.selections,
                    visited_fragments,
                    grouped_fields,
                )
            }
            Selection::InlineFragment(inline) => {
                if let Some(condition) = &inline.type_condition {
                    if !does_fragment_type_apply(ctx.schema, object_type, condition) {
                        continue;
                    }
                }
                collect_fields(
                    ctx,
                    object_type,
                    &inline.selection_set.selections,
                    visited_fragments,
                    grouped_fields,
                )
            }
        }
    }
}

/// <https://spec.graphql.org/October2021/#DoesFragmentTypeApply()>
fn does_fragment_type_apply(
    schema: &Schema,
    object_type: &ObjectType,
    fragment_type: &Name,
) -> bool {
    match schema.types.get(fragment_type) {
        Some(ExtendedType::Object(_)) => *fragment_type == object_type.name,
        Some(ExtendedType::Interface(_)) => {
            object_type.implements_interfaces.contains(fragment_type)
        }
        Some(ExtendedType::Union(def)) => def.members.contains(&object_type.name),
        // Undefined or not an output type: validation should have caught this
        _ => false,
    }
}

/// Evaluate the `if` argument of `@skip` or `@include`, if that directive is present
fn eval_if_arg(
    selection: &Selection,
    directive_name: &str,
    variable_values: &JsonMap,
) -> Option<bool> {
    match selection
        .directives()
        .get(directive_name)?
        .specified_argument_by_name("if")?
        .as_ref()
    {
        Value::Boolean(value) => Some(*value),
        Value::Variable(var) => variable_values.get(var.as_str())?.as_bool(),
        _ => None,
    }
}

/// <https://spec.graphql.org/October2021/#ExecuteField()>
fn execute_field<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &ObjectType,
    object_value: &dyn ObjectValue,
    field_def: &FieldDefinition,
    fields: &[&'a Field],
) -> Result<JsonValue, Propagate> {
    let field = fields[0];
    let argument_values = match coerce_argument_values(ctx, path, field_def, field) {
        Ok(argument_values) => argument_values,
        Err(propagate) => return try_nullify(&field_def.ty, Err(propagate)),
    };
    let info = ResolveInfo {
        schema: ctx.schema,
        document: ctx.document,
        operation: ctx.operation,
        field,
        arguments: &argument_values,
        errors: RefCell::default(),
    };
    let resolved_result = match field.name.as_str() {
        "__typename" => Ok(ResolvedValue::leaf(object_type.name.as_str())),
        "__schema" | "__type" => Err(ResolveError::new(format!(
            "Introspection is disabled: cannot query field {} on type {}",
            field.name, object_type.name
        ))),
        _ => object_value.resolve_field(&info),
    };
    ctx.errors.extend(info.take_errors());
    let completed_result = match resolved_result {
        Ok(resolved) => complete_value(
            ctx,
            path,
            mode,
            &object_type.name,
            field.ty(),
            resolved,
            fields,
        ),
        Err(error) => {
            let propagate = if error.fatal {
                tracing::debug!(field = %field.name, "resolver error aborts the operation");
                Propagate::Abort
            } else {
                Propagate::Null
            };
            ctx.errors.push(error.into_field_error(
                path,
                field.name.location(),
                &ctx.document.sources,
            ));
            Err(propagate)
        }
    };
    // Resolvers may report more while their lists are iterated
    ctx.errors.extend(info.take_errors());
    try_nullify(&field_def.ty, completed_result)
}

/// Try to insert a propagated null if possible, or keep propagating it.
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
pub(crate) fn try_nullify(
    ty: &Type,
    result: Result<JsonValue, Propagate>,
) -> Result<JsonValue, Propagate> {
    match result {
        Err(Propagate::Null) if !ty.is_non_null() => Ok(JsonValue::Null),
        result => result,
    }
}

pub(crate) fn path_to_vec(mut link: LinkedPath<'_>) -> Vec<PathElement> {
    let mut path = Vec::new();
    while let Some(node) = link {
        path.push(node.element.clone());
        link = node.next;
    }
    path.reverse();
    path
}

impl GraphQLError {
    pub(crate) fn field_error(
        message: impl Into<String>,
        path: LinkedPath<'_>,
        location: Option<SourceSpan>,
        sources: &SourceMap,
    ) -> Self {
        let mut err = Self::new(message, location, sources);
        err.path = path_to_vec(path);
        err
    }
}

impl ResolveError {
    pub(crate) fn into_field_error(
        self,
        path: LinkedPath<'_>,
        location: Option<SourceSpan>,
        sources: &SourceMap,
    ) -> GraphQLError {
        GraphQLError::field_error(self.message, path, location, sources)
            .with_classification(self.classification)
    }
}
