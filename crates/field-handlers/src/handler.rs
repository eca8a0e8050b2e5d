use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
};
use filter_syntax::ast::{
    node::Comparison,
    operator::{Operator, SubOperator},
};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

/// Operators every handler understands unless it opts out.
pub const DEFAULT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Like,
    Operator::Nlike,
    Operator::Empty,
    Operator::NotEmpty,
    Operator::Null,
    Operator::NotNull,
    Operator::Blank,
    Operator::NotBlank,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
];

/// Per-column-type filter strategy.
///
/// The compiler always calls [`verify_filter`], then [`parse_filter_value`]
/// (which calls [`parse_user_input`] per literal), then [`compile_filter`].
/// Nothing is emitted unless all three succeed for every comparison.
///
/// [`verify_filter`]: FieldHandler::verify_filter
/// [`parse_filter_value`]: FieldHandler::parse_filter_value
/// [`parse_user_input`]: FieldHandler::parse_user_input
/// [`compile_filter`]: FieldHandler::compile_filter
pub trait FieldHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn supported_operators(&self) -> &[Operator];

    fn supported_sub_operators(&self) -> &[SubOperator] {
        &[]
    }

    fn verify_filter(&self, filter: &Comparison, column: &Column) -> Result<(), HandlerError> {
        verify_supported(self, filter, column)
    }

    /// Normalizes one raw literal for this column type.
    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError>;

    /// Parses the comparison's value according to the operator's arity.
    fn parse_filter_value(
        &self,
        filter: &Comparison,
        column: &Column,
    ) -> Result<FilterValue, HandlerError> {
        default_filter_value(self, filter, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        ctx: &CompileContext,
    ) -> Result<Expr, HandlerError>;
}

/// Checks the operator and sub-operator against the handler's lists.
pub fn verify_supported<H: FieldHandler + ?Sized>(
    handler: &H,
    filter: &Comparison,
    column: &Column,
) -> Result<(), HandlerError> {
    if !handler.supported_operators().contains(&filter.operator) {
        return Err(HandlerError::unsupported(filter.operator, column));
    }
    if let Some(sub) = filter.sub_operator {
        if !handler.supported_sub_operators().contains(&sub) {
            return Err(HandlerError::unsupported(
                format!("{} ({})", filter.operator, sub),
                column,
            ));
        }
    }
    Ok(())
}

pub(crate) fn is_list_operator(operator: Operator) -> bool {
    matches!(
        operator,
        Operator::In
            | Operator::Btw
            | Operator::Nbtw
            | Operator::AnyOf
            | Operator::NAnyOf
            | Operator::AllOf
            | Operator::NAllOf
    )
}

/// Splits a list operand given as an array or a comma separated string.
pub(crate) fn split_list(raw: &serde_json::Value) -> Vec<serde_json::Value> {
    match raw {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::String(s) if s.trim().is_empty() => Vec::new(),
        serde_json::Value::String(s) => s
            .split(',')
            .map(|item| serde_json::Value::String(item.trim().to_string()))
            .collect(),
        serde_json::Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

pub(crate) fn default_filter_value<H: FieldHandler + ?Sized>(
    handler: &H,
    filter: &Comparison,
    column: &Column,
) -> Result<FilterValue, HandlerError> {
    if filter.operator.is_unary() {
        return Ok(FilterValue::Absent);
    }

    if is_list_operator(filter.operator) {
        let items = split_list(&filter.value)
            .iter()
            .map(|item| handler.parse_user_input(item, column))
            .collect::<Result<Vec<_>, _>>()?;
        let arity_ok = match filter.operator {
            Operator::Btw | Operator::Nbtw => items.len() == 2,
            _ => !items.is_empty(),
        };
        if !arity_ok {
            return Err(HandlerError::invalid(
                &filter.value,
                column,
                format!("unexpected number of values for {}", filter.operator),
            ));
        }
        return Ok(FilterValue::List(items));
    }

    if filter.value.is_null() {
        return Ok(FilterValue::Single(Value::Null));
    }
    Ok(FilterValue::Single(
        handler.parse_user_input(&filter.value, column)?,
    ))
}
