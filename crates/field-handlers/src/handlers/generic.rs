use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::{DEFAULT_OPERATORS, FieldHandler},
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::{
    ast::expr::{BinaryOperator, Expr},
    value as lit,
};

/// Fallback for UI types without a dedicated handler.
#[derive(Debug, Default)]
pub struct GenericHandler;

impl FieldHandler for GenericHandler {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn supported_operators(&self) -> &[Operator] {
        DEFAULT_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        Value::from_json_scalar(raw)
            .ok_or_else(|| HandlerError::invalid(raw, column, "expected a scalar"))
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        let null_only = column.column.ui_type.is_numeric() || column.column.ui_type.is_temporal();
        compile_default(filter.operator, value, column, null_only)
    }
}

/// Shared predicate shapes.
///
/// `null_only` is set for types that have no empty-string state: `empty` and
/// `blank` then reduce to null checks.
pub(crate) fn compile_default(
    operator: Operator,
    value: &FilterValue,
    column: &ColumnRef,
    null_only: bool,
) -> Result<Expr, HandlerError> {
    let c = column.expr();
    let empty = || lit("");

    let expr = match operator {
        Operator::Eq => match single(value, column)? {
            Value::Null => c.is_null(),
            v => c.equals(Expr::Value(v.clone())),
        },
        Operator::Neq => match single(value, column)? {
            Value::Null => c.is_not_null(),
            v => Expr::any_of(vec![c.clone().not_equals(Expr::Value(v.clone())), c.is_null()]),
        },
        Operator::Like | Operator::Nlike => {
            let text = single(value, column)?.as_string().unwrap_or_default();
            compile_like(operator == Operator::Nlike, &text, c)
        }
        Operator::Empty | Operator::Blank if null_only => c.is_null(),
        Operator::NotEmpty | Operator::NotBlank if null_only => c.is_not_null(),
        Operator::Empty => c.equals(empty()),
        Operator::NotEmpty => Expr::any_of(vec![c.clone().not_equals(empty()), c.is_null()]),
        Operator::Blank => Expr::any_of(vec![c.clone().is_null(), c.equals(empty())]),
        Operator::NotBlank => Expr::all_of(vec![c.clone().is_not_null(), c.not_equals(empty())]),
        Operator::Null => c.is_null(),
        Operator::NotNull => c.is_not_null(),
        Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte => {
            let v = match single(value, column)? {
                Value::Null => {
                    return Err(HandlerError::invalid("null", column.column, "value required"));
                }
                v => v.clone(),
            };
            Expr::binary(c, comparison_operator(operator), Expr::Value(v))
        }
        Operator::In => c.in_list(list(value).into_iter().map(Expr::Value).collect(), false),
        Operator::Btw | Operator::Nbtw => {
            let bounds = list(value);
            let [low, high] = <[Value; 2]>::try_from(bounds).map_err(|_| {
                HandlerError::invalid("range", column.column, "expected two bounds")
            })?;
            c.between(
                Expr::Value(low),
                Expr::Value(high),
                operator == Operator::Nbtw,
            )
        }
        Operator::Checked => c.equals(lit(true)),
        Operator::NotChecked => Expr::any_of(vec![c.clone().is_null(), c.equals(lit(false))]),
        Operator::AnyOf | Operator::NAnyOf | Operator::AllOf | Operator::NAllOf => {
            compile_set_membership(operator, &list(value), column)
        }
        Operator::IsWithin => return Err(HandlerError::unsupported(operator, column.column)),
    };
    Ok(expr)
}

fn compile_like(negated: bool, text: &str, c: Expr) -> Expr {
    if text.is_empty() {
        // An empty pattern matches every non-null value.
        return if negated {
            Expr::any_of(vec![c.clone().not_equals(lit("")), c.is_null()])
        } else {
            Expr::any_of(vec![c.clone().equals(lit("")), c.is_not_null()])
        };
    }

    let pattern = if text.starts_with('%') || text.ends_with('%') {
        text.to_string()
    } else {
        format!("%{text}%")
    };
    if negated {
        Expr::any_of(vec![
            c.clone().like(lit(pattern), true),
            c.clone().equals(lit("")),
            c.is_null(),
        ])
    } else {
        c.like(lit(pattern), false)
    }
}

/// `concat(',', c, ',') like '%,item,%'` per item, combined with or/and.
pub(crate) fn compile_set_membership(
    operator: Operator,
    items: &[Value],
    column: &ColumnRef,
) -> Expr {
    let c = column.expr();
    let matches: Vec<Expr> = items
        .iter()
        .map(|item| {
            let item = item.as_string().unwrap_or_default();
            Expr::Concat(vec![lit(","), c.clone(), lit(",")])
                .like(lit(format!("%,{item},%")), false)
        })
        .collect();

    let inner = match operator {
        Operator::AllOf | Operator::NAllOf => Expr::all_of(matches),
        _ => Expr::any_of(matches),
    };
    match operator {
        Operator::NAnyOf | Operator::NAllOf => Expr::any_of(vec![inner.negate(), c.is_null()]),
        _ => inner,
    }
}

pub(crate) fn comparison_operator(operator: Operator) -> BinaryOperator {
    match operator {
        Operator::Gt => BinaryOperator::Gt,
        Operator::Lt => BinaryOperator::Lt,
        Operator::Gte => BinaryOperator::GtEq,
        Operator::Lte => BinaryOperator::LtEq,
        Operator::Neq => BinaryOperator::NotEq,
        _ => BinaryOperator::Eq,
    }
}

pub(crate) fn single<'v>(value: &'v FilterValue, column: &ColumnRef) -> Result<&'v Value, HandlerError> {
    value
        .single()
        .ok_or_else(|| HandlerError::invalid("<missing>", column.column, "a single value is required"))
}

pub(crate) fn list(value: &FilterValue) -> Vec<Value> {
    value.values().into_iter().cloned().collect()
}
