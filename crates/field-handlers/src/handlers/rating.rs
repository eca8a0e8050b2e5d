use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::{
        generic::{comparison_operator, compile_default, single},
        number::{NUMBER_OPERATORS, NumberHandler},
    },
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

/// Numeric handler for ratings, where an unset (NULL) rating reads as 0.
#[derive(Debug, Default)]
pub struct RatingHandler;

/// Whether an unset rating, taken as 0, satisfies `0 <operator> value`.
fn unset_matches(operator: Operator, value: f64) -> bool {
    match operator {
        Operator::Eq => value == 0.0,
        Operator::Neq => value != 0.0,
        Operator::Gt => 0.0 > value,
        Operator::Gte => 0.0 >= value,
        Operator::Lt => 0.0 < value,
        Operator::Lte => 0.0 <= value,
        _ => false,
    }
}

impl FieldHandler for RatingHandler {
    fn name(&self) -> &'static str {
        "rating"
    }

    fn supported_operators(&self) -> &[Operator] {
        NUMBER_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        NumberHandler.parse_user_input(raw, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        let operator = filter.operator;
        let ordered = matches!(
            operator,
            Operator::Eq | Operator::Neq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        );
        if !ordered {
            return compile_default(operator, value, column, true);
        }

        let v = single(value, column)?;
        let Some(n) = v.as_f64() else {
            return compile_default(operator, value, column, true);
        };

        let c = column.expr();
        let test = Expr::binary(c.clone(), comparison_operator(operator), Expr::Value(v.clone()));
        let expr = if unset_matches(operator, n) {
            Expr::any_of(vec![test, c.is_null()])
        } else if operator == Operator::Neq {
            // neq 0 must not pick up unset rows
            Expr::all_of(vec![test, c.is_not_null()])
        } else {
            test
        };
        Ok(expr)
    }
}
