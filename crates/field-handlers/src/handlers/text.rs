use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::generic::compile_default,
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const TEXT_OPERATORS: &[Operator] = &[
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
    Operator::In,
];

/// Free text columns. Every scalar is compared as a string.
#[derive(Debug, Default)]
pub struct TextHandler;

impl FieldHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_operators(&self) -> &[Operator] {
        TEXT_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Number(n) => Ok(Value::String(n.to_string())),
            serde_json::Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(HandlerError::invalid(other, column, "expected text")),
        }
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        compile_default(filter.operator, value, column, false)
    }
}
