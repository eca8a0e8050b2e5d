use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::generic::compile_default,
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const JSON_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Like,
    Operator::Nlike,
    Operator::Null,
    Operator::NotNull,
    Operator::Blank,
    Operator::NotBlank,
    Operator::Empty,
    Operator::NotEmpty,
];

/// JSON documents, compared through their serialized text.
#[derive(Debug, Default)]
pub struct JsonHandler;

impl FieldHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_operators(&self) -> &[Operator] {
        JSON_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            other => serde_json::to_string(other)
                .map(Value::String)
                .map_err(|e| HandlerError::invalid(other, column, e.to_string())),
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
