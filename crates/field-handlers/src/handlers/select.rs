use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::generic::{compile_default, compile_set_membership, list},
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const SINGLE_SELECT_OPERATORS: &[Operator] = &[
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
    Operator::AnyOf,
    Operator::NAnyOf,
];

const MULTI_SELECT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Like,
    Operator::Nlike,
    Operator::AnyOf,
    Operator::NAnyOf,
    Operator::AllOf,
    Operator::NAllOf,
    Operator::Empty,
    Operator::NotEmpty,
    Operator::Null,
    Operator::NotNull,
    Operator::Blank,
    Operator::NotBlank,
];

fn parse_option(raw: &serde_json::Value, column: &Column) -> Result<Value, HandlerError> {
    match raw {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Number(n) => Ok(Value::String(n.to_string())),
        serde_json::Value::Array(items) => {
            let options = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => Ok(s.trim().to_string()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    other => Err(HandlerError::invalid(other, column, "expected an option")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::String(options.join(",")))
        }
        other => Err(HandlerError::invalid(other, column, "expected an option")),
    }
}

/// Single option columns. `anyof` / `nanyof` become `in` lists.
#[derive(Debug, Default)]
pub struct SingleSelectHandler;

impl FieldHandler for SingleSelectHandler {
    fn name(&self) -> &'static str {
        "single-select"
    }

    fn supported_operators(&self) -> &[Operator] {
        SINGLE_SELECT_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        parse_option(raw, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        let options = || -> Vec<Expr> { list(value).into_iter().map(Expr::Value).collect() };
        Ok(match filter.operator {
            Operator::AnyOf => column.expr().in_list(options(), false),
            Operator::NAnyOf => Expr::any_of(vec![
                column.expr().in_list(options(), true),
                column.expr().is_null(),
            ]),
            op => compile_default(op, value, column, false)?,
        })
    }
}

/// Comma separated option lists.
#[derive(Debug, Default)]
pub struct MultiSelectHandler;

impl FieldHandler for MultiSelectHandler {
    fn name(&self) -> &'static str {
        "multi-select"
    }

    fn supported_operators(&self) -> &[Operator] {
        MULTI_SELECT_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        parse_option(raw, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        match filter.operator {
            op @ (Operator::AnyOf | Operator::NAnyOf | Operator::AllOf | Operator::NAllOf) => {
                Ok(compile_set_membership(op, &list(value), column))
            }
            op => compile_default(op, value, column, false),
        }
    }
}
