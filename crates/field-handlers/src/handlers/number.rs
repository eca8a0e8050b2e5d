use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::generic::compile_default,
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

pub(crate) const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
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
    Operator::Btw,
    Operator::Nbtw,
];

#[derive(Debug, Default)]
pub struct NumberHandler;

impl FieldHandler for NumberHandler {
    fn name(&self) -> &'static str {
        "number"
    }

    fn supported_operators(&self) -> &[Operator] {
        NUMBER_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .ok_or_else(|| HandlerError::invalid(n, column, "number out of range")),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
            serde_json::Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Value::Int)
                    .or_else(|_| s.parse::<f64>().map(Value::Float))
                    .ok()
                    .filter(|v| v.as_f64().is_some_and(f64::is_finite))
                    .ok_or_else(|| HandlerError::invalid(s, column, "not a number"))
            }
            other => Err(HandlerError::invalid(other, column, "not a number")),
        }
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        compile_default(filter.operator, value, column, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::generic::tests::compile_sql;
    use model::schema::ui_type::UiType;
    use serde_json::json;

    #[test]
    fn test_numeric_strings() {
        let sql = compile_sql(&NumberHandler, UiType::Decimal, Operator::Gt, json!(" 2.5 ")).unwrap();
        assert_eq!(sql, "`c` > 2.5");
        let sql = compile_sql(&NumberHandler, UiType::Number, Operator::Btw, json!("1,10")).unwrap();
        assert_eq!(sql, "`c` between 1 and 10");
    }

    #[test]
    fn test_blank_is_null_check() {
        let sql = compile_sql(&NumberHandler, UiType::Currency, Operator::Blank, json!(null)).unwrap();
        assert_eq!(sql, "`c` is null");
        let sql = compile_sql(&NumberHandler, UiType::Currency, Operator::NotEmpty, json!(null)).unwrap();
        assert_eq!(sql, "`c` is not null");
    }

    #[test]
    fn test_errors() {
        let err = compile_sql(&NumberHandler, UiType::Number, Operator::Like, json!("1")).unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedOperator { .. }));
        let err = compile_sql(&NumberHandler, UiType::Number, Operator::Eq, json!("abc")).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidValue { .. }));
        let err = compile_sql(&NumberHandler, UiType::Number, Operator::Btw, json!([1])).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidValue { .. }));
    }
}
