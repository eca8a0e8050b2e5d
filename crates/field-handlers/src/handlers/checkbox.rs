use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::generic::compile_default,
};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const CHECKBOX_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Checked,
    Operator::NotChecked,
    Operator::Null,
    Operator::NotNull,
    Operator::Blank,
    Operator::NotBlank,
];

#[derive(Debug, Default)]
pub struct CheckboxHandler;

impl FieldHandler for CheckboxHandler {
    fn name(&self) -> &'static str {
        "checkbox"
    }

    fn supported_operators(&self) -> &[Operator] {
        CHECKBOX_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        Value::from_json_scalar(raw)
            .and_then(|v| v.as_bool())
            .map(Value::Boolean)
            .ok_or_else(|| HandlerError::invalid(raw, column, "expected a boolean"))
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        _ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        // An unchecked box may be stored as null or false.
        let operator = match (filter.operator, value.single()) {
            (Operator::Eq, Some(Value::Boolean(true))) | (Operator::Neq, Some(Value::Boolean(false))) => {
                Operator::Checked
            }
            (Operator::Eq, Some(Value::Boolean(false))) | (Operator::Neq, Some(Value::Boolean(true))) => {
                Operator::NotChecked
            }
            (op, _) => op,
        };
        compile_default(operator, value, column, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::generic::tests::compile_sql;
    use model::schema::ui_type::UiType;
    use serde_json::json;

    #[test]
    fn test_checkbox_shapes() {
        let sql = |op, v| compile_sql(&CheckboxHandler, UiType::Checkbox, op, v).unwrap();
        assert_eq!(sql(Operator::Checked, json!(null)), "`c` = true");
        assert_eq!(sql(Operator::NotChecked, json!(null)), "(`c` is null or `c` = false)");
        assert_eq!(sql(Operator::Eq, json!("true")), "`c` = true");
        assert_eq!(sql(Operator::Eq, json!(0)), "(`c` is null or `c` = false)");
        assert_eq!(sql(Operator::Neq, json!(false)), "`c` = true");
        assert_eq!(sql(Operator::Eq, json!(null)), "`c` is null");
    }

    #[test]
    fn test_rejects_non_boolean() {
        let err = compile_sql(&CheckboxHandler, UiType::Checkbox, Operator::Eq, json!("maybe")).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidValue { .. }));
        let err = compile_sql(&CheckboxHandler, UiType::Checkbox, Operator::Gt, json!(true)).unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedOperator { .. }));
    }
}
