use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::FieldHandler,
    handlers::{
        generic::compile_default,
        temporal::{Moment, parse_moment},
    },
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use filter_syntax::ast::{node::Comparison, operator::Operator};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const TIME_OPERATORS: &[Operator] = &[
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
];

/// Canonical form stored for time values.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Bare times are placed on this date so they compare as full timestamps.
const TIME_BASE_DATE: (i32, u32, u32) = (1999, 1, 1);

#[derive(Debug, Default)]
pub struct TimeHandler;

impl TimeHandler {
    fn normalize(input: &str) -> Option<String> {
        let input = input.trim();
        let instant = match NaiveTime::parse_from_str(input, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        {
            Ok(time) => {
                let (y, m, d) = TIME_BASE_DATE;
                NaiveDate::from_ymd_opt(y, m, d)?.and_time(time).and_utc()
            }
            Err(_) => match parse_moment(input)? {
                Moment::Instant(t) => t,
                Moment::Day(_) => return None,
            },
        };
        Some(format_time(instant))
    }
}

fn format_time(instant: DateTime<Utc>) -> String {
    instant.format(TIME_FORMAT).to_string()
}

impl FieldHandler for TimeHandler {
    fn name(&self) -> &'static str {
        "time"
    }

    fn supported_operators(&self) -> &[Operator] {
        TIME_OPERATORS
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
            serde_json::Value::String(s) => Self::normalize(s)
                .map(Value::String)
                .ok_or_else(|| HandlerError::invalid(s, column, "not a valid time")),
            other => Err(HandlerError::invalid(other, column, "not a valid time")),
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
    fn test_time_filters() {
        let h = TimeHandler;

        let err = compile_sql(&h, UiType::Time, Operator::Like, json!("14")).unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedOperator { .. }));

        let err = compile_sql(&h, UiType::Time, Operator::Eq, json!("25:99")).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidValue { .. }));

        let sql = compile_sql(&h, UiType::Time, Operator::Eq, json!("14:30")).unwrap();
        assert_eq!(sql, "`c` = '1999-01-01 14:30:00+00:00'");
    }

    #[test]
    fn test_normalize_accepts_seconds_and_datetimes() {
        assert_eq!(
            TimeHandler::normalize("08:05:09").as_deref(),
            Some("1999-01-01 08:05:09+00:00")
        );
        assert_eq!(
            TimeHandler::normalize("2024-05-06T07:08:09+02:00").as_deref(),
            Some("2024-05-06 05:08:09+00:00")
        );
        assert_eq!(TimeHandler::normalize("2024-05-06"), None);
    }

    #[test]
    fn test_time_null_checks() {
        let sql = compile_sql(&TimeHandler, UiType::Time, Operator::Blank, json!(null)).unwrap();
        assert_eq!(sql, "`c` is null");
    }
}
