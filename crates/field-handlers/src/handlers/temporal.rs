//! Date and date-time columns, including relative-date sub-operators.
//!
//! Sub-operators resolve to an anchor day relative to
//! [`CompileContext::now`]. Date-time comparisons against a bare day cover the
//! whole day: `eq` becomes a `between` on the day bounds, `gt` compares with
//! the end of the day and `gte` with its start. A value carrying a time of day
//! is compared exactly.

use crate::{
    context::{ColumnRef, CompileContext, FilterValue},
    error::HandlerError,
    handler::{FieldHandler, verify_supported},
    handlers::generic::{comparison_operator, compile_default},
};
use chrono::{
    DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc,
};
use filter_syntax::ast::{
    node::Comparison,
    operator::{Operator, SubOperator},
};
use model::{core::value::Value, schema::column::Column};
use query_builder::ast::expr::Expr;

const TEMPORAL_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Neq,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
    Operator::Null,
    Operator::NotNull,
    Operator::Blank,
    Operator::NotBlank,
    Operator::Empty,
    Operator::NotEmpty,
    Operator::IsWithin,
];

const TEMPORAL_SUB_OPERATORS: &[SubOperator] = &[
    SubOperator::Today,
    SubOperator::Tomorrow,
    SubOperator::Yesterday,
    SubOperator::OneWeekAgo,
    SubOperator::OneWeekFromNow,
    SubOperator::OneMonthAgo,
    SubOperator::OneMonthFromNow,
    SubOperator::DaysAgo,
    SubOperator::DaysFromNow,
    SubOperator::ExactDate,
    SubOperator::PastWeek,
    SubOperator::PastMonth,
    SubOperator::PastYear,
    SubOperator::NextWeek,
    SubOperator::NextMonth,
    SubOperator::NextYear,
    SubOperator::PastNumberOfDays,
    SubOperator::NextNumberOfDays,
];

/// A parsed date input: a bare day or an exact instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Moment {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

/// Parses ISO dates and datetimes. Datetimes without offset are taken as UTC.
pub(crate) fn parse_moment(input: &str) -> Option<Moment> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(Moment::Instant(dt.with_timezone(&Utc)));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(Moment::Instant(dt.with_timezone(&Utc)));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Moment::Instant(dt.and_utc()));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(Moment::Day)
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(day: NaiveDate) -> DateTime<Utc> {
    day_start(day) + Duration::seconds(86_399)
}

/// Day of the comparison plus the exact instant when the input had one.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    day: NaiveDate,
    exact: Option<DateTime<Utc>>,
}

fn shift_days(day: NaiveDate, days: i64) -> Option<NaiveDate> {
    day.checked_add_signed(Duration::try_days(days)?)
}

fn shift_months(day: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        day.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        day.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

fn count_arg(value: &FilterValue) -> Option<i64> {
    match value.single() {
        Some(Value::Int(n)) => Some(*n),
        _ => None,
    }
}

fn resolve_anchor(
    filter: &Comparison,
    value: &FilterValue,
    column: &Column,
    ctx: &CompileContext,
) -> Result<Option<Anchor>, HandlerError> {
    let today = ctx.now.date_naive();
    let day_anchor = |day: Option<NaiveDate>| {
        day.map(|day| Some(Anchor { day, exact: None }))
            .ok_or_else(|| HandlerError::invalid(filter.value.clone(), column, "date out of range"))
    };

    let Some(sub) = filter.sub_operator else {
        return Ok(match value.single() {
            Some(Value::Date(day)) => Some(Anchor {
                day: *day,
                exact: None,
            }),
            Some(Value::Timestamp(t)) => Some(Anchor {
                day: t.date_naive(),
                exact: Some(*t),
            }),
            _ => None,
        });
    };

    let count = || {
        count_arg(value)
            .ok_or_else(|| HandlerError::invalid(filter.value.clone(), column, "a day count is required"))
    };

    match sub {
        SubOperator::Today => day_anchor(Some(today)),
        SubOperator::Tomorrow => day_anchor(shift_days(today, 1)),
        SubOperator::Yesterday => day_anchor(shift_days(today, -1)),
        SubOperator::OneWeekAgo | SubOperator::PastWeek => day_anchor(shift_days(today, -7)),
        SubOperator::OneWeekFromNow | SubOperator::NextWeek => day_anchor(shift_days(today, 7)),
        SubOperator::OneMonthAgo | SubOperator::PastMonth => day_anchor(shift_months(today, -1)),
        SubOperator::OneMonthFromNow | SubOperator::NextMonth => day_anchor(shift_months(today, 1)),
        SubOperator::PastYear => day_anchor(shift_months(today, -12)),
        SubOperator::NextYear => day_anchor(shift_months(today, 12)),
        SubOperator::DaysAgo | SubOperator::PastNumberOfDays => day_anchor(shift_days(today, -count()?)),
        SubOperator::DaysFromNow | SubOperator::NextNumberOfDays => day_anchor(shift_days(today, count()?)),
        SubOperator::ExactDate => match value.single() {
            Some(Value::Date(day)) => day_anchor(Some(*day)),
            Some(Value::Timestamp(t)) => day_anchor(Some(t.date_naive())),
            _ => Err(HandlerError::invalid(filter.value.clone(), column, "a date is required")),
        },
    }
}

/// Shared checks for `isWithin` and sub-operator pairing.
fn verify_temporal<H: FieldHandler + ?Sized>(
    handler: &H,
    filter: &Comparison,
    column: &Column,
) -> Result<(), HandlerError> {
    verify_supported(handler, filter, column)?;
    let range_sub = filter.sub_operator.map(|sub| sub.is_range());
    match (filter.operator, range_sub) {
        (Operator::IsWithin, Some(true)) => Ok(()),
        (Operator::IsWithin, _) => Err(HandlerError::unsupported(
            "isWithin without a range sub-operator",
            column,
        )),
        (op, Some(true)) => Err(HandlerError::unsupported(
            format!("{op} with a range sub-operator"),
            column,
        )),
        (op, Some(false)) if op.is_unary() => Err(HandlerError::unsupported(
            format!("{op} with a sub-operator"),
            column,
        )),
        _ => Ok(()),
    }
}

fn temporal_filter_value<H: FieldHandler + ?Sized>(
    handler: &H,
    filter: &Comparison,
    column: &Column,
) -> Result<FilterValue, HandlerError> {
    if filter.operator.is_unary() {
        return Ok(FilterValue::Absent);
    }
    match filter.sub_operator {
        Some(SubOperator::ExactDate) | None if filter.value.is_null() => {
            if filter.sub_operator.is_some() {
                Err(HandlerError::invalid("null", column, "a date is required"))
            } else {
                Ok(FilterValue::Single(Value::Null))
            }
        }
        Some(SubOperator::ExactDate) | None => Ok(FilterValue::Single(
            handler.parse_user_input(&filter.value, column)?,
        )),
        Some(sub) if sub.needs_value() => {
            let count = match &filter.value {
                serde_json::Value::Number(n) => n.as_i64(),
                serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .filter(|n| *n >= 0)
            .ok_or_else(|| {
                HandlerError::invalid(&filter.value, column, "expected a non-negative day count")
            })?;
            Ok(FilterValue::Single(Value::Int(count)))
        }
        Some(_) => Ok(FilterValue::Absent),
    }
}

#[derive(Debug, Default)]
pub struct DateHandler;

impl FieldHandler for DateHandler {
    fn name(&self) -> &'static str {
        "date"
    }

    fn supported_operators(&self) -> &[Operator] {
        TEMPORAL_OPERATORS
    }

    fn supported_sub_operators(&self) -> &[SubOperator] {
        TEMPORAL_SUB_OPERATORS
    }

    fn verify_filter(&self, filter: &Comparison, column: &Column) -> Result<(), HandlerError> {
        verify_temporal(self, filter, column)
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => match parse_moment(s) {
                Some(Moment::Day(day)) => Ok(Value::Date(day)),
                Some(Moment::Instant(t)) => Ok(Value::Date(t.date_naive())),
                None => Err(HandlerError::invalid(s, column, "not a date")),
            },
            other => Err(HandlerError::invalid(other, column, "not a date")),
        }
    }

    fn parse_filter_value(
        &self,
        filter: &Comparison,
        column: &Column,
    ) -> Result<FilterValue, HandlerError> {
        temporal_filter_value(self, filter, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        let Some(anchor) = resolve_anchor(filter, value, column.column, ctx)? else {
            return compile_default(filter.operator, value, column, true);
        };
        let c = column.expr();
        let day = Expr::Value(Value::Date(anchor.day));
        let today = ctx.now.date_naive();

        Ok(match filter.operator {
            Operator::IsWithin if anchor.day <= today => {
                c.between(day, Expr::Value(Value::Date(today)), false)
            }
            Operator::IsWithin => c.between(Expr::Value(Value::Date(today)), day, false),
            Operator::Neq => Expr::any_of(vec![c.clone().not_equals(day), c.is_null()]),
            op => compare(c, op, day),
        })
    }
}

/// DateTime, CreatedTime and LastModifiedTime columns.
#[derive(Debug, Default)]
pub struct DateTimeHandler;

impl FieldHandler for DateTimeHandler {
    fn name(&self) -> &'static str {
        "date-time"
    }

    fn supported_operators(&self) -> &[Operator] {
        TEMPORAL_OPERATORS
    }

    fn supported_sub_operators(&self) -> &[SubOperator] {
        TEMPORAL_SUB_OPERATORS
    }

    fn verify_filter(&self, filter: &Comparison, column: &Column) -> Result<(), HandlerError> {
        verify_temporal(self, filter, column)
    }

    fn parse_user_input(
        &self,
        raw: &serde_json::Value,
        column: &Column,
    ) -> Result<Value, HandlerError> {
        match raw {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
            serde_json::Value::String(s) => match parse_moment(s) {
                Some(Moment::Day(day)) => Ok(Value::Date(day)),
                Some(Moment::Instant(t)) => Ok(Value::Timestamp(t)),
                None => Err(HandlerError::invalid(s, column, "not a date-time")),
            },
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(Value::Timestamp)
                .ok_or_else(|| HandlerError::invalid(n, column, "not a unix timestamp")),
            other => Err(HandlerError::invalid(other, column, "not a date-time")),
        }
    }

    fn parse_filter_value(
        &self,
        filter: &Comparison,
        column: &Column,
    ) -> Result<FilterValue, HandlerError> {
        temporal_filter_value(self, filter, column)
    }

    fn compile_filter(
        &self,
        filter: &Comparison,
        value: &FilterValue,
        column: &ColumnRef,
        ctx: &CompileContext,
    ) -> Result<Expr, HandlerError> {
        let Some(anchor) = resolve_anchor(filter, value, column.column, ctx)? else {
            return compile_default(filter.operator, value, column, true);
        };
        let c = column.expr();
        let ts = |t: DateTime<Utc>| Expr::Value(Value::Timestamp(t));
        let start = day_start(anchor.day);
        let end = day_end(anchor.day);
        let today = ctx.now.date_naive();

        Ok(match filter.operator {
            Operator::IsWithin if anchor.day <= today => {
                c.between(ts(start), ts(day_end(today)), false)
            }
            Operator::IsWithin => c.between(ts(day_start(today)), ts(end), false),
            Operator::Eq => match anchor.exact {
                Some(t) => c.equals(ts(t)),
                None => c.between(ts(start), ts(end), false),
            },
            Operator::Neq => match anchor.exact {
                Some(t) => Expr::any_of(vec![c.clone().not_equals(ts(t)), c.is_null()]),
                None => Expr::any_of(vec![
                    compare(c.clone(), Operator::Lt, ts(start)),
                    compare(c.clone(), Operator::Gt, ts(end)),
                    c.is_null(),
                ]),
            },
            Operator::Gt => compare(c, Operator::Gt, ts(anchor.exact.unwrap_or(end))),
            Operator::Gte => compare(c, Operator::Gte, ts(anchor.exact.unwrap_or(start))),
            Operator::Lt => compare(c, Operator::Lt, ts(anchor.exact.unwrap_or(start))),
            Operator::Lte => compare(c, Operator::Lte, ts(anchor.exact.unwrap_or(end))),
            op => return compile_default(op, value, column, true),
        })
    }
}

fn compare(left: Expr, operator: Operator, right: Expr) -> Expr {
    Expr::binary(left, comparison_operator(operator), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::generic::tests::{comparison, compile_sql_at};
    use chrono::TimeZone;
    use model::schema::ui_type::UiType;
    use serde_json::json;

    fn ctx() -> CompileContext {
        CompileContext::at(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
    }

    fn with_sub(operator: Operator, sub: SubOperator, value: serde_json::Value) -> Comparison {
        Comparison {
            sub_operator: Some(sub),
            ..comparison(operator, value)
        }
    }

    #[test]
    fn test_parse_moment() {
        assert_eq!(
            parse_moment("2024-01-02"),
            Some(Moment::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()))
        );
        assert_eq!(
            parse_moment("2024-01-02T10:00:00+02:00"),
            Some(Moment::Instant(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()))
        );
        assert_eq!(
            parse_moment("2024-01-02 10:00"),
            Some(Moment::Instant(Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()))
        );
        assert_eq!(parse_moment("yesterday"), None);
    }

    #[test]
    fn test_datetime_eq_covers_the_day() {
        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            comparison(Operator::Eq, json!("2024-01-02")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` between '2024-01-02 00:00:00' and '2024-01-02 23:59:59'");
    }

    #[test]
    fn test_datetime_exact_time_comparison() {
        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::CreatedTime,
            comparison(Operator::Gt, json!("2024-01-02 08:15:00")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` > '2024-01-02 08:15:00'");

        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::CreatedTime,
            comparison(Operator::Gt, json!("2024-01-02")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` > '2024-01-02 23:59:59'");
    }

    #[test]
    fn test_datetime_eq_neq_with_time_of_day_are_exact() {
        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            comparison(Operator::Eq, json!("2024-01-02 08:00:00")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` = '2024-01-02 08:00:00'");

        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            comparison(Operator::Neq, json!("2024-01-02T08:00:00Z")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "(`c` <> '2024-01-02 08:00:00' or `c` is null)");

        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            comparison(Operator::Neq, json!("2024-01-02")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(
            sql,
            "(`c` < '2024-01-02 00:00:00' or `c` > '2024-01-02 23:59:59' or `c` is null)"
        );
    }

    #[test]
    fn test_relative_sub_operators() {
        let sql = compile_sql_at(
            &DateHandler,
            UiType::Date,
            with_sub(Operator::Eq, SubOperator::DaysAgo, json!(3)),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` = '2024-03-12'");

        let sql = compile_sql_at(
            &DateHandler,
            UiType::Date,
            with_sub(Operator::Lt, SubOperator::OneMonthFromNow, json!(null)),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` < '2024-04-15'");
    }

    #[test]
    fn test_is_within() {
        let sql = compile_sql_at(
            &DateHandler,
            UiType::Date,
            with_sub(Operator::IsWithin, SubOperator::PastWeek, json!(null)),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` between '2024-03-08' and '2024-03-15'");

        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            with_sub(Operator::IsWithin, SubOperator::NextNumberOfDays, json!("2")),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` between '2024-03-15 00:00:00' and '2024-03-17 23:59:59'");
    }

    #[test]
    fn test_sub_operator_pairing() {
        let err = compile_sql_at(
            &DateHandler,
            UiType::Date,
            comparison(Operator::IsWithin, json!("2024-01-01")),
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedOperator { .. }));

        let err = compile_sql_at(
            &DateHandler,
            UiType::Date,
            with_sub(Operator::Eq, SubOperator::PastYear, json!(null)),
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, HandlerError::UnsupportedOperator { .. }));

        let err = compile_sql_at(
            &DateHandler,
            UiType::Date,
            with_sub(Operator::Eq, SubOperator::DaysAgo, json!("many")),
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidValue { .. }));
    }

    #[test]
    fn test_null_value_falls_back_to_null_check() {
        let sql = compile_sql_at(
            &DateTimeHandler,
            UiType::DateTime,
            comparison(Operator::Eq, json!(null)),
            &ctx(),
        )
        .unwrap();
        assert_eq!(sql, "`c` is null");
    }
}
