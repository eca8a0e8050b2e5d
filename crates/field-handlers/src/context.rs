use chrono::{DateTime, Utc};
use model::{core::value::Value, schema::column::Column};
use query_builder::{ast::expr::Expr, ident};

/// Per-compilation inputs that are not part of the filter itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompileContext {
    /// Reference instant for relative date filters.
    pub now: DateTime<Utc>,
}

impl CompileContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for CompileContext {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}

/// A column as it appears in the compiled query.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef<'a> {
    pub column: &'a Column,
    /// Table name or join alias; `None` leaves the column unqualified.
    pub qualifier: Option<&'a str>,
}

impl<'a> ColumnRef<'a> {
    pub fn new(column: &'a Column, qualifier: Option<&'a str>) -> Self {
        Self { column, qualifier }
    }

    pub fn expr(&self) -> Expr {
        ident!(self.qualifier, &self.column.name)
    }
}

/// Filter value after `parse_user_input`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    /// Operators such as `null` or `checked` take no value.
    #[default]
    Absent,
    Single(Value),
    List(Vec<Value>),
}

impl FilterValue {
    pub fn single(&self) -> Option<&Value> {
        match self {
            FilterValue::Single(v) => Some(v),
            _ => None,
        }
    }

    /// Bound literals in order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            FilterValue::Absent => Vec::new(),
            FilterValue::Single(v) => vec![v],
            FilterValue::List(list) => list.iter().collect(),
        }
    }
}
