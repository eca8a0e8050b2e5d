//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::value::{DATE_SQL_FORMAT, TIMESTAMP_SQL_FORMAT, Value};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// How a dialect concatenates strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `concat(a, b)`
    Function,
    /// `a || b`
    Operator,
}

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect, doubling any embedded quote.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the zero-based parameter `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    fn kind(&self) -> DialectKind;

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Operator
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders a value as an inline SQL literal.
    fn escape_literal(&self, value: &Value) -> String {
        match value {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => self.quote_string(v),
            Value::Boolean(v) => self.boolean_literal(*v).to_string(),
            Value::Date(v) => self.quote_string(&v.format(DATE_SQL_FORMAT).to_string()),
            Value::Timestamp(v) => {
                self.quote_string(&v.format(TIMESTAMP_SQL_FORMAT).to_string())
            }
            Value::Null => "null".to_string(),
        }
    }
}

fn quote_with(ident: &str, open: char, close: char) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push(open);
    for ch in ident.chars() {
        if ch == close {
            quoted.push(close);
        }
        quoted.push(ch);
    }
    quoted.push(close);
    quoted
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_with(ident, '"', '"')
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_with(ident, '`', '`')
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> String {
        "MySQL".into()
    }

    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Function
    }

    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }
}

#[derive(Debug, Clone)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_with(ident, '`', '`')
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> String {
        "SQLite".into()
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }
}

#[derive(Debug, Clone)]
pub struct MsSql;

impl Dialect for MsSql {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_with(ident, '[', ']')
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("@p{}", index + 1)
    }

    fn name(&self) -> String {
        "SQL Server".into()
    }

    fn kind(&self) -> DialectKind {
        DialectKind::MsSql
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Function
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }
}

#[derive(Debug, Clone)]
pub struct Oracle;

impl Dialect for Oracle {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_with(ident, '"', '"')
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!(":{}", index + 1)
    }

    fn name(&self) -> String {
        "Oracle".into()
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("unsupported dialect '{0}'")]
pub struct UnknownDialect(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DialectKind {
    #[default]
    MySql,
    Postgres,
    Sqlite,
    MsSql,
    Oracle,
}

static MYSQL: MySql = MySql;
static POSTGRES: Postgres = Postgres;
static SQLITE: Sqlite = Sqlite;
static MSSQL: MsSql = MsSql;
static ORACLE: Oracle = Oracle;

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::MySql,
        DialectKind::Postgres,
        DialectKind::Sqlite,
        DialectKind::MsSql,
        DialectKind::Oracle,
    ];

    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::MySql => &MYSQL,
            DialectKind::Postgres => &POSTGRES,
            DialectKind::Sqlite => &SQLITE,
            DialectKind::MsSql => &MSSQL,
            DialectKind::Oracle => &ORACLE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "pg",
            DialectKind::Sqlite => "sqlite",
            DialectKind::MsSql => "mssql",
            DialectKind::Oracle => "oracle",
        }
    }
}

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mysql2" => Ok(DialectKind::MySql),
            "pg" | "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            "sqlite" | "sqlite3" => Ok(DialectKind::Sqlite),
            "mssql" => Ok(DialectKind::MsSql),
            "oracle" | "oracledb" => Ok(DialectKind::Oracle),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

impl TryFrom<String> for DialectKind {
    type Error = UnknownDialect;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DialectKind> for String {
    fn from(kind: DialectKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
