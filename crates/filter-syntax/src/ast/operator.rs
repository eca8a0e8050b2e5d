use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

/// Comparison operators understood in filter payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Neq,
    Like,
    Nlike,
    Empty,
    NotEmpty,
    Null,
    NotNull,
    Blank,
    NotBlank,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Btw,
    Nbtw,
    AnyOf,
    NAnyOf,
    AllOf,
    NAllOf,
    Checked,
    NotChecked,
    IsWithin,
}

/// Relative-date qualifiers for date comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubOperator {
    Today,
    Tomorrow,
    Yesterday,
    OneWeekAgo,
    OneWeekFromNow,
    OneMonthAgo,
    OneMonthFromNow,
    DaysAgo,
    DaysFromNow,
    ExactDate,
    PastWeek,
    PastMonth,
    PastYear,
    NextWeek,
    NextMonth,
    NextYear,
    PastNumberOfDays,
    NextNumberOfDays,
}

lazy_static! {
    static ref OPERATOR_NAMES: HashMap<&'static str, Operator> = build_operator_map();
    static ref SUB_OPERATOR_NAMES: HashMap<&'static str, SubOperator> = build_sub_operator_map();
}

fn build_operator_map() -> HashMap<&'static str, Operator> {
    use Operator::*;
    [
        ("eq", Eq),
        ("neq", Neq),
        ("not", Neq),
        ("like", Like),
        ("nlike", Nlike),
        ("empty", Empty),
        ("notempty", NotEmpty),
        ("null", Null),
        ("notnull", NotNull),
        ("blank", Blank),
        ("notblank", NotBlank),
        ("gt", Gt),
        ("lt", Lt),
        ("gte", Gte),
        ("ge", Gte),
        ("lte", Lte),
        ("le", Lte),
        ("in", In),
        ("btw", Btw),
        ("nbtw", Nbtw),
        ("anyof", AnyOf),
        ("nanyof", NAnyOf),
        ("allof", AllOf),
        ("nallof", NAllOf),
        ("checked", Checked),
        ("notchecked", NotChecked),
        ("iswithin", IsWithin),
    ]
    .into_iter()
    .collect()
}

fn build_sub_operator_map() -> HashMap<&'static str, SubOperator> {
    use SubOperator::*;
    [
        ("today", Today),
        ("tomorrow", Tomorrow),
        ("yesterday", Yesterday),
        ("oneweekago", OneWeekAgo),
        ("oneweekfromnow", OneWeekFromNow),
        ("onemonthago", OneMonthAgo),
        ("onemonthfromnow", OneMonthFromNow),
        ("daysago", DaysAgo),
        ("daysfromnow", DaysFromNow),
        ("exactdate", ExactDate),
        ("pastweek", PastWeek),
        ("pastmonth", PastMonth),
        ("pastyear", PastYear),
        ("nextweek", NextWeek),
        ("nextmonth", NextMonth),
        ("nextyear", NextYear),
        ("pastnumberofdays", PastNumberOfDays),
        ("nextnumberofdays", NextNumberOfDays),
    ]
    .into_iter()
    .collect()
}

impl Operator {
    /// Looks up an operator by name, ignoring case.
    pub fn lookup(name: &str) -> Option<Operator> {
        OPERATOR_NAMES.get(name.to_lowercase().as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Like => "like",
            Operator::Nlike => "nlike",
            Operator::Empty => "empty",
            Operator::NotEmpty => "notempty",
            Operator::Null => "null",
            Operator::NotNull => "notnull",
            Operator::Blank => "blank",
            Operator::NotBlank => "notblank",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Btw => "btw",
            Operator::Nbtw => "nbtw",
            Operator::AnyOf => "anyof",
            Operator::NAnyOf => "nanyof",
            Operator::AllOf => "allof",
            Operator::NAllOf => "nallof",
            Operator::Checked => "checked",
            Operator::NotChecked => "notchecked",
            Operator::IsWithin => "isWithin",
        }
    }

    /// Operators that ignore the comparison value.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Operator::Empty
                | Operator::NotEmpty
                | Operator::Null
                | Operator::NotNull
                | Operator::Blank
                | Operator::NotBlank
                | Operator::Checked
                | Operator::NotChecked
        )
    }
}

impl SubOperator {
    pub fn lookup(name: &str) -> Option<SubOperator> {
        SUB_OPERATOR_NAMES.get(name.to_lowercase().as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubOperator::Today => "today",
            SubOperator::Tomorrow => "tomorrow",
            SubOperator::Yesterday => "yesterday",
            SubOperator::OneWeekAgo => "oneWeekAgo",
            SubOperator::OneWeekFromNow => "oneWeekFromNow",
            SubOperator::OneMonthAgo => "oneMonthAgo",
            SubOperator::OneMonthFromNow => "oneMonthFromNow",
            SubOperator::DaysAgo => "daysAgo",
            SubOperator::DaysFromNow => "daysFromNow",
            SubOperator::ExactDate => "exactDate",
            SubOperator::PastWeek => "pastWeek",
            SubOperator::PastMonth => "pastMonth",
            SubOperator::PastYear => "pastYear",
            SubOperator::NextWeek => "nextWeek",
            SubOperator::NextMonth => "nextMonth",
            SubOperator::NextYear => "nextYear",
            SubOperator::PastNumberOfDays => "pastNumberOfDays",
            SubOperator::NextNumberOfDays => "nextNumberOfDays",
        }
    }

    /// Sub-operators valid only with `isWithin`.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            SubOperator::PastWeek
                | SubOperator::PastMonth
                | SubOperator::PastYear
                | SubOperator::NextWeek
                | SubOperator::NextMonth
                | SubOperator::NextYear
                | SubOperator::PastNumberOfDays
                | SubOperator::NextNumberOfDays
        )
    }

    /// Sub-operators that read a numeric or date argument from the value.
    pub fn needs_value(&self) -> bool {
        matches!(
            self,
            SubOperator::DaysAgo
                | SubOperator::DaysFromNow
                | SubOperator::ExactDate
                | SubOperator::PastNumberOfDays
                | SubOperator::NextNumberOfDays
        )
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::lookup(s).ok_or_else(|| s.to_string())
    }
}

impl FromStr for SubOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubOperator::lookup(s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SubOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Operator::lookup("not"), Some(Operator::Neq));
        assert_eq!(Operator::lookup("ge"), Some(Operator::Gte));
        assert_eq!(Operator::lookup("isWithin"), Some(Operator::IsWithin));
        assert_eq!(Operator::lookup("contains"), None);
    }

    #[test]
    fn test_sub_operators() {
        let sub: SubOperator = "pastNumberOfDays".parse().unwrap();
        assert!(sub.is_range() && sub.needs_value());
        assert!(!SubOperator::Today.is_range());
        assert_eq!(SubOperator::OneWeekAgo.to_string(), "oneWeekAgo");
    }
}
