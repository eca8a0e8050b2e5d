use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, convert::Infallible, fmt, str::FromStr};

/// Logical column type. Governs which filter operators make sense for a
/// column, independently of the physical database type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UiType {
    Id,
    ForeignKey,
    SingleLineText,
    LongText,
    Email,
    PhoneNumber,
    Url,
    Number,
    Decimal,
    Currency,
    Percent,
    Rating,
    Duration,
    Year,
    Checkbox,
    SingleSelect,
    MultiSelect,
    Date,
    DateTime,
    Time,
    CreatedTime,
    LastModifiedTime,
    Json,
    /// Any type without a dedicated handler, kept by name.
    Specific(String),
}

lazy_static! {
    static ref UI_TYPE_NAMES: HashMap<&'static str, UiType> = build_ui_type_map();
}

fn build_ui_type_map() -> HashMap<&'static str, UiType> {
    use UiType::*;
    [
        ("id", Id),
        ("foreignkey", ForeignKey),
        ("singlelinetext", SingleLineText),
        ("longtext", LongText),
        ("email", Email),
        ("phonenumber", PhoneNumber),
        ("url", Url),
        ("number", Number),
        ("decimal", Decimal),
        ("currency", Currency),
        ("percent", Percent),
        ("rating", Rating),
        ("duration", Duration),
        ("year", Year),
        ("checkbox", Checkbox),
        ("singleselect", SingleSelect),
        ("multiselect", MultiSelect),
        ("date", Date),
        ("datetime", DateTime),
        ("time", Time),
        ("createdtime", CreatedTime),
        ("lastmodifiedtime", LastModifiedTime),
        ("json", Json),
    ]
    .into_iter()
    .collect()
}

impl UiType {
    pub fn name(&self) -> &str {
        match self {
            UiType::Id => "ID",
            UiType::ForeignKey => "ForeignKey",
            UiType::SingleLineText => "SingleLineText",
            UiType::LongText => "LongText",
            UiType::Email => "Email",
            UiType::PhoneNumber => "PhoneNumber",
            UiType::Url => "URL",
            UiType::Number => "Number",
            UiType::Decimal => "Decimal",
            UiType::Currency => "Currency",
            UiType::Percent => "Percent",
            UiType::Rating => "Rating",
            UiType::Duration => "Duration",
            UiType::Year => "Year",
            UiType::Checkbox => "Checkbox",
            UiType::SingleSelect => "SingleSelect",
            UiType::MultiSelect => "MultiSelect",
            UiType::Date => "Date",
            UiType::DateTime => "DateTime",
            UiType::Time => "Time",
            UiType::CreatedTime => "CreatedTime",
            UiType::LastModifiedTime => "LastModifiedTime",
            UiType::Json => "JSON",
            UiType::Specific(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            UiType::Number
                | UiType::Decimal
                | UiType::Currency
                | UiType::Percent
                | UiType::Rating
                | UiType::Duration
                | UiType::Year
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            UiType::Date
                | UiType::DateTime
                | UiType::Time
                | UiType::CreatedTime
                | UiType::LastModifiedTime
        )
    }
}

impl FromStr for UiType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "");
        Ok(UI_TYPE_NAMES
            .get(normalized.as_str())
            .cloned()
            .unwrap_or_else(|| UiType::Specific(s.trim().to_string())))
    }
}

impl From<String> for UiType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(ui_type) => ui_type,
            Err(never) => match never {},
        }
    }
}

impl From<UiType> for String {
    fn from(ui_type: UiType) -> Self {
        ui_type.name().to_string()
    }
}

impl fmt::Display for UiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!("Time".parse::<UiType>().unwrap(), UiType::Time);
        assert_eq!(
            "single_line_text".parse::<UiType>().unwrap(),
            UiType::SingleLineText
        );
        assert_eq!("URL".parse::<UiType>().unwrap(), UiType::Url);
    }

    #[test]
    fn test_unknown_names_are_kept() {
        let ui_type: UiType = "GeoData".parse().unwrap();
        assert_eq!(ui_type, UiType::Specific("GeoData".into()));
        assert_eq!(ui_type.to_string(), "GeoData");
    }

    #[test]
    fn test_serde_round_trips_through_names() {
        let ui_type: UiType = serde_json::from_str("\"DateTime\"").unwrap();
        assert_eq!(ui_type, UiType::DateTime);
        assert_eq!(serde_json::to_string(&UiType::Json).unwrap(), "\"JSON\"");
    }
}
