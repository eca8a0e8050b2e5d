use filter_syntax::ParserLimits;
use query_builder::{
    dialect::{DialectKind, UnknownDialect},
    render::LiteralMode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DIALECT_ENV: &str = "FILTER_DIALECT";
pub const MAX_PATH_DEPTH_ENV: &str = "FILTER_MAX_PATH_DEPTH";
pub const MAX_NESTING_DEPTH_ENV: &str = "FILTER_MAX_NESTING_DEPTH";
pub const LITERAL_MODE_ENV: &str = "FILTER_LITERAL_MODE";

/// Errors raised while reading compiler settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Dialect(#[from] UnknownDialect),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    pub dialect: DialectKind,
    /// Maximum number of relation hops in a single path.
    pub max_path_depth: usize,
    /// Maximum depth of `_and`/`_or`/`_not` nesting.
    pub max_nesting_depth: usize,
    pub literal_mode: LiteralMode,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        let limits = ParserLimits::default();
        Self {
            dialect: DialectKind::default(),
            max_path_depth: limits.max_path_depth,
            max_nesting_depth: limits.max_nesting_depth,
            literal_mode: LiteralMode::default(),
        }
    }
}

impl CompilerSettings {
    /// Defaults overridden by the `FILTER_*` environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        if let Some(dialect) = lookup(DIALECT_ENV) {
            self.dialect = dialect.parse()?;
        }
        if let Some(depth) = lookup(MAX_PATH_DEPTH_ENV) {
            self.max_path_depth = parse_limit(MAX_PATH_DEPTH_ENV, &depth)?;
        }
        if let Some(depth) = lookup(MAX_NESTING_DEPTH_ENV) {
            self.max_nesting_depth = parse_limit(MAX_NESTING_DEPTH_ENV, &depth)?;
        }
        if let Some(mode) = lookup(LITERAL_MODE_ENV) {
            self.literal_mode = parse_literal_mode(&mode)?;
        }
        debug!("Compiler settings: {:?}", self);
        Ok(self)
    }

    pub fn limits(&self) -> ParserLimits {
        ParserLimits {
            max_path_depth: self.max_path_depth,
            max_nesting_depth: self.max_nesting_depth,
        }
    }
}

fn parse_limit(key: &'static str, raw: &str) -> Result<usize, SettingsError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "must be at least 1".into(),
        }),
        Ok(limit) => Ok(limit),
        Err(e) => Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

pub fn parse_literal_mode(raw: &str) -> Result<LiteralMode, SettingsError> {
    match raw.trim().to_lowercase().as_str() {
        "inline" => Ok(LiteralMode::Inline),
        "parameterized" | "params" => Ok(LiteralMode::Parameterized),
        _ => Err(SettingsError::InvalidValue {
            key: LITERAL_MODE_ENV,
            value: raw.to_string(),
            reason: "expected 'inline' or 'parameterized'".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.dialect, DialectKind::MySql);
        assert_eq!(settings.max_path_depth, 10);
        assert_eq!(settings.max_nesting_depth, 32);
        assert_eq!(settings.literal_mode, LiteralMode::Inline);
    }

    #[test]
    fn test_overrides() {
        let settings = CompilerSettings::default()
            .with_overrides(lookup(&[
                (DIALECT_ENV, "pg"),
                (MAX_PATH_DEPTH_ENV, "3"),
                (LITERAL_MODE_ENV, "Parameterized"),
            ]))
            .unwrap();
        assert_eq!(settings.dialect, DialectKind::Postgres);
        assert_eq!(settings.limits().max_path_depth, 3);
        assert_eq!(settings.limits().max_nesting_depth, 32);
        assert_eq!(settings.literal_mode, LiteralMode::Parameterized);
    }

    #[test]
    fn test_invalid_overrides() {
        let err = CompilerSettings::default()
            .with_overrides(lookup(&[(MAX_PATH_DEPTH_ENV, "0")]))
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));

        let err = CompilerSettings::default()
            .with_overrides(lookup(&[(DIALECT_ENV, "db2")]))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Dialect(_)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings: CompilerSettings =
            serde_json::from_str(r#"{"dialect": "sqlite", "literal_mode": "parameterized"}"#)
                .unwrap();
        assert_eq!(settings.dialect, DialectKind::Sqlite);
        assert_eq!(settings.max_path_depth, 10);
        assert_eq!(settings.literal_mode, LiteralMode::Parameterized);
    }
}
