use crate::settings::SettingsError;
use field_handlers::HandlerError;
use filter_syntax::ConditionError;
use model::schema::error::SchemaError;
use std::fmt;
use thiserror::Error;

/// Coarse classification of compile failures, stable across error sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RelationNotFound,
    ColumnNotFound,
    TableNotFound,
    UnsupportedOperator,
    InvalidValue,
    MalformedCondition,
    MaxDepthExceeded,
    /// Schema metadata or compiler settings were rejected.
    InvalidConfiguration,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error("Filter on '{path}' rejected: {source}")]
    Handler { path: String, source: HandlerError },

    #[error("Relation '{relation}' not found on table '{table}' (path '{path}')")]
    RelationNotFound {
        table: String,
        relation: String,
        path: String,
    },

    #[error("Relation path '{path}' has {depth} hops, the limit is {limit}")]
    MaxPathDepth {
        path: String,
        depth: usize,
        limit: usize,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl CompileError {
    pub fn handler(path: impl fmt::Display, source: HandlerError) -> Self {
        CompileError::Handler {
            path: path.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Condition(err) => match err {
                ConditionError::RelationNotFound { .. } => ErrorKind::RelationNotFound,
                ConditionError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
                ConditionError::TableNotFound(_) => ErrorKind::TableNotFound,
                ConditionError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
                ConditionError::Malformed { .. } | ConditionError::Syntax(_) => {
                    ErrorKind::MalformedCondition
                }
                ConditionError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            },
            CompileError::Handler { source, .. } => match source {
                HandlerError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
                HandlerError::InvalidValue { .. } => ErrorKind::InvalidValue,
            },
            CompileError::RelationNotFound { .. } => ErrorKind::RelationNotFound,
            CompileError::MaxPathDepth { .. } => ErrorKind::MaxDepthExceeded,
            CompileError::Schema(_) | CompileError::Settings(_) => ErrorKind::InvalidConfiguration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err: CompileError = ConditionError::malformed("$", "bad").into();
        assert_eq!(err.kind(), ErrorKind::MalformedCondition);

        let err = CompileError::handler(
            "film.title",
            HandlerError::InvalidValue {
                value: "x".into(),
                ui_type: "Number".into(),
                column: "length".into(),
                reason: "not a number".into(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert!(err.to_string().starts_with("Filter on 'film.title' rejected"));

        let err: CompileError = SchemaError::DuplicateTable("film".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
