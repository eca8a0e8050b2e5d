use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("relation '{relation}' not found on table '{table}'")]
    RelationNotFound { table: String, relation: String },

    #[error("column '{column}' not found on table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("unsupported operator '{operator}' on '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    #[error("malformed condition at '{at}': {reason}")]
    Malformed { at: String, reason: String },

    #[error("{what} depth {depth} exceeds the limit of {limit}")]
    MaxDepthExceeded {
        what: &'static str,
        depth: usize,
        limit: usize,
    },

    #[error("where string syntax error: {0}")]
    Syntax(String),
}

impl ConditionError {
    pub fn malformed(at: impl Into<String>, reason: impl Into<String>) -> Self {
        ConditionError::Malformed {
            at: at.into(),
            reason: reason.into(),
        }
    }
}
