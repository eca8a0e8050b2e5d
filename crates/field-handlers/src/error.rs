use model::schema::column::Column;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    #[error("Operation {operator} is not supported for type {ui_type} on column {column}")]
    UnsupportedOperator {
        operator: String,
        ui_type: String,
        column: String,
    },

    #[error("Invalid value {value} for type {ui_type} on column {column}: {reason}")]
    InvalidValue {
        value: String,
        ui_type: String,
        column: String,
        reason: String,
    },
}

impl HandlerError {
    pub fn unsupported(operator: impl Display, column: &Column) -> Self {
        HandlerError::UnsupportedOperator {
            operator: operator.to_string(),
            ui_type: column.ui_type.to_string(),
            column: column.name.clone(),
        }
    }

    pub fn invalid(value: impl Display, column: &Column, reason: impl Into<String>) -> Self {
        HandlerError::InvalidValue {
            value: value.to_string(),
            ui_type: column.ui_type.to_string(),
            column: column.name.clone(),
            reason: reason.into(),
        }
    }
}
