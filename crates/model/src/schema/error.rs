use thiserror::Error;

/// Errors raised while loading schema metadata into a [`SchemaGraph`].
///
/// [`SchemaGraph`]: crate::schema::graph::SchemaGraph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("duplicate table '{0}'")]
    DuplicateTable(String),

    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("duplicate relation '{relation}' on table '{table}'")]
    DuplicateRelation { table: String, relation: String },

    #[error("relation '{relation}' references unknown table '{table}'")]
    UnknownTable { relation: String, table: String },

    #[error("relation '{relation}' references unknown column '{table}.{column}'")]
    UnknownColumn {
        relation: String,
        table: String,
        column: String,
    },

    #[error("many-to-many relation '{0}' has no junction table")]
    MissingJunction(String),

    #[error("relation '{0}' declares a junction table but is not many-to-many")]
    UnexpectedJunction(String),

    #[error("invalid relation type '{value}' on relation '{relation}'")]
    InvalidRelationType { relation: String, value: String },
}
