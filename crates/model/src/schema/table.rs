use crate::{
    core::identifiers::TableId,
    schema::column::Column,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            id: TableId::new(name),
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<TableId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key())
    }
}
