use crate::{core::identifiers::ColumnId, schema::ui_type::UiType};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ColumnFlags: u8 {
        const PRIMARY_KEY    = 0b0001;
        const REQUIRED       = 0b0010;
        const UNIQUE         = 0b0100;
        const AUTO_INCREMENT = 0b1000;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub ui_type: UiType,
    /// Physical database type, e.g. `varchar`, `time`, `int unsigned`.
    pub db_type: String,
    pub flags: ColumnFlags,
}

impl Column {
    pub fn new(name: &str, ui_type: UiType) -> Self {
        Self {
            id: ColumnId::new(name),
            name: name.to_string(),
            ui_type,
            db_type: String::new(),
            flags: ColumnFlags::empty(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ColumnId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_db_type(mut self, db_type: &str) -> Self {
        self.db_type = db_type.to_string();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.flags |= ColumnFlags::PRIMARY_KEY | ColumnFlags::REQUIRED;
        self
    }

    pub fn required(mut self) -> Self {
        self.flags |= ColumnFlags::REQUIRED;
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags.contains(ColumnFlags::PRIMARY_KEY)
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(ColumnFlags::REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_implies_required() {
        let col = Column::new("country_id", UiType::Id).primary_key();
        assert!(col.is_primary_key());
        assert!(col.is_required());
        assert_eq!(col.id.as_str(), "country_id");
    }
}
