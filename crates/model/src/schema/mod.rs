pub mod column;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod relation;
pub mod store;
pub mod table;
pub mod ui_type;
