pub mod node;
pub mod operator;
pub mod path;
