pub mod ast;
pub mod error;
pub mod parser;
pub mod where_string;

pub use ast::node::{Comparison, ConditionNode, Group, LogicalOp};
pub use error::ConditionError;
pub use parser::{ConditionParser, ParserLimits};
