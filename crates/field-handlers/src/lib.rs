pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::{ColumnRef, CompileContext, FilterValue};
pub use error::HandlerError;
pub use handler::FieldHandler;
pub use registry::HandlerRegistry;
