pub mod assembler;
pub mod compiler;
pub mod error;
pub mod join;
pub mod predicate;
pub mod settings;

pub use assembler::CompiledQuery;
pub use compiler::{FilterCompiler, FilterSource};
pub use error::{CompileError, ErrorKind};
pub use settings::{CompilerSettings, SettingsError};
