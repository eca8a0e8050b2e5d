//! Defines the core rendering trait and context for converting AST to SQL.

use crate::dialect::Dialect;
use model::core::value::Value;
use serde::{Deserialize, Serialize};

pub mod expr;
pub mod select;

/// How literal values end up in the rendered SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralMode {
    /// Escaped and embedded in the SQL text.
    #[default]
    Inline,
    /// Replaced by dialect placeholders and collected as parameters.
    Parameterized,
}

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    pub mode: LiteralMode,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self::with_mode(dialect, LiteralMode::Inline)
    }

    pub fn with_mode(dialect: &'a dyn Dialect, mode: LiteralMode) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            mode,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        match self.mode {
            LiteralMode::Inline => {
                let literal = self.dialect.escape_literal(&value);
                self.sql.push_str(&literal);
            }
            LiteralMode::Parameterized => {
                self.params.push(value);
                let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
                self.sql.push_str(&placeholder);
            }
        }
    }

    pub fn push_ident(&mut self, ident: &str) {
        let quoted = self.dialect.quote_identifier(ident);
        self.sql.push_str(&quoted);
    }
}

/// Renders a single node with a fresh renderer.
pub fn render_with(
    node: &impl Render,
    dialect: &dyn Dialect,
    mode: LiteralMode,
) -> (String, Vec<Value>) {
    let mut renderer = Renderer::with_mode(dialect, mode);
    node.render(&mut renderer);
    renderer.finish()
}
