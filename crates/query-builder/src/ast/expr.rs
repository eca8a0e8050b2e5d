//! Defines the AST for SQL expressions.
//!
//! Nothing here adds parentheses implicitly: grouping is always explicit
//! through [`Expr::Nested`], so the rendered text mirrors the tree exactly.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `users` or `users.id`.
    Identifier(Ident),

    /// A literal value, such as a string, number, boolean, or NULL.
    Value(Value),

    /// A binary comparison, e.g., `column = 'value'`.
    BinaryOp(Box<BinaryOp>),

    /// Operands joined by `and` / `or`. A single operand renders alone.
    Logical {
        op: LogicalOperator,
        operands: Vec<Expr>,
    },

    /// `(expr)`
    Nested(Box<Expr>),

    /// `not expr`. Wrap the operand in [`Expr::Nested`] when it needs grouping.
    Not(Box<Expr>),

    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },

    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        negated: bool,
    },

    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// String concatenation, rendered with the dialect's concat syntax.
    Concat(Vec<Expr>),

    /// `*`
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'users' in 'users.id'
    pub name: String,              // e.g., the 'id' in 'users.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,    // =
    NotEq, // <>
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn equals(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn not_equals(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::NotEq, right)
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn like(self, pattern: Expr, negated: bool) -> Self {
        Expr::Like {
            expr: Box::new(self),
            pattern: Box::new(pattern),
            negated,
        }
    }

    pub fn between(self, low: Expr, high: Expr, negated: bool) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        }
    }

    pub fn in_list(self, list: Vec<Expr>, negated: bool) -> Self {
        Expr::InList {
            expr: Box::new(self),
            list,
            negated,
        }
    }

    pub fn nested(self) -> Self {
        Expr::Nested(Box::new(self))
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn and(operands: Vec<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOperator::And,
            operands,
        }
    }

    pub fn or(operands: Vec<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOperator::Or,
            operands,
        }
    }

    /// `(a or b ...)`, the usual shape of a compound predicate.
    pub fn any_of(operands: Vec<Expr>) -> Self {
        Expr::or(operands).nested()
    }

    /// `(a and b ...)`
    pub fn all_of(operands: Vec<Expr>) -> Self {
        Expr::and(operands).nested()
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Expr::Nested(_))
    }
}
