use crate::join::JoinPlan;
use model::core::value::Value;
use query_builder::{
    ast::expr::Expr,
    build::select::SelectBuilder,
    dialect::Dialect,
    render::{LiteralMode, render_with},
    table_ref,
};
use serde::Serialize;

/// The output handed to the query execution layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// Full `select * from ...` statement.
    pub sql: String,
    /// Rendered joins in plan order.
    pub join_clauses: Vec<String>,
    /// Rendered WHERE predicate, absent for an empty filter.
    pub predicate: Option<String>,
    /// Bound literals in placeholder order; empty when literals are inlined.
    pub params: Vec<Value>,
}

pub struct QueryAssembler<'d> {
    dialect: &'d dyn Dialect,
    mode: LiteralMode,
}

impl<'d> QueryAssembler<'d> {
    pub fn new(dialect: &'d dyn Dialect, mode: LiteralMode) -> Self {
        Self { dialect, mode }
    }

    pub fn assemble(&self, plan: &JoinPlan, predicate: Option<Expr>) -> CompiledQuery {
        let join_clauses: Vec<_> = plan.joins.iter().map(|join| join.to_clause()).collect();

        let mut builder = SelectBuilder::new()
            .select(vec![Expr::Wildcard])
            .from(table_ref!(plan.root), None);
        for join in &join_clauses {
            builder = builder.join_clause(join.clone());
        }
        if let Some(predicate) = &predicate {
            builder = builder.where_clause(predicate.clone());
        }
        let (sql, params) = render_with(&builder.build(), self.dialect, self.mode);

        CompiledQuery {
            sql,
            join_clauses: join_clauses
                .iter()
                .map(|join| render_with(join, self.dialect, self.mode).0)
                .collect(),
            predicate: predicate.map(|expr| render_with(&expr, self.dialect, self.mode).0),
            params,
        }
    }
}
