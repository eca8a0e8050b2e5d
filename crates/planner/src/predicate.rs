//! Validation and WHERE compilation of condition trees.

use crate::{error::CompileError, join::JoinPlan};
use field_handlers::{
    ColumnRef, CompileContext, FieldHandler, FilterValue, HandlerRegistry,
};
use filter_syntax::{
    Comparison, ConditionError, ConditionNode, Group, LogicalOp,
};
use model::schema::{column::Column, graph::SchemaGraph};
use query_builder::ast::expr::{Expr, LogicalOperator};
use tracing::{debug, warn};

/// A comparison whose column, handler and value have been checked.
pub struct ValidatedComparison<'a> {
    pub comparison: Comparison,
    pub column: &'a Column,
    pub handler: &'a dyn FieldHandler,
    pub value: FilterValue,
}

/// Resolves every leaf's column and handler, then runs `verify_filter` and
/// value parsing. Fails on the first rejected leaf.
pub fn validate<'a>(
    tree: ConditionNode,
    graph: &'a SchemaGraph,
    registry: &'a HandlerRegistry,
) -> Result<ConditionNode<ValidatedComparison<'a>>, CompileError> {
    tree.try_map(&mut |comparison: Comparison| -> Result<ValidatedComparison<'a>, CompileError> {
        let column = graph
            .column(&comparison.table, &comparison.path.column)
            .ok_or_else(|| ConditionError::ColumnNotFound {
                table: comparison.table.clone(),
                column: comparison.path.column.clone(),
            })?;
        let handler = registry.handler_for(&column.ui_type);

        let checked = handler
            .verify_filter(&comparison, column)
            .and_then(|_| handler.parse_filter_value(&comparison, column));
        let value = match checked {
            Ok(value) => value,
            Err(err) => {
                warn!("Rejected filter on '{}': {}", comparison.path, err);
                return Err(CompileError::handler(&comparison.path, err));
            }
        };

        Ok(ValidatedComparison {
            comparison,
            column,
            handler,
            value,
        })
    })
}

pub struct PredicateCompiler<'p> {
    plan: &'p JoinPlan,
    ctx: &'p CompileContext,
}

impl<'p> PredicateCompiler<'p> {
    pub fn new(plan: &'p JoinPlan, ctx: &'p CompileContext) -> Self {
        Self { plan, ctx }
    }

    /// Compiles the root node. The root group is emitted without its own
    /// parentheses; an empty root yields no predicate.
    pub fn compile(
        &self,
        root: &ConditionNode<ValidatedComparison>,
    ) -> Result<Option<Expr>, CompileError> {
        let expr = match root {
            ConditionNode::Group(group) if group.children.is_empty() => return Ok(None),
            ConditionNode::Group(group) => self.group(group)?,
            node => self.node(node)?,
        };
        Ok(Some(expr))
    }

    fn node(&self, node: &ConditionNode<ValidatedComparison>) -> Result<Expr, CompileError> {
        match node {
            ConditionNode::Comparison(leaf) => self.leaf(leaf),
            ConditionNode::Group(group) if group.children.is_empty() => Err(
                ConditionError::malformed("group", "empty condition group").into(),
            ),
            ConditionNode::Group(group) => Ok(self.group(group)?.nested()),
            ConditionNode::Negation(child) => {
                let inner = self.node(child)?;
                let inner = if inner.is_nested() { inner } else { inner.nested() };
                Ok(inner.negate())
            }
        }
    }

    fn group(&self, group: &Group<ValidatedComparison>) -> Result<Expr, CompileError> {
        let operands = group
            .children
            .iter()
            .map(|child| self.node(child))
            .collect::<Result<Vec<_>, _>>()?;
        let op = match group.logic {
            LogicalOp::And => LogicalOperator::And,
            LogicalOp::Or => LogicalOperator::Or,
        };
        Ok(Expr::Logical { op, operands })
    }

    fn leaf(&self, leaf: &ValidatedComparison) -> Result<Expr, CompileError> {
        let path = &leaf.comparison.path;
        let qualifier = self.plan.qualifier(path.prefix());
        if qualifier.is_none() && !path.prefix().is_empty() {
            return Err(CompileError::RelationNotFound {
                table: leaf.comparison.table.clone(),
                relation: path.prefix().join("."),
                path: path.to_string(),
            });
        }

        debug!(
            "Compiling '{}' {} with the {} handler",
            path,
            leaf.comparison.operator,
            leaf.handler.name()
        );
        leaf.handler
            .compile_filter(
                &leaf.comparison,
                &leaf.value,
                &ColumnRef::new(leaf.column, qualifier),
                self.ctx,
            )
            .map_err(|err| CompileError::handler(path, err))
    }
}
