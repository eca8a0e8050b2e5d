use crate::ast::{
    operator::{Operator, SubOperator},
    path::FieldPath,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A single column comparison as written by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub path: FieldPath,
    /// Table that owns `path.column`.
    pub table: String,
    pub operator: Operator,
    pub sub_operator: Option<SubOperator>,
    /// Raw, unvalidated value.
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group<L> {
    pub logic: LogicalOp,
    pub children: Vec<ConditionNode<L>>,
}

/// Canonical filter tree, generic over the leaf payload so later passes can
/// swap raw comparisons for validated ones without a second tree type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode<L = Comparison> {
    Comparison(L),
    Group(Group<L>),
    Negation(Box<ConditionNode<L>>),
}

impl<L> Group<L> {
    pub fn and(children: Vec<ConditionNode<L>>) -> Self {
        Self {
            logic: LogicalOp::And,
            children,
        }
    }

    pub fn or(children: Vec<ConditionNode<L>>) -> Self {
        Self {
            logic: LogicalOp::Or,
            children,
        }
    }
}

impl<L> ConditionNode<L> {
    pub fn negate(self) -> Self {
        ConditionNode::Negation(Box::new(self))
    }

    /// Visits leaves depth-first, left to right.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a L)) {
        match self {
            ConditionNode::Comparison(leaf) => f(leaf),
            ConditionNode::Group(group) => {
                for child in &group.children {
                    child.for_each_leaf(f);
                }
            }
            ConditionNode::Negation(child) => child.for_each_leaf(f),
        }
    }

    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.for_each_leaf(&mut |leaf| out.push(leaf));
        out
    }

    /// Rebuilds the tree with every leaf mapped through `f`, keeping shape.
    pub fn try_map<M, E>(
        self,
        f: &mut impl FnMut(L) -> Result<M, E>,
    ) -> Result<ConditionNode<M>, E> {
        Ok(match self {
            ConditionNode::Comparison(leaf) => ConditionNode::Comparison(f(leaf)?),
            ConditionNode::Group(group) => ConditionNode::Group(Group {
                logic: group.logic,
                children: group
                    .children
                    .into_iter()
                    .map(|child| child.try_map(f))
                    .collect::<Result<_, _>>()?,
            }),
            ConditionNode::Negation(child) => ConditionNode::Negation(Box::new(child.try_map(f)?)),
        })
    }

    /// Depth of logical nesting (groups and negations below the root).
    pub fn nesting_depth(&self) -> usize {
        match self {
            ConditionNode::Comparison(_) => 0,
            ConditionNode::Group(group) => group
                .children
                .iter()
                .map(|c| c.nesting_depth() + 1)
                .max()
                .unwrap_or(0),
            ConditionNode::Negation(child) => child.nesting_depth() + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConditionNode::Group(group) if group.children.is_empty())
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Or => write!(f, "or"),
        }
    }
}
