//! Join planning for relation paths.
//!
//! Every distinct path prefix gets its own chain of joins. Aliases are
//! `<table><n>` with one counter per table, so two edges into the same table
//! never share an alias while two leaves on the same prefix always do.

use crate::error::CompileError;
use filter_syntax::ast::path::FieldPath;
use model::schema::{
    graph::SchemaGraph,
    relation::{RelationEdge, RelationKind},
};
use query_builder::{
    ast::{common::JoinKind, expr::Expr, select::JoinClause},
    qualified, table_ref,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A column reference in a join condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumn {
    /// Root table name or join alias.
    pub qualifier: String,
    pub column: String,
}

impl JoinColumn {
    fn new(qualifier: &str, column: &str) -> Self {
        Self {
            qualifier: qualifier.to_string(),
            column: column.to_string(),
        }
    }

    pub fn expr(&self) -> Expr {
        qualified(&self.qualifier, &self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub table: String,
    pub alias: String,
    pub left: JoinColumn,
    pub right: JoinColumn,
    pub kind: JoinKind,
    /// Relation hops that led to this join.
    pub prefix: Vec<String>,
}

impl JoinSpec {
    pub fn on(&self) -> Expr {
        self.left.expr().equals(self.right.expr())
    }

    pub fn to_clause(&self) -> JoinClause {
        JoinClause {
            kind: self.kind,
            table: table_ref!(self.table),
            alias: Some(self.alias.clone()),
            on: self.on(),
        }
    }
}

/// Ordered joins plus the alias of every planned path prefix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinPlan {
    pub root: String,
    pub joins: Vec<JoinSpec>,
    pub(crate) aliases: HashMap<Vec<String>, String>,
}

impl JoinPlan {
    pub fn alias_for(&self, prefix: &[String]) -> Option<&str> {
        self.aliases.get(prefix).map(String::as_str)
    }

    /// Qualifier for a column reached through `prefix`.
    ///
    /// Root columns stay unqualified until the plan has joins.
    pub fn qualifier(&self, prefix: &[String]) -> Option<&str> {
        if prefix.is_empty() {
            return (!self.joins.is_empty()).then_some(self.root.as_str());
        }
        self.alias_for(prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }
}

pub struct JoinPlanner<'g> {
    graph: &'g SchemaGraph,
    max_path_depth: usize,
}

impl<'g> JoinPlanner<'g> {
    pub fn new(graph: &'g SchemaGraph, max_path_depth: usize) -> Self {
        Self {
            graph,
            max_path_depth,
        }
    }

    /// Plans joins for `paths`, in first-seen order of their prefixes.
    pub fn plan<'p>(
        &self,
        root: &str,
        paths: impl IntoIterator<Item = &'p FieldPath>,
    ) -> Result<JoinPlan, CompileError> {
        let mut builder = PlanBuilder {
            plan: JoinPlan {
                root: root.to_string(),
                ..JoinPlan::default()
            },
            counters: HashMap::new(),
            taken: self
                .graph
                .tables()
                .iter()
                .map(|table| table.name.clone())
                .chain(std::iter::once(root.to_string()))
                .collect(),
        };

        for path in paths {
            if path.depth() > self.max_path_depth {
                warn!("Rejected path '{}' deeper than {}", path, self.max_path_depth);
                return Err(CompileError::MaxPathDepth {
                    path: path.to_string(),
                    depth: path.depth(),
                    limit: self.max_path_depth,
                });
            }
            self.walk(&mut builder, path)?;
        }

        debug!(
            "Planned {} joins for '{}' ({} aliased prefixes)",
            builder.plan.joins.len(),
            root,
            builder.plan.aliases.len()
        );
        Ok(builder.plan)
    }

    fn walk(&self, builder: &mut PlanBuilder, path: &FieldPath) -> Result<(), CompileError> {
        let mut table = builder.plan.root.clone();
        let mut parent = builder.plan.root.clone();

        for depth in 1..=path.depth() {
            let prefix = &path.relations[..depth];
            let hop = &prefix[depth - 1];
            let edge = self.graph.relation(&table, hop).ok_or_else(|| {
                warn!("Relation '{}' not found on '{}'", hop, table);
                CompileError::RelationNotFound {
                    table: table.clone(),
                    relation: hop.clone(),
                    path: path.to_string(),
                }
            })?;

            let planned = builder.plan.alias_for(prefix).map(str::to_string);
            parent = match planned {
                Some(alias) => alias,
                None => builder.join_edge(edge, &parent, prefix),
            };
            table = edge.target_table.clone();
        }
        Ok(())
    }
}

struct PlanBuilder {
    plan: JoinPlan,
    counters: HashMap<String, usize>,
    /// Table names and aliases handed out so far; never reused as an alias.
    taken: HashSet<String>,
}

impl PlanBuilder {
    fn next_alias(&mut self, table: &str) -> String {
        let n = self.counters.entry(table.to_string()).or_insert(0);
        loop {
            *n += 1;
            let alias = format!("{table}{n}");
            if self.taken.insert(alias.clone()) {
                return alias;
            }
        }
    }

    /// Emits the joins for one hop and returns the alias of its target.
    fn join_edge(&mut self, edge: &RelationEdge, parent: &str, prefix: &[String]) -> String {
        match (&edge.kind, &edge.junction) {
            (RelationKind::ManyToMany, Some(junction)) => {
                let link = self.next_alias(&junction.table);
                self.push(
                    &junction.table,
                    &link,
                    JoinColumn::new(&link, &junction.source_column),
                    JoinColumn::new(parent, &edge.source_column),
                    prefix,
                );
                let alias = self.next_alias(&edge.target_table);
                self.push(
                    &edge.target_table,
                    &alias,
                    JoinColumn::new(&alias, &edge.target_column),
                    JoinColumn::new(&link, &junction.target_column),
                    prefix,
                );
                self.register(prefix, alias)
            }
            (RelationKind::BelongsTo, _) => {
                let alias = self.next_alias(&edge.target_table);
                self.push(
                    &edge.target_table,
                    &alias,
                    JoinColumn::new(parent, &edge.source_column),
                    JoinColumn::new(&alias, &edge.target_column),
                    prefix,
                );
                self.register(prefix, alias)
            }
            // Graph validation guarantees a junction on many-to-many edges.
            (RelationKind::HasMany | RelationKind::ManyToMany, _) => {
                let alias = self.next_alias(&edge.target_table);
                self.push(
                    &edge.target_table,
                    &alias,
                    JoinColumn::new(&alias, &edge.target_column),
                    JoinColumn::new(parent, &edge.source_column),
                    prefix,
                );
                self.register(prefix, alias)
            }
        }
    }

    fn push(
        &mut self,
        table: &str,
        alias: &str,
        left: JoinColumn,
        right: JoinColumn,
        prefix: &[String],
    ) {
        debug!("Join {} as {} for '{}'", table, alias, prefix.join("."));
        self.plan.joins.push(JoinSpec {
            table: table.to_string(),
            alias: alias.to_string(),
            left,
            right,
            kind: JoinKind::Inner,
            prefix: prefix.to_vec(),
        });
    }

    fn register(&mut self, prefix: &[String], alias: String) -> String {
        self.plan.aliases.insert(prefix.to_vec(), alias.clone());
        alias
    }
}
