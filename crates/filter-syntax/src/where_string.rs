//! Parser for the compact `(field,op,value)~and(...)` filter syntax.
//!
//! `a ~and b ~or c` groups as `(a and b) or (c)`: consecutive `~and` terms
//! form a run, and `~or` starts a new one.

use crate::{
    ast::{
        node::{Comparison, ConditionNode, Group},
        operator::Operator,
        path::FieldPath,
    },
    error::ConditionError,
    parser::ParserLimits,
};
use model::schema::graph::SchemaGraph;
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Parser)]
#[grammar = "grammar/where_string.pest"]
pub struct WhereStringParser;

/// Operators taking a comma separated list.
const LIST_OPERATORS: [Operator; 3] = [Operator::In, Operator::Btw, Operator::Nbtw];

pub fn parse(
    input: &str,
    graph: &SchemaGraph,
    root_table: &str,
    limits: ParserLimits,
) -> Result<ConditionNode, ConditionError> {
    if graph.table(root_table).is_none() {
        return Err(ConditionError::TableNotFound(root_table.to_string()));
    }
    if input.trim().is_empty() {
        return Ok(ConditionNode::Group(Group::and(Vec::new())));
    }

    let mut pairs = WhereStringParser::parse(Rule::where_string, input.trim())
        .map_err(|e| ConditionError::Syntax(e.to_string()))?;
    let chain = pairs
        .next()
        .and_then(|root| root.into_inner().next())
        .ok_or_else(|| ConditionError::Syntax("empty where string".into()))?;

    let lowering = Lowering {
        graph,
        root_table,
        limits,
    };
    let node = lowering.chain(chain, 0)?;
    debug!("Parsed where string on '{}'", root_table);
    Ok(node)
}

struct Lowering<'a> {
    graph: &'a SchemaGraph,
    root_table: &'a str,
    limits: ParserLimits,
}

impl Lowering<'_> {
    fn chain(&self, pair: Pair<Rule>, nesting: usize) -> Result<ConditionNode, ConditionError> {
        if nesting > self.limits.max_nesting_depth {
            return Err(ConditionError::MaxDepthExceeded {
                what: "nesting",
                depth: nesting,
                limit: self.limits.max_nesting_depth,
            });
        }

        let mut runs: Vec<Vec<ConditionNode>> = vec![Vec::new()];
        let mut negate_next = false;
        let mut connective = "~and";

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::lead_not => negate_next = true,
                Rule::connective => connective = item.as_str(),
                Rule::comparison | Rule::group => {
                    let mut node = match item.as_rule() {
                        Rule::group => {
                            let inner = item
                                .into_inner()
                                .next()
                                .ok_or_else(|| ConditionError::Syntax("empty group".into()))?;
                            self.chain(inner, nesting + 1)?
                        }
                        _ => self.comparison(item)?,
                    };

                    let negated = std::mem::take(&mut negate_next)
                        || matches!(connective, "~not" | "~andnot" | "~ornot");
                    if negated {
                        node = node.negate();
                    }
                    if matches!(connective, "~or" | "~ornot") {
                        runs.push(vec![node]);
                    } else if let Some(run) = runs.last_mut() {
                        run.push(node);
                    }
                }
                _ => {}
            }
        }

        let mut groups: Vec<ConditionNode> = runs
            .into_iter()
            .map(|run| ConditionNode::Group(Group::and(run)))
            .collect();
        Ok(if groups.len() == 1 {
            groups.remove(0)
        } else {
            ConditionNode::Group(Group::or(groups))
        })
    }

    fn comparison(&self, pair: Pair<Rule>) -> Result<ConditionNode, ConditionError> {
        let text = pair.as_str().to_string();
        let mut field = None;
        let mut op = None;
        let mut raw_value = None;
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::field => field = Some(part),
                Rule::op => op = Some(part.as_str().to_string()),
                Rule::value => raw_value = Some(part.as_str().to_string()),
                _ => {}
            }
        }
        let (Some(field), Some(op)) = (field, op) else {
            return Err(ConditionError::Syntax(format!("incomplete comparison {text}")));
        };

        let segments: Vec<&str> = field.into_inner().map(|s| s.as_str().trim()).collect();
        let Some((column, hops)) = segments.split_last() else {
            return Err(ConditionError::Syntax(format!("missing field in {text}")));
        };
        if hops.len() > self.limits.max_path_depth {
            return Err(ConditionError::MaxDepthExceeded {
                what: "relation path",
                depth: hops.len(),
                limit: self.limits.max_path_depth,
            });
        }

        let mut table = self.root_table.to_string();
        for hop in hops {
            let edge = self.graph.relation(&table, hop).ok_or_else(|| {
                warn!("Relation '{}' not found on '{}'", hop, table);
                ConditionError::RelationNotFound {
                    table: table.clone(),
                    relation: hop.to_string(),
                }
            })?;
            table = edge.target_table.clone();
        }
        if self.graph.column(&table, column).is_none() {
            return Err(ConditionError::ColumnNotFound {
                table,
                column: column.to_string(),
            });
        }

        let raw_value = raw_value.unwrap_or_default();
        let (operator, value) = resolve_operator(&op, raw_value.trim())
            .ok_or_else(|| ConditionError::UnsupportedOperator {
                field: segments.join("."),
                operator: op.clone(),
            })?;

        Ok(ConditionNode::Comparison(Comparison {
            path: FieldPath::new(hops.iter().map(|h| h.to_string()).collect(), column),
            table,
            operator,
            sub_operator: None,
            value,
        }))
    }
}

/// Maps an operator name and its raw text to an operator and JSON value.
fn resolve_operator(op: &str, raw: &str) -> Option<(Operator, Value)> {
    match op.to_lowercase().as_str() {
        "ne" => Some((Operator::Neq, Value::String(raw.to_string()))),
        "is" if raw.eq_ignore_ascii_case("null") => Some((Operator::Null, Value::Null)),
        "isnot" if raw.eq_ignore_ascii_case("null") => Some((Operator::NotNull, Value::Null)),
        "is" | "isnot" => None,
        name => {
            let operator = Operator::lookup(name)?;
            let value = if LIST_OPERATORS.contains(&operator) {
                Value::Array(
                    raw.split(',')
                        .map(|v| Value::String(v.trim().to_string()))
                        .collect(),
                )
            } else if raw.is_empty() && operator.is_unary() {
                Value::Null
            } else {
                Value::String(raw.to_string())
            };
            Some((operator, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::LogicalOp;
    use model::schema::{
        column::Column, relation::RelationEdge, table::Table, ui_type::UiType,
    };
    use serde_json::json;

    fn graph() -> SchemaGraph {
        SchemaGraph::builder()
            .table(
                Table::new("film")
                    .column(Column::new("film_id", UiType::Id).primary_key())
                    .column(Column::new("title", UiType::SingleLineText))
                    .column(Column::new("length", UiType::Number))
                    .column(Column::new("language_id", UiType::ForeignKey)),
            )
            .table(
                Table::new("language")
                    .column(Column::new("language_id", UiType::Id).primary_key())
                    .column(Column::new("name", UiType::SingleLineText)),
            )
            .relation(RelationEdge::belongs_to(
                ("film", "language_id"),
                ("language", "language_id"),
            ))
            .build()
            .unwrap()
    }

    fn parse_str(input: &str) -> Result<ConditionNode, ConditionError> {
        parse(input, &graph(), "film", ParserLimits::default())
    }

    fn comparison(node: &ConditionNode) -> &Comparison {
        match node {
            ConditionNode::Comparison(c) => c,
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn test_single_comparison() {
        let node = parse_str("(title,eq,Alien)").unwrap();
        let ConditionNode::Group(group) = node else {
            panic!("expected group");
        };
        assert_eq!(group.logic, LogicalOp::And);
        let cmp = comparison(&group.children[0]);
        assert_eq!(cmp.operator, Operator::Eq);
        assert_eq!(cmp.value, json!("Alien"));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let node = parse_str("(title,eq,a)~and(length,gt,3)~or(length,lt,1)").unwrap();
        let ConditionNode::Group(root) = node else {
            panic!("expected group");
        };
        assert_eq!(root.logic, LogicalOp::Or);
        assert_eq!(root.children.len(), 2);
        let ConditionNode::Group(first) = &root.children[0] else {
            panic!("expected and-run");
        };
        assert_eq!(first.children.len(), 2);
    }

    #[test]
    fn test_negations_and_nested_groups() {
        let node = parse_str("~not(title,like,x)~andnot((length,gt,1)~or(length,lt,0))").unwrap();
        let ConditionNode::Group(root) = node else {
            panic!("expected group");
        };
        assert!(matches!(root.children[0], ConditionNode::Negation(_)));
        let ConditionNode::Negation(inner) = &root.children[1] else {
            panic!("expected negation");
        };
        assert!(matches!(**inner, ConditionNode::Group(Group { logic: LogicalOp::Or, .. })));
    }

    #[test]
    fn test_dotted_paths_and_legacy_operators() {
        let node = parse_str("(language.name,ne,English)~and(title,isnot,null)~and(length,btw,1,5)").unwrap();
        let leaves = node.leaves();
        assert_eq!(leaves[0].path.relations, vec!["language".to_string()]);
        assert_eq!(leaves[0].table, "language");
        assert_eq!(leaves[0].operator, Operator::Neq);
        assert_eq!(leaves[1].operator, Operator::NotNull);
        assert_eq!(leaves[2].value, json!(["1", "5"]));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_str("(title,eq,a"),
            Err(ConditionError::Syntax(_))
        ));
        assert!(matches!(
            parse_str("(studio.name,eq,a)"),
            Err(ConditionError::RelationNotFound { .. })
        ));
        assert!(matches!(
            parse_str("(title,contains,a)"),
            Err(ConditionError::UnsupportedOperator { .. })
        ));
        assert!(matches!(
            parse_str("(rating,eq,a)"),
            Err(ConditionError::ColumnNotFound { .. })
        ));
    }
}
