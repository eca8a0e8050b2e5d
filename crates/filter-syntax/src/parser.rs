//! Reads the nested JSON filter payload into a [`ConditionNode`] tree.
//!
//! Every JSON object becomes an `and` group of its entries. Relation objects
//! (`{"relationType": ..}`) and multi-operator column objects contribute their
//! entries directly to the enclosing group.

use crate::{
    ast::{
        node::{Comparison, ConditionNode, Group, LogicalOp},
        operator::{Operator, SubOperator},
        path::FieldPath,
    },
    error::ConditionError,
};
use model::schema::{graph::SchemaGraph, relation::RelationKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const RELATION_TYPE_KEY: &str = "relationType";
pub const SUB_OP_KEY: &str = "subOp";
pub const SUB_OP_VALUE_KEY: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserLimits {
    pub max_path_depth: usize,
    pub max_nesting_depth: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_path_depth: 10,
            max_nesting_depth: 32,
        }
    }
}

pub struct ConditionParser<'g> {
    graph: &'g SchemaGraph,
    limits: ParserLimits,
}

/// Table and relation path the current object is read against.
#[derive(Clone)]
struct Scope {
    table: String,
    relations: Vec<String>,
    nesting: usize,
}

impl Scope {
    fn location(&self, key: &str) -> String {
        let mut at = self.relations.join(".");
        if !at.is_empty() {
            at.push('.');
        }
        at.push_str(key);
        at
    }
}

impl<'g> ConditionParser<'g> {
    pub fn new(graph: &'g SchemaGraph, limits: ParserLimits) -> Self {
        Self { graph, limits }
    }

    /// Parses `payload` against `root_table`. The result is always a group;
    /// an empty object yields an empty group.
    pub fn parse(&self, root_table: &str, payload: &Value) -> Result<ConditionNode, ConditionError> {
        if self.graph.table(root_table).is_none() {
            return Err(ConditionError::TableNotFound(root_table.to_string()));
        }
        let Value::Object(map) = payload else {
            return Err(ConditionError::malformed(
                "$",
                "filter root must be a JSON object",
            ));
        };

        let scope = Scope {
            table: root_table.to_string(),
            relations: Vec::new(),
            nesting: 0,
        };
        let entries = self.parse_entries(map, &scope)?;
        debug!(
            "Parsed filter on '{}' into {} top-level entries",
            root_table,
            entries.len()
        );
        Ok(ConditionNode::Group(Group::and(entries)))
    }

    fn parse_object(&self, value: &Value, scope: &Scope, at: &str) -> Result<ConditionNode, ConditionError> {
        let Value::Object(map) = value else {
            return Err(ConditionError::malformed(at, "expected an object"));
        };
        let entries = self.parse_entries(map, scope)?;
        if entries.is_empty() {
            return Err(ConditionError::malformed(at, "empty condition group"));
        }
        Ok(ConditionNode::Group(Group::and(entries)))
    }

    fn parse_entries(
        &self,
        map: &Map<String, Value>,
        scope: &Scope,
    ) -> Result<Vec<ConditionNode>, ConditionError> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            if let Some(keyword) = key.strip_prefix('_') {
                entries.push(self.parse_logical(keyword, value, scope)?);
                continue;
            }

            let at = scope.location(key);
            let Value::Object(inner) = value else {
                return Err(ConditionError::malformed(
                    at,
                    "expected an operator or relation object",
                ));
            };

            if inner.contains_key(RELATION_TYPE_KEY) {
                entries.extend(self.parse_relation(key, inner, scope)?);
            } else if inner.keys().any(|k| Operator::lookup(k).is_some()) {
                entries.extend(self.parse_leaf(key, inner, scope)?);
            } else if inner.is_empty() {
                return Err(ConditionError::malformed(at, "empty condition object"));
            } else if inner.values().all(|v| !v.is_object()) {
                let operator = inner.keys().next().cloned().unwrap_or_default();
                warn!("Rejected unknown operator '{}' on '{}'", operator, at);
                return Err(ConditionError::UnsupportedOperator { field: at, operator });
            } else {
                return Err(ConditionError::malformed(
                    at,
                    format!("nested object is missing '{RELATION_TYPE_KEY}'"),
                ));
            }
        }
        Ok(entries)
    }

    fn parse_logical(
        &self,
        keyword: &str,
        value: &Value,
        scope: &Scope,
    ) -> Result<ConditionNode, ConditionError> {
        let at = scope.location(&format!("_{keyword}"));
        let nested = Scope {
            nesting: scope.nesting + 1,
            ..scope.clone()
        };
        if nested.nesting > self.limits.max_nesting_depth {
            return Err(ConditionError::MaxDepthExceeded {
                what: "nesting",
                depth: nested.nesting,
                limit: self.limits.max_nesting_depth,
            });
        }

        match keyword {
            "and" | "or" => {
                let logic = if keyword == "and" { LogicalOp::And } else { LogicalOp::Or };
                let Value::Array(items) = value else {
                    return Err(ConditionError::malformed(at, "expected an array of objects"));
                };
                if items.is_empty() {
                    return Err(ConditionError::malformed(at, "empty condition group"));
                }
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| self.parse_object(item, &nested, &format!("{at}[{idx}]")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ConditionNode::Group(Group { logic, children }))
            }
            "not" => Ok(self.parse_object(value, &nested, &at)?.negate()),
            _ => Err(ConditionError::malformed(at, "unknown logical keyword")),
        }
    }

    fn parse_relation(
        &self,
        name: &str,
        inner: &Map<String, Value>,
        scope: &Scope,
    ) -> Result<Vec<ConditionNode>, ConditionError> {
        let at = scope.location(name);
        let tag = inner
            .get(RELATION_TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ConditionError::malformed(&at, "relationType must be a string"))?;
        let kind: RelationKind = tag
            .parse()
            .map_err(|reason: String| ConditionError::malformed(&at, reason))?;

        let edge = self
            .graph
            .relation(&scope.table, name)
            .filter(|edge| edge.kind == kind)
            .ok_or_else(|| {
                warn!("Relation '{}' ({}) not found on '{}'", name, kind, scope.table);
                ConditionError::RelationNotFound {
                    table: scope.table.clone(),
                    relation: name.to_string(),
                }
            })?;

        let depth = scope.relations.len() + 1;
        if depth > self.limits.max_path_depth {
            return Err(ConditionError::MaxDepthExceeded {
                what: "relation path",
                depth,
                limit: self.limits.max_path_depth,
            });
        }

        let mut relations = scope.relations.clone();
        relations.push(name.to_string());
        let nested = Scope {
            table: edge.target_table.clone(),
            relations,
            nesting: scope.nesting,
        };

        let mut body = inner.clone();
        body.remove(RELATION_TYPE_KEY);
        if body.is_empty() {
            return Err(ConditionError::malformed(at, "relation object has no conditions"));
        }
        self.parse_entries(&body, &nested)
    }

    fn parse_leaf(
        &self,
        column: &str,
        inner: &Map<String, Value>,
        scope: &Scope,
    ) -> Result<Vec<ConditionNode>, ConditionError> {
        let at = scope.location(column);
        if self.graph.column(&scope.table, column).is_none() {
            warn!("Column '{}' not found on '{}'", column, scope.table);
            return Err(ConditionError::ColumnNotFound {
                table: scope.table.clone(),
                column: column.to_string(),
            });
        }

        let mut leaves = Vec::with_capacity(inner.len());
        for (op_name, raw) in inner {
            let operator = Operator::lookup(op_name).ok_or_else(|| {
                ConditionError::malformed(
                    &at,
                    format!("'{op_name}' mixed with operators is not an operator"),
                )
            })?;
            let (sub_operator, value) = split_sub_operator(raw, &at)?;
            leaves.push(ConditionNode::Comparison(Comparison {
                path: FieldPath::new(scope.relations.clone(), column),
                table: scope.table.clone(),
                operator,
                sub_operator,
                value,
            }));
        }
        Ok(leaves)
    }
}

/// Splits `{"subOp": .., "value": ..}` into its parts. Other values pass through.
fn split_sub_operator(
    raw: &Value,
    at: &str,
) -> Result<(Option<SubOperator>, Value), ConditionError> {
    let Value::Object(obj) = raw else {
        return Ok((None, raw.clone()));
    };
    let Some(sub) = obj.get(SUB_OP_KEY) else {
        return Ok((None, raw.clone()));
    };
    let name = sub
        .as_str()
        .ok_or_else(|| ConditionError::malformed(at, "subOp must be a string"))?;
    let sub_operator =
        SubOperator::lookup(name).ok_or_else(|| ConditionError::UnsupportedOperator {
            field: at.to_string(),
            operator: name.to_string(),
        })?;
    let value = obj.get(SUB_OP_VALUE_KEY).cloned().unwrap_or(Value::Null);
    Ok((Some(sub_operator), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::schema::{
        column::Column, relation::RelationEdge, table::Table, ui_type::UiType,
    };
    use serde_json::json;

    fn graph() -> SchemaGraph {
        SchemaGraph::builder()
            .table(
                Table::new("country")
                    .column(Column::new("country_id", UiType::Id).primary_key())
                    .column(Column::new("country", UiType::SingleLineText)),
            )
            .table(
                Table::new("city")
                    .column(Column::new("city_id", UiType::Id).primary_key())
                    .column(Column::new("city", UiType::SingleLineText))
                    .column(Column::new("country_id", UiType::ForeignKey)),
            )
            .relation(RelationEdge::has_many(
                ("country", "country_id"),
                ("city", "country_id"),
            ))
            .build()
            .unwrap()
    }

    fn parse(payload: Value) -> Result<ConditionNode, ConditionError> {
        let graph = graph();
        ConditionParser::new(&graph, ParserLimits::default()).parse("country", &payload)
    }

    fn root_entries(node: ConditionNode) -> Vec<ConditionNode> {
        match node {
            ConditionNode::Group(group) => {
                assert_eq!(group.logic, LogicalOp::And);
                group.children
            }
            other => panic!("expected root group, got {other:?}"),
        }
    }

    #[test]
    fn test_entries_keep_payload_order() {
        let entries = root_entries(
            parse(json!({
                "country": { "eq": "Norway" },
                "_and": [{ "country_id": { "gt": 1 } }]
            }))
            .unwrap(),
        );
        assert!(matches!(entries[0], ConditionNode::Comparison(_)));
        let ConditionNode::Group(group) = &entries[1] else {
            panic!("expected _and group");
        };
        assert_eq!(group.logic, LogicalOp::And);
        assert!(matches!(group.children[0], ConditionNode::Group(_)));
    }

    #[test]
    fn test_relation_entries_are_spliced() {
        let entries = root_entries(
            parse(json!({
                "city": { "relationType": "hm", "city": { "like": "Os", "neq": "Oslo" } }
            }))
            .unwrap(),
        );
        assert_eq!(entries.len(), 2);
        let ConditionNode::Comparison(first) = &entries[0] else {
            panic!("expected comparison");
        };
        assert_eq!(first.path.to_string(), "city.city");
        assert_eq!(first.table, "city");
        assert_eq!(first.operator, Operator::Like);
    }

    #[test]
    fn test_sub_operator_value() {
        let entries = root_entries(
            parse(json!({ "country": { "eq": { "subOp": "daysAgo", "value": 3 } } })).unwrap(),
        );
        let ConditionNode::Comparison(cmp) = &entries[0] else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.sub_operator, Some(SubOperator::DaysAgo));
        assert_eq!(cmp.value, json!(3));
    }

    #[test]
    fn test_relation_errors() {
        let err = parse(json!({ "store": { "relationType": "hm", "a": { "eq": 1 } } })).unwrap_err();
        assert!(matches!(err, ConditionError::RelationNotFound { .. }));

        let err = parse(json!({ "city": { "relationType": "bt", "city": { "eq": 1 } } })).unwrap_err();
        assert!(matches!(err, ConditionError::RelationNotFound { .. }));

        let err = parse(json!({ "city": { "relationType": "zz", "city": { "eq": 1 } } })).unwrap_err();
        assert!(matches!(err, ConditionError::Malformed { .. }));
    }

    #[test]
    fn test_malformed_shapes() {
        for payload in [
            json!({ "_and": {} }),
            json!({ "_or": [] }),
            json!({ "_not": [1] }),
            json!({ "_xor": [] }),
            json!({ "country": "Norway" }),
            json!({ "country": { "eq": 1, "foo": 2 } }),
            json!({ "city": { "city": { "eq": 1 } } }),
            json!([1, 2]),
        ] {
            let err = parse(payload.clone()).unwrap_err();
            assert!(
                matches!(err, ConditionError::Malformed { .. }),
                "{payload} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_operator_and_column() {
        let err = parse(json!({ "country": { "contains": "x" } })).unwrap_err();
        assert!(matches!(err, ConditionError::UnsupportedOperator { operator, .. } if operator == "contains"));

        let err = parse(json!({ "population": { "gt": 1 } })).unwrap_err();
        assert!(matches!(err, ConditionError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let graph = graph();
        let limits = ParserLimits {
            max_nesting_depth: 2,
            ..ParserLimits::default()
        };
        let payload = json!({ "_not": { "_not": { "_not": { "country": { "eq": 1 } } } } });
        let err = ConditionParser::new(&graph, limits)
            .parse("country", &payload)
            .unwrap_err();
        assert!(matches!(err, ConditionError::MaxDepthExceeded { limit: 2, .. }));
    }

    #[test]
    fn test_empty_root_is_empty_group() {
        assert!(parse(json!({})).unwrap().is_empty());
    }
}
