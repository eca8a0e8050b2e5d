use crate::schema::{
    column::Column,
    error::SchemaError,
    metadata::SchemaMetadata,
    relation::{RelationEdge, RelationKind},
    table::Table,
};
use std::collections::HashMap;
use tracing::debug;

/// Read-only view over tables, columns and relation edges.
///
/// Lookups are keyed by `(table, name)` and run in constant time. A graph is
/// only ever built through [`SchemaGraphBuilder::build`] (or
/// [`SchemaGraph::from_metadata`]), which validates every edge, so consumers
/// can trust that an edge's tables and key columns exist.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    tables: Vec<Table>,
    table_index: HashMap<String, usize>,
    column_index: HashMap<String, HashMap<String, usize>>,
    relations: Vec<RelationEdge>,
    relation_index: HashMap<String, HashMap<String, usize>>,
}

impl SchemaGraph {
    pub fn builder() -> SchemaGraphBuilder {
        SchemaGraphBuilder::default()
    }

    pub fn from_metadata(metadata: &SchemaMetadata) -> Result<Self, SchemaError> {
        metadata.to_builder()?.build()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }

    pub fn column(&self, table: &str, name: &str) -> Option<&Column> {
        let table_idx = *self.table_index.get(table)?;
        let col_idx = *self.column_index.get(table)?.get(name)?;
        self.tables[table_idx].columns.get(col_idx)
    }

    pub fn relation(&self, table: &str, name: &str) -> Option<&RelationEdge> {
        self.relation_index
            .get(table)?
            .get(name)
            .map(|&idx| &self.relations[idx])
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Edges leaving `table`, in declaration order.
    pub fn relations_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RelationEdge> {
        self.relations
            .iter()
            .filter(move |edge| edge.source_table == table)
    }

    pub fn relations(&self) -> &[RelationEdge] {
        &self.relations
    }
}

#[derive(Debug, Default)]
pub struct SchemaGraphBuilder {
    tables: Vec<Table>,
    relations: Vec<RelationEdge>,
}

impl SchemaGraphBuilder {
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn relation(mut self, edge: RelationEdge) -> Self {
        self.relations.push(edge);
        self
    }

    pub fn build(self) -> Result<SchemaGraph, SchemaError> {
        let mut graph = SchemaGraph::default();

        for table in self.tables {
            if graph.table_index.contains_key(&table.name) {
                return Err(SchemaError::DuplicateTable(table.name));
            }

            let mut columns = HashMap::with_capacity(table.columns.len());
            for (idx, column) in table.columns.iter().enumerate() {
                if columns.insert(column.name.clone(), idx).is_some() {
                    return Err(SchemaError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }

            graph
                .table_index
                .insert(table.name.clone(), graph.tables.len());
            graph.column_index.insert(table.name.clone(), columns);
            graph.tables.push(table);
        }

        for edge in self.relations {
            validate_edge(&graph, &edge)?;

            let by_name = graph
                .relation_index
                .entry(edge.source_table.clone())
                .or_default();
            if by_name.contains_key(&edge.name) {
                return Err(SchemaError::DuplicateRelation {
                    table: edge.source_table,
                    relation: edge.name,
                });
            }
            by_name.insert(edge.name.clone(), graph.relations.len());
            graph.relations.push(edge);
        }

        debug!(
            "Built schema graph with {} tables and {} relations",
            graph.tables.len(),
            graph.relations.len()
        );
        Ok(graph)
    }
}

fn validate_edge(graph: &SchemaGraph, edge: &RelationEdge) -> Result<(), SchemaError> {
    let require_column = |table: &str, column: &str| -> Result<(), SchemaError> {
        if graph.table(table).is_none() {
            return Err(SchemaError::UnknownTable {
                relation: edge.name.clone(),
                table: table.to_string(),
            });
        }
        if graph.column(table, column).is_none() {
            return Err(SchemaError::UnknownColumn {
                relation: edge.name.clone(),
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        Ok(())
    };

    require_column(&edge.source_table, &edge.source_column)?;
    require_column(&edge.target_table, &edge.target_column)?;

    match (&edge.kind, &edge.junction) {
        (RelationKind::ManyToMany, Some(junction)) => {
            require_column(&junction.table, &junction.source_column)?;
            require_column(&junction.table, &junction.target_column)
        }
        (RelationKind::ManyToMany, None) => Err(SchemaError::MissingJunction(edge.name.clone())),
        (_, Some(_)) => Err(SchemaError::UnexpectedJunction(edge.name.clone())),
        (_, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ui_type::UiType;

    fn country() -> Table {
        Table::new("country")
            .column(Column::new("country_id", UiType::Id).primary_key())
            .column(Column::new("country", UiType::SingleLineText))
    }

    fn city() -> Table {
        Table::new("city")
            .column(Column::new("city_id", UiType::Id).primary_key())
            .column(Column::new("country_id", UiType::ForeignKey))
    }

    #[test]
    fn test_lookups() {
        let graph = SchemaGraph::builder()
            .table(country())
            .table(city())
            .relation(RelationEdge::has_many(
                ("country", "country_id"),
                ("city", "country_id"),
            ))
            .build()
            .unwrap();

        assert!(graph.table("country").is_some());
        assert_eq!(
            graph.column("city", "country_id").unwrap().ui_type,
            UiType::ForeignKey
        );
        assert!(graph.column("city", "missing").is_none());
        assert_eq!(
            graph.relation("country", "city").unwrap().kind,
            RelationKind::HasMany
        );
        assert!(graph.relation("city", "country").is_none());
        assert_eq!(graph.relations_from("country").count(), 1);
    }

    #[test]
    fn test_rejects_duplicate_tables_and_columns() {
        let err = SchemaGraph::builder()
            .table(country())
            .table(country())
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTable("country".into()));

        let err = SchemaGraph::builder()
            .table(country().column(Column::new("country", UiType::LongText)))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_rejects_dangling_edges() {
        let err = SchemaGraph::builder()
            .table(country())
            .relation(RelationEdge::has_many(
                ("country", "country_id"),
                ("city", "country_id"),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTable { table, .. } if table == "city"));

        let err = SchemaGraph::builder()
            .table(country())
            .table(city())
            .relation(RelationEdge::has_many(("country", "nope"), ("city", "country_id")))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownColumn { column, .. } if column == "nope"));
    }

    #[test]
    fn test_junction_rules() {
        let mut edge = RelationEdge::has_many(("country", "country_id"), ("city", "country_id"));
        edge.kind = RelationKind::ManyToMany;
        let err = SchemaGraph::builder()
            .table(country())
            .table(city())
            .relation(edge)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::MissingJunction("city".into()));
    }

    #[test]
    fn test_rejects_duplicate_relation_names() {
        let edge = RelationEdge::has_many(("country", "country_id"), ("city", "country_id"));
        let err = SchemaGraph::builder()
            .table(country())
            .table(city())
            .relation(edge.clone())
            .relation(edge)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateRelation { .. }));
    }
}
