use crate::schema::{
    column::{Column, ColumnFlags},
    error::SchemaError,
    graph::SchemaGraphBuilder,
    relation::{Junction, RelationEdge, RelationKind},
    table::Table,
    ui_type::UiType,
};
use serde::{Deserialize, Serialize};

/// Schema description as delivered by the metadata service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub tables: Vec<TableMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    /// Edges leaving this table.
    #[serde(default)]
    pub relations: Vec<RelationMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(alias = "uidt")]
    pub ui_type: UiType,
    #[serde(default, alias = "dt")]
    pub db_type: String,
    #[serde(default)]
    pub pk: bool,
    #[serde(default, alias = "rqd")]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, alias = "ai")]
    pub auto_increment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationMeta {
    /// Defaults to the target table name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub target_table: String,
    pub source_column: String,
    pub target_column: String,
    #[serde(default)]
    pub junction: Option<JunctionMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunctionMeta {
    pub table: String,
    pub source_column: String,
    pub target_column: String,
}

impl ColumnMeta {
    fn to_column(&self) -> Column {
        let mut flags = ColumnFlags::empty();
        flags.set(ColumnFlags::PRIMARY_KEY, self.pk);
        flags.set(ColumnFlags::REQUIRED, self.required || self.pk);
        flags.set(ColumnFlags::UNIQUE, self.unique);
        flags.set(ColumnFlags::AUTO_INCREMENT, self.auto_increment);

        let mut column = Column::new(&self.name, self.ui_type.clone()).with_db_type(&self.db_type);
        if let Some(id) = &self.id {
            column = column.with_id(id.as_str());
        }
        column.flags = flags;
        column
    }
}

impl RelationMeta {
    fn to_edge(&self, source_table: &str) -> Result<RelationEdge, SchemaError> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.target_table.clone());
        let kind: RelationKind =
            self.kind
                .parse()
                .map_err(|_| SchemaError::InvalidRelationType {
                    relation: name.clone(),
                    value: self.kind.clone(),
                })?;

        Ok(RelationEdge {
            name,
            kind,
            source_table: source_table.to_string(),
            target_table: self.target_table.clone(),
            source_column: self.source_column.clone(),
            target_column: self.target_column.clone(),
            junction: self.junction.as_ref().map(|j| Junction {
                table: j.table.clone(),
                source_column: j.source_column.clone(),
                target_column: j.target_column.clone(),
            }),
        })
    }
}

impl SchemaMetadata {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn to_builder(&self) -> Result<SchemaGraphBuilder, SchemaError> {
        let mut builder = SchemaGraphBuilder::default();

        for meta in &self.tables {
            let mut table = Table::new(&meta.name);
            if let Some(id) = &meta.id {
                table = table.with_id(id.as_str());
            }
            for column in &meta.columns {
                table = table.column(column.to_column());
            }
            builder = builder.table(table);
        }

        for meta in &self.tables {
            for relation in &meta.relations {
                builder = builder.relation(relation.to_edge(&meta.name)?);
            }
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{
        error::SchemaError, graph::SchemaGraph, metadata::SchemaMetadata, relation::RelationKind,
        ui_type::UiType,
    };

    const FILM_SCHEMA: &str = r#"{
        "tables": [
            {
                "name": "film",
                "columns": [
                    { "name": "film_id", "uidt": "ID", "dt": "int", "pk": true },
                    { "name": "title", "ui_type": "SingleLineText" }
                ],
                "relations": [
                    {
                        "type": "mm",
                        "target_table": "actor",
                        "source_column": "film_id",
                        "target_column": "actor_id",
                        "junction": {
                            "table": "film_actor",
                            "source_column": "film_id",
                            "target_column": "actor_id"
                        }
                    }
                ]
            },
            {
                "name": "actor",
                "columns": [{ "name": "actor_id", "uidt": "ID", "pk": true }]
            },
            {
                "name": "film_actor",
                "columns": [
                    { "name": "film_id", "uidt": "ForeignKey" },
                    { "name": "actor_id", "uidt": "ForeignKey" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_metadata() {
        let metadata = SchemaMetadata::from_json(FILM_SCHEMA).unwrap();
        let graph = SchemaGraph::from_metadata(&metadata).unwrap();

        let pk = graph.column("film", "film_id").unwrap();
        assert!(pk.is_primary_key() && pk.is_required());
        assert_eq!(pk.db_type, "int");
        assert_eq!(graph.column("film", "title").unwrap().ui_type, UiType::SingleLineText);

        let edge = graph.relation("film", "actor").unwrap();
        assert_eq!(edge.kind, RelationKind::ManyToMany);
        assert_eq!(edge.junction.as_ref().unwrap().table, "film_actor");
    }

    #[test]
    fn test_invalid_relation_type() {
        let json = FILM_SCHEMA.replace("\"mm\"", "\"xx\"");
        let metadata = SchemaMetadata::from_json(&json).unwrap();
        let err = SchemaGraph::from_metadata(&metadata).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRelationType { value, .. } if value == "xx"));
    }
}
