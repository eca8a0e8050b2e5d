use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "hm")]
    HasMany,
    #[serde(rename = "bt")]
    BelongsTo,
    #[serde(rename = "mm")]
    ManyToMany,
}

impl RelationKind {
    /// Short tag used in filter payloads (`relationType`).
    pub fn tag(&self) -> &'static str {
        match self {
            RelationKind::HasMany => "hm",
            RelationKind::BelongsTo => "bt",
            RelationKind::ManyToMany => "mm",
        }
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hm" | "hasmany" | "has_many" => Ok(RelationKind::HasMany),
            "bt" | "belongsto" | "belongs_to" => Ok(RelationKind::BelongsTo),
            "mm" | "manytomany" | "many_to_many" => Ok(RelationKind::ManyToMany),
            other => Err(format!("unknown relation type '{other}'")),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Junction table of a many-to-many edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    pub table: String,
    /// Junction column referencing the edge's source key.
    pub source_column: String,
    /// Junction column referencing the edge's target key.
    pub target_column: String,
}

/// A validated, directed relation between two tables.
///
/// Key columns by kind:
/// - has-many: `source_column` is the parent key on the source table,
///   `target_column` the foreign key on the target table.
/// - belongs-to: `source_column` is the foreign key on the source table,
///   `target_column` the referenced key on the target table.
/// - many-to-many: both keys live on their own tables and are linked through
///   the junction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub name: String,
    pub kind: RelationKind,
    pub source_table: String,
    pub target_table: String,
    pub source_column: String,
    pub target_column: String,
    pub junction: Option<Junction>,
}

impl RelationEdge {
    pub fn has_many(source: (&str, &str), target: (&str, &str)) -> Self {
        Self::simple(RelationKind::HasMany, source, target)
    }

    pub fn belongs_to(source: (&str, &str), target: (&str, &str)) -> Self {
        Self::simple(RelationKind::BelongsTo, source, target)
    }

    pub fn many_to_many(
        source: (&str, &str),
        junction: (&str, &str, &str),
        target: (&str, &str),
    ) -> Self {
        let mut edge = Self::simple(RelationKind::ManyToMany, source, target);
        edge.junction = Some(Junction {
            table: junction.0.to_string(),
            source_column: junction.1.to_string(),
            target_column: junction.2.to_string(),
        });
        edge
    }

    fn simple(kind: RelationKind, source: (&str, &str), target: (&str, &str)) -> Self {
        Self {
            name: target.0.to_string(),
            kind,
            source_table: source.0.to_string(),
            target_table: target.0.to_string(),
            source_column: source.1.to_string(),
            target_column: target.1.to_string(),
            junction: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}
