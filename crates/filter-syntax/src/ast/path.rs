use std::fmt;

/// Relation hops followed by a terminal column, e.g. `city.address.address_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub relations: Vec<String>,
    pub column: String,
}

impl FieldPath {
    pub fn new(relations: Vec<String>, column: &str) -> Self {
        Self {
            relations,
            column: column.to_string(),
        }
    }

    pub fn column(column: &str) -> Self {
        Self::new(Vec::new(), column)
    }

    /// The relation hops, used as the join-plan key.
    pub fn prefix(&self) -> &[String] {
        &self.relations
    }

    pub fn depth(&self) -> usize {
        self.relations.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hop in &self.relations {
            write!(f, "{hop}.")?;
        }
        f.write_str(&self.column)
    }
}
