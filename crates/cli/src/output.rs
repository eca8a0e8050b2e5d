use crate::error::CliError;
use model::schema::{graph::SchemaGraph, relation::RelationKind};
use planner::CompiledQuery;

pub fn print_query(query: &CompiledQuery, json: bool) -> Result<(), CliError> {
    if json {
        let out = serde_json::to_string_pretty(query).map_err(CliError::JsonSerialize)?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", query.sql);
    if !query.params.is_empty() {
        let params = serde_json::to_string(&query.params).map_err(CliError::JsonSerialize)?;
        println!("-- params: {params}");
    }
    Ok(())
}

pub fn print_schema(graph: &SchemaGraph) {
    for table in graph.tables() {
        println!("{} ({} columns)", table.name, table.columns.len());
        for column in &table.columns {
            println!("  {}: {}", column.name, column.ui_type);
        }
        for edge in graph.relations_from(&table.name) {
            let via = match (&edge.kind, &edge.junction) {
                (RelationKind::ManyToMany, Some(junction)) => format!(" via {}", junction.table),
                _ => String::new(),
            };
            println!(
                "  -> {} [{}] {}.{} = {}.{}{}",
                edge.name,
                edge.kind,
                edge.source_table,
                edge.source_column,
                edge.target_table,
                edge.target_column,
                via
            );
        }
    }
}
