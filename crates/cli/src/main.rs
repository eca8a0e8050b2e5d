use crate::{commands::resolve_settings, error::CliError};
use clap::Parser;
use commands::Commands;
use model::schema::{graph::SchemaGraph, metadata::SchemaMetadata};
use planner::{CompilerSettings, FilterCompiler};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterc",
    version = "0.1.0",
    about = "Compiles relational filters into SQL"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout carries only SQL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            schema,
            root,
            filter,
            where_string,
            dialect,
            parameterized,
            max_path_depth,
            json,
        } => {
            let graph = load_schema(&schema)?;
            let settings = resolve_settings(
                CompilerSettings::from_env()?,
                dialect.as_deref(),
                parameterized,
                max_path_depth,
            )?;
            let compiler = FilterCompiler::from_graph(graph, settings);

            let query = match (filter, where_string) {
                (Some(path), _) => {
                    let payload: serde_json::Value =
                        serde_json::from_str(&std::fs::read_to_string(&path)?)?;
                    compiler.compile(&root, &payload)?
                }
                (None, Some(input)) => compiler.compile_where_string(&root, &input)?,
                (None, None) => compiler.compile(&root, &serde_json::json!({}))?,
            };
            output::print_query(&query, json)?;
        }
        Commands::Inspect { schema } => {
            let graph = load_schema(&schema)?;
            info!(
                "Schema {} is valid: {} tables, {} relations",
                schema,
                graph.tables().len(),
                graph.relations().len()
            );
            output::print_schema(&graph);
        }
    }

    Ok(())
}

fn load_schema(path: &str) -> Result<SchemaGraph, CliError> {
    let source = std::fs::read_to_string(path)?;
    let metadata = SchemaMetadata::from_json(&source)?;
    Ok(SchemaGraph::from_metadata(&metadata)?)
}
