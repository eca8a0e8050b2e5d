use crate::error::CliError;
use clap::Subcommand;
use planner::{CompilerSettings, SettingsError, settings::MAX_PATH_DEPTH_ENV};
use query_builder::render::LiteralMode;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter into SQL for one root table
    Compile {
        #[arg(long, help = "Schema metadata JSON file")]
        schema: String,

        #[arg(long, help = "Root table the filter applies to")]
        root: String,

        #[arg(
            long,
            help = "JSON filter file",
            conflicts_with = "where_string",
            required_unless_present = "where_string"
        )]
        filter: Option<String>,

        #[arg(long = "where", help = "Filter in where-string syntax, e.g. (title,eq,abc)")]
        where_string: Option<String>,

        /// SQL dialect: "mysql", "pg", "sqlite", "mssql", "oracle"
        #[arg(long)]
        dialect: Option<String>,

        #[arg(long, help = "Emit placeholders and print the bound parameters")]
        parameterized: bool,

        #[arg(long, help = "Maximum number of relation hops in one path")]
        max_path_depth: Option<usize>,

        #[arg(long, help = "Print the whole compiled query as JSON")]
        json: bool,
    },
    /// Validate schema metadata and list its tables and relations
    Inspect {
        #[arg(long, help = "Schema metadata JSON file")]
        schema: String,
    },
}

/// Environment settings with command line flags applied on top.
pub fn resolve_settings(
    base: CompilerSettings,
    dialect: Option<&str>,
    parameterized: bool,
    max_path_depth: Option<usize>,
) -> Result<CompilerSettings, CliError> {
    let mut settings = base;
    if let Some(dialect) = dialect {
        settings.dialect = dialect.parse().map_err(SettingsError::from)?;
    }
    if parameterized {
        settings.literal_mode = LiteralMode::Parameterized;
    }
    if let Some(depth) = max_path_depth {
        settings = settings.with_overrides(|key| {
            (key == MAX_PATH_DEPTH_ENV).then(|| depth.to_string())
        })?;
    }
    Ok(settings)
}
