use crate::{
    assembler::{CompiledQuery, QueryAssembler},
    error::CompileError,
    join::JoinPlanner,
    predicate::{PredicateCompiler, validate},
    settings::CompilerSettings,
};
use field_handlers::{CompileContext, HandlerRegistry};
use filter_syntax::{ConditionNode, ConditionParser, where_string};
use model::schema::{graph::SchemaGraph, store::SchemaStore};
use std::sync::Arc;
use tracing::{debug, info};

/// A filter in one of the accepted input forms.
#[derive(Debug, Clone, Copy)]
pub enum FilterSource<'s> {
    /// Nested JSON object.
    Json(&'s serde_json::Value),
    /// Compact `(field,op,value)~and(...)` string.
    WhereString(&'s str),
}

/// Compiles filters against the current schema snapshot.
pub struct FilterCompiler {
    schema: Arc<SchemaStore>,
    registry: HandlerRegistry,
    settings: CompilerSettings,
}

impl FilterCompiler {
    pub fn new(schema: Arc<SchemaStore>, settings: CompilerSettings) -> Self {
        Self {
            schema,
            registry: HandlerRegistry::new(),
            settings,
        }
    }

    pub fn from_graph(graph: SchemaGraph, settings: CompilerSettings) -> Self {
        Self::new(Arc::new(SchemaStore::new(graph)), settings)
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn schema(&self) -> &Arc<SchemaStore> {
        &self.schema
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn compile(
        &self,
        root: &str,
        filter: &serde_json::Value,
    ) -> Result<CompiledQuery, CompileError> {
        self.compile_source(root, FilterSource::Json(filter), &CompileContext::default())
    }

    pub fn compile_where_string(
        &self,
        root: &str,
        filter: &str,
    ) -> Result<CompiledQuery, CompileError> {
        self.compile_source(
            root,
            FilterSource::WhereString(filter),
            &CompileContext::default(),
        )
    }

    /// Runs parse, validation, join planning, predicate compilation and
    /// assembly. Nothing is rendered unless every leaf validates.
    pub fn compile_source(
        &self,
        root: &str,
        source: FilterSource,
        ctx: &CompileContext,
    ) -> Result<CompiledQuery, CompileError> {
        let graph = self.schema.snapshot();
        let limits = self.settings.limits();

        let tree: ConditionNode = match source {
            FilterSource::Json(payload) => ConditionParser::new(&graph, limits).parse(root, payload)?,
            FilterSource::WhereString(input) => where_string::parse(input, &graph, root, limits)?,
        };
        debug!("Condition tree for '{}': {:?}", root, tree);

        let validated = validate(tree, &graph, &self.registry)?;

        let mut paths = Vec::new();
        validated.for_each_leaf(&mut |leaf| paths.push(&leaf.comparison.path));
        let plan = JoinPlanner::new(&graph, self.settings.max_path_depth).plan(root, paths)?;

        let predicate = PredicateCompiler::new(&plan, ctx).compile(&validated)?;
        let query = QueryAssembler::new(self.settings.dialect.dialect(), self.settings.literal_mode)
            .assemble(&plan, predicate);

        info!(
            "Compiled filter on '{}' for {} ({} joins)",
            root,
            self.settings.dialect,
            query.join_clauses.len()
        );
        Ok(query)
    }
}
