#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use field_handlers::CompileContext;
use model::schema::{
    column::Column, graph::SchemaGraph, relation::RelationEdge, table::Table, ui_type::UiType,
};
use planner::{CompiledQuery, CompileError, CompilerSettings, FilterCompiler, FilterSource};
use query_builder::{dialect::DialectKind, render::LiteralMode};
use serde_json::Value;

fn table(name: &str, columns: &[(&str, UiType)]) -> Table {
    columns
        .iter()
        .fold(Table::new(name), |t, (column, ui_type)| {
            t.column(Column::new(column, ui_type.clone()))
        })
}

/// A Sakila-like schema plus the flat `test` table.
pub fn sakila() -> SchemaGraph {
    use UiType::*;

    SchemaGraph::builder()
        .table(table(
            "test",
            &[("id", Id), ("a", SingleLineText), ("test", Number), ("title", SingleLineText)],
        ))
        .table(table("country", &[("country_id", Id), ("country", SingleLineText)]))
        .table(table(
            "city",
            &[("city_id", Id), ("city", SingleLineText), ("country_id", ForeignKey)],
        ))
        .table(table(
            "address",
            &[
                ("address_id", Id),
                ("address", SingleLineText),
                ("city_id", ForeignKey),
                ("phone", PhoneNumber),
            ],
        ))
        .table(table(
            "store",
            &[("store_id", Id), ("address_id", ForeignKey)],
        ))
        .table(table(
            "staff",
            &[
                ("staff_id", Id),
                ("first_name", SingleLineText),
                ("email", Email),
                ("active", Checkbox),
                ("address_id", ForeignKey),
                ("store_id", ForeignKey),
            ],
        ))
        .table(table(
            "film",
            &[
                ("film_id", Id),
                ("title", SingleLineText),
                ("length", Number),
                ("rating", SingleSelect),
                ("special_features", MultiSelect),
                ("release_year", Year),
                ("language_id", ForeignKey),
                ("last_update", LastModifiedTime),
            ],
        ))
        .table(table(
            "actor",
            &[("actor_id", Id), ("first_name", SingleLineText), ("last_name", SingleLineText)],
        ))
        .table(table("film_actor", &[("actor_id", ForeignKey), ("film_id", ForeignKey)]))
        .table(table("language", &[("language_id", Id), ("name", SingleLineText)]))
        .table(table(
            "rental",
            &[
                ("rental_id", Id),
                ("rental_date", DateTime),
                ("return_date", Date),
                ("pickup_time", Time),
                ("staff_id", ForeignKey),
            ],
        ))
        .relation(RelationEdge::has_many(("country", "country_id"), ("city", "country_id")))
        .relation(RelationEdge::belongs_to(("city", "country_id"), ("country", "country_id")))
        .relation(RelationEdge::has_many(("city", "city_id"), ("address", "city_id")))
        .relation(RelationEdge::belongs_to(("address", "city_id"), ("city", "city_id")))
        .relation(RelationEdge::has_many(("address", "address_id"), ("staff", "address_id")))
        .relation(RelationEdge::belongs_to(("staff", "address_id"), ("address", "address_id")))
        .relation(RelationEdge::belongs_to(("staff", "store_id"), ("store", "store_id")))
        .relation(RelationEdge::has_many(("staff", "staff_id"), ("rental", "staff_id")))
        .relation(RelationEdge::belongs_to(("store", "address_id"), ("address", "address_id")))
        .relation(RelationEdge::has_many(("store", "store_id"), ("staff", "store_id")))
        .relation(RelationEdge::belongs_to(("film", "language_id"), ("language", "language_id")))
        .relation(RelationEdge::has_many(("language", "language_id"), ("film", "language_id")))
        .relation(RelationEdge::many_to_many(
            ("film", "film_id"),
            ("film_actor", "film_id", "actor_id"),
            ("actor", "actor_id"),
        ))
        .relation(RelationEdge::many_to_many(
            ("actor", "actor_id"),
            ("film_actor", "actor_id", "film_id"),
            ("film", "film_id"),
        ))
        .build()
        .expect("fixture schema is valid")
}

pub fn settings(dialect: DialectKind) -> CompilerSettings {
    CompilerSettings {
        dialect,
        ..CompilerSettings::default()
    }
}

pub fn compiler(dialect: DialectKind) -> FilterCompiler {
    FilterCompiler::from_graph(sakila(), settings(dialect))
}

pub fn parameterized(dialect: DialectKind) -> FilterCompiler {
    FilterCompiler::from_graph(
        sakila(),
        CompilerSettings {
            literal_mode: LiteralMode::Parameterized,
            ..settings(dialect)
        },
    )
}

/// Fixed reference instant for relative date filters: 2024-03-15 10:30 UTC.
pub fn fixed_ctx() -> CompileContext {
    CompileContext::at(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
}

pub fn compile_at(
    compiler: &FilterCompiler,
    root: &str,
    filter: &Value,
) -> Result<CompiledQuery, CompileError> {
    compiler.compile_source(root, FilterSource::Json(filter), &fixed_ctx())
}

/// Compiles with mysql and returns the SQL.
pub fn mysql_sql(root: &str, filter: Value) -> String {
    compiler(DialectKind::MySql)
        .compile(root, &filter)
        .expect("filter compiles")
        .sql
}
