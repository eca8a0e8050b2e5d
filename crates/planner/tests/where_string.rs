mod helpers;

#[cfg(test)]
mod tests {
    use crate::helpers::{compiler, sakila, settings};
    use model::schema::{column::Column, table::Table, ui_type::UiType};
    use planner::{ErrorKind, FilterCompiler};
    use query_builder::dialect::DialectKind;
    use serde_json::json;

    fn predicate(root: &str, filter: &str) -> String {
        compiler(DialectKind::MySql)
            .compile_where_string(root, filter)
            .unwrap()
            .predicate
            .unwrap_or_default()
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            predicate("film", "(title,eq,Alien)~and((length,gt,100)~or(length,lt,60))"),
            "`title` = 'Alien' and ((`length` > 100) or (`length` < 60))"
        );
        assert_eq!(
            predicate("film", "(title,eq,A)~and(length,gt,1)~or(title,eq,B)"),
            "(`title` = 'A' and `length` > 1) or (`title` = 'B')"
        );
    }

    #[test]
    fn test_negating_connectives() {
        assert_eq!(
            predicate("film", "(title,like,al)~not(rating,eq,PG)"),
            "`title` like '%al%' and not (`rating` = 'PG')"
        );
        assert_eq!(
            predicate("film", "~not(title,eq,x)"),
            "not (`title` = 'x')"
        );
    }

    #[test]
    fn test_legacy_operators_and_lists() {
        assert_eq!(
            predicate("film", "(title,is,null)~and(length,in,90,120)~and(rating,ne,G)"),
            "`title` is null and `length` in (90, 120) and (`rating` <> 'G' or `rating` is null)"
        );
    }

    #[test]
    fn test_dotted_fields_plan_joins() {
        let query = compiler(DialectKind::MySql)
            .compile_where_string("country", "(city.address.phone,eq,555)")
            .unwrap();
        assert_eq!(query.join_clauses.len(), 2);
        assert_eq!(query.predicate.as_deref(), Some("`address1`.`phone` = '555'"));
    }

    #[test]
    fn test_json_and_where_string_agree() {
        let compiler = compiler(DialectKind::Postgres);
        let from_string = compiler
            .compile_where_string("country", "(city.city,eq,Oslo)~and(country,neq,x)")
            .unwrap();
        let from_json = compiler
            .compile(
                "country",
                &json!({"city": {"relationType": "hm", "city": {"eq": "Oslo"}}, "country": {"neq": "x"}}),
            )
            .unwrap();
        assert_eq!(from_string, from_json);
    }

    #[test]
    fn test_syntax_and_resolution_errors() {
        let compiler = compiler(DialectKind::MySql);
        let kind = |filter: &str| compiler.compile_where_string("film", filter).unwrap_err().kind();

        assert_eq!(kind("(title,eq,x"), ErrorKind::MalformedCondition);
        assert_eq!(kind("(studio.name,eq,x)"), ErrorKind::RelationNotFound);
        assert_eq!(kind("(title,resembles,x)"), ErrorKind::UnsupportedOperator);
        assert_eq!(kind("(title,is,x)"), ErrorKind::UnsupportedOperator);
    }

    #[test]
    fn test_schema_swaps_apply_to_later_compilations() {
        let compiler = FilterCompiler::from_graph(sakila(), settings(DialectKind::MySql));
        assert_eq!(
            compiler
                .compile_where_string("test", "(b,eq,1)")
                .unwrap_err()
                .kind(),
            ErrorKind::ColumnNotFound
        );

        let graph = model::schema::graph::SchemaGraph::builder()
            .table(
                Table::new("test")
                    .column(Column::new("id", UiType::Id))
                    .column(Column::new("b", UiType::Number)),
            )
            .build()
            .unwrap();
        let version = compiler.schema().replace(graph);
        assert_eq!(version, 2);

        let query = compiler.compile_where_string("test", "(b,eq,1)").unwrap();
        assert_eq!(query.predicate.as_deref(), Some("`b` = 1"));
    }
}
