use crate::{
    ast::{
        common::JoinKind,
        select::{FromClause, JoinClause, Select},
    },
    render::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("select ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" where ");
            where_clause.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("from ");
        if let Some(schema) = &self.table.schema {
            r.push_ident(schema);
            r.sql.push('.');
        }
        r.push_ident(&self.table.name);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" as ");
            r.push_ident(alias);
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::Inner => "inner join ",
            JoinKind::Left => "left join ",
        };
        r.sql.push_str(join_str);
        if let Some(schema) = &self.table.schema {
            r.push_ident(schema);
            r.sql.push('.');
        }
        r.push_ident(&self.table.name);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" as ");
            r.push_ident(alias);
        }
        r.sql.push_str(" on ");
        self.on.render(r);
    }
}
