use crate::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, Ident, LogicalOperator},
    dialect::ConcatStyle,
    render::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::Logical { op, operands } => {
                let sep = match op {
                    LogicalOperator::And => " and ",
                    LogicalOperator::Or => " or ",
                };
                render_list(r, operands, sep);
            }
            Expr::Nested(inner) => {
                r.sql.push('(');
                inner.render(r);
                r.sql.push(')');
            }
            Expr::Not(inner) => {
                r.sql.push_str("not ");
                inner.render(r);
            }
            Expr::IsNull { expr, negated } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " is not null" } else { " is null" });
            }
            Expr::Like {
                expr,
                pattern,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " not like " } else { " like " });
                pattern.render(r);
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " not in (" } else { " in (" });
                render_list(r, list, ", ");
                r.sql.push(')');
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " not between " } else { " between " });
                low.render(r);
                r.sql.push_str(" and ");
                high.render(r);
            }
            Expr::Concat(parts) => match r.dialect.concat_style() {
                ConcatStyle::Function => {
                    r.sql.push_str("concat(");
                    render_list(r, parts, ", ");
                    r.sql.push(')');
                }
                ConcatStyle::Operator => {
                    r.sql.push('(');
                    render_list(r, parts, " || ");
                    r.sql.push(')');
                }
            },
            Expr::Wildcard => r.sql.push('*'),
        }
    }
}

fn render_list(r: &mut Renderer, items: &[Expr], sep: &str) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(sep);
        }
        item.render(r);
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.push_ident(qualifier);
            r.sql.push('.');
        }
        r.push_ident(&self.name);
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::expr::Expr,
        dialect::{MsSql, MySql, Postgres},
        ident, qualified,
        render::{LiteralMode, render_with},
        value,
    };
    use model::core::value::Value;

    #[test]
    fn test_comparisons_render_without_implicit_parens() {
        let expr = Expr::and(vec![
            ident("a").equals(value("x")),
            Expr::any_of(vec![
                ident("b").not_equals(value(1)),
                ident("b").is_null(),
            ]),
        ]);
        let (sql, params) = render_with(&expr, &MySql, LiteralMode::Inline);
        assert_eq!(sql, "`a` = 'x' and (`b` <> 1 or `b` is null)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_not_renders_operand_verbatim() {
        let expr = ident("a").equals(value(1)).nested().negate().nested().negate();
        let (sql, _) = render_with(&expr, &Postgres, LiteralMode::Inline);
        assert_eq!(sql, r#"not (not ("a" = 1))"#);
    }

    #[test]
    fn test_concat_follows_dialect() {
        let concat = Expr::Concat(vec![value(","), qualified("t", "tags"), value(",")]);
        let (mysql, _) = render_with(&concat, &MySql, LiteralMode::Inline);
        let (pg, _) = render_with(&concat, &Postgres, LiteralMode::Inline);
        let (mssql, _) = render_with(&concat, &MsSql, LiteralMode::Inline);
        assert_eq!(mysql, "concat(',', `t`.`tags`, ',')");
        assert_eq!(pg, r#"(',' || "t"."tags" || ',')"#);
        assert_eq!(mssql, "concat(',', [t].[tags], ',')");
    }

    #[test]
    fn test_parameterized_literals() {
        let expr = Expr::and(vec![
            ident("a").in_list(vec![value(1), value(2)], false),
            ident("d").between(value("x"), value("y"), true),
        ]);
        let (sql, params) = render_with(&expr, &Postgres, LiteralMode::Parameterized);
        assert_eq!(sql, r#""a" in ($1, $2) and "d" not between $3 and $4"#);
        assert_eq!(
            params,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::from("x"),
                Value::from("y")
            ]
        );
    }
}
