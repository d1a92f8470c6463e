//! SELECT query builder using the unified expression layer.

use crate::error::{OrmError, OrmResult};
use crate::field::{AsField, Field};
use crate::qb::expr::Expr;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, SqlQb};

#[derive(Clone, Debug, PartialEq)]
struct Join {
    keyword: &'static str,
    table: String,
    on: Expr,
}

/// SELECT query builder.
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    /// SELECT list; empty renders `*`
    fields: Vec<Expr>,
    /// FROM table
    table: String,
    joins: Vec<Join>,
    /// WHERE conditions, AND-joined
    conditions: Vec<Expr>,
    excludes: Vec<Field>,
    group_by: Vec<Expr>,
    /// HAVING conditions, AND-joined
    having: Vec<Expr>,
    order_by: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQb {
    pub fn new(fields: Vec<Expr>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Append more SELECT expressions.
    pub fn add_fields(mut self, fields: impl IntoIterator<Item = Expr>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Drop a selected expression whose rendered SQL equals this field's.
    pub fn exclude(mut self, field: &impl AsField) -> Self {
        self.excludes.push(field.field().clone());
        self
    }

    // ==================== JOIN ====================

    pub fn join(mut self, table: impl Into<String>, on: Expr) -> Self {
        self.joins.push(Join {
            keyword: "JOIN",
            table: table.into(),
            on,
        });
        self
    }

    pub fn left_join(mut self, table: impl Into<String>, on: Expr) -> Self {
        self.joins.push(Join {
            keyword: "LEFT JOIN",
            table: table.into(),
            on,
        });
        self
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.conditions.push(cond);
        self
    }

    pub fn and_where_all(mut self, conds: impl IntoIterator<Item = Expr>) -> Self {
        self.conditions.extend(conds);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn and_having(mut self, cond: Expr) -> Self {
        self.having.push(cond);
        self
    }

    // ==================== ORDER / LIMIT ====================

    /// Add an ORDER BY entry, typically `field.desc()`.
    pub fn order_by(mut self, order: Expr) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    // ==================== Build ====================

    fn build_fields(&self, params: &mut ParamList) -> OrmResult<String> {
        if self.fields.is_empty() {
            return Ok("*".to_string());
        }
        let excluded: Vec<String> = self.excludes.iter().map(Field::to_sql).collect();
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let mark = params.len();
            let sql = field
                .build(params)
                .map_err(|e| OrmError::render("failed to build select field", e))?;
            if sql.is_empty() || excluded.contains(&sql) {
                params.truncate(mark);
                continue;
            }
            parts.push(sql);
        }
        if parts.is_empty() {
            return Err(OrmError::build("all selected fields are excluded"));
        }
        Ok(parts.join(", "))
    }

    fn build_select(&self) -> OrmResult<BuiltQuery> {
        if self.table.is_empty() {
            return Err(OrmError::build("from table is required"));
        }
        if self.fields.is_empty() && !self.excludes.is_empty() {
            return Err(OrmError::build("exclude fields without selected fields"));
        }

        let mut params = ParamList::new();
        let mut sql = String::from("SELECT ");
        sql.push_str(&self.build_fields(&mut params)?);
        sql.push_str(" FROM `");
        sql.push_str(&self.table);
        sql.push('`');

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.keyword);
            sql.push_str(" `");
            sql.push_str(&join.table);
            sql.push('`');
            let on = join
                .on
                .build(&mut params)
                .map_err(|e| OrmError::render("failed to build join condition", e))?;
            if !on.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&on);
            }
        }

        let where_sql = join_clause(&self.conditions, " AND ", &mut params, "where condition")?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        let group_sql = join_clause(&self.group_by, ", ", &mut params, "group by field")?;
        if !group_sql.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_sql);
        }

        let having_sql = join_clause(&self.having, " AND ", &mut params, "having condition")?;
        if !having_sql.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        let order_sql = join_clause(&self.order_by, ", ", &mut params, "order by field")?;
        if !order_sql.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_sql);
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {offset},{limit}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" OFFSET {offset}")),
            (None, None) => {}
        }

        Ok(BuiltQuery::new(sql, params.into_vec()))
    }
}

/// Render a clause list, skipping empty entries.
pub(crate) fn join_clause(
    exprs: &[Expr],
    sep: &str,
    params: &mut ParamList,
    what: &str,
) -> OrmResult<String> {
    let mut parts = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let sql = expr
            .build(params)
            .map_err(|e| OrmError::render(format!("failed to build {what}"), e))?;
        if !sql.is_empty() {
            parts.push(sql);
        }
    }
    Ok(parts.join(sep))
}

impl SqlQb for SelectQb {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_select()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Int64Field, StringField};
    use crate::value::Value;

    fn users() -> (Int64Field, StringField) {
        (Int64Field::new("users", "id"), StringField::new("users", "name"))
    }

    #[test]
    fn test_empty_field_list_selects_star() {
        let sql = SelectQb::new(vec![]).from("users").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `users`");
    }

    #[test]
    fn test_missing_from_is_an_error() {
        let (id, _) = users();
        let err = SelectQb::new(vec![id.expr()]).build().unwrap_err();
        assert_eq!(err.to_string(), "Build error: from table is required");
    }

    #[test]
    fn test_exclude_drops_matching_field() {
        let (id, name) = users();
        let built = SelectQb::new(vec![id.expr(), name.expr()])
            .from("users")
            .exclude(&name)
            .build()
            .unwrap();
        assert_eq!(built.sql, "SELECT `users`.`id` FROM `users`");
    }

    #[test]
    fn test_exclude_without_fields_fails() {
        let (id, _) = users();
        let err = SelectQb::new(vec![])
            .from("users")
            .exclude(&id)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("exclude fields without selected fields"));
    }

    #[test]
    fn test_where_skips_noops() {
        let (id, name) = users();
        let built = SelectQb::new(vec![id.expr()])
            .from("users")
            .and_where(name.contains(""))
            .and_where(id.gt(5))
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT `users`.`id` FROM `users` WHERE `users`.`id` > ?"
        );
        assert_eq!(built.params, vec![Value::Int64(5)]);
    }

    #[test]
    fn test_join_with_empty_condition_has_no_on() {
        let (id, _) = users();
        let sql = SelectQb::new(vec![id.expr()])
            .from("users")
            .join("posts", Expr::Noop)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT `users`.`id` FROM `users` JOIN `posts`");
    }

    #[test]
    fn test_limit_and_offset_forms() {
        let base = SelectQb::new(vec![]).from("users");
        assert_eq!(
            base.clone().limit(10).offset(20).to_sql().unwrap(),
            "SELECT * FROM `users` LIMIT 20,10"
        );
        assert_eq!(
            base.clone().limit(5).to_sql().unwrap(),
            "SELECT * FROM `users` LIMIT 5"
        );
        assert_eq!(
            base.offset(7).to_sql().unwrap(),
            "SELECT * FROM `users` OFFSET 7"
        );
    }

    #[test]
    fn test_where_error_is_wrapped() {
        let (id, _) = users();
        let err = SelectQb::new(vec![])
            .from("users")
            .and_where(id.in_(Vec::<i64>::new()))
            .build()
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to build where condition: "));
    }
}
