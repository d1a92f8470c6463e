//! UPDATE query builder using the unified expression layer.

use crate::error::{OrmError, OrmResult};
use crate::field::AsField;
use crate::qb::expr::Expr;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQb, SqlQb};
use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
struct Assignment {
    column: String,
    sql: String,
    params: Vec<Value>,
}

/// `` `col`=<expr> `` assignments shared by INSERT ... SET and UPDATE.
///
/// Values are rendered as soon as they are set; the first failure is kept
/// and every later `set` is ignored.
#[derive(Clone, Debug, Default)]
pub(crate) struct SetList {
    assignments: Vec<Assignment>,
    error: Option<OrmError>,
}

impl SetList {
    pub(crate) fn push(&mut self, field: &impl AsField, value: Expr) {
        if self.error.is_some() {
            return;
        }
        let column = field.field().name().to_string();
        match value.render() {
            Ok((sql, params)) => self.assignments.push(Assignment {
                column,
                sql,
                params,
            }),
            Err(e) => self.error = Some(OrmError::render(format!("SET field '{column}'"), e)),
        }
    }

    pub(crate) fn staged_error(&self) -> OrmResult<()> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.assignments.len()
    }

    pub(crate) fn write(&self, sql: &mut String, params: &mut ParamList) {
        for (i, a) in self.assignments.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('`');
            sql.push_str(&a.column);
            sql.push_str("`=");
            sql.push_str(&a.sql);
            params.extend_values(a.params.iter().cloned());
        }
    }
}

/// UPDATE query builder.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    sets: SetList,
    /// WHERE conditions, joined inline with AND
    conditions: Vec<Expr>,
}

impl UpdateQb {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: SetList::default(),
            conditions: Vec::new(),
        }
    }

    /// Add `` `field`=<value> `` to the SET clause.
    pub fn set(mut self, field: &impl AsField, value: impl Into<Expr>) -> Self {
        self.sets.push(field, value.into());
        self
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.conditions.push(cond);
        self
    }

    pub fn and_where_all(mut self, conds: impl IntoIterator<Item = Expr>) -> Self {
        self.conditions.extend(conds);
        self
    }

    /// Number of SET assignments collected so far.
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    fn build_update(&self) -> OrmResult<BuiltQuery> {
        self.sets.staged_error()?;
        if self.table.is_empty() {
            return Err(OrmError::build("table name is required"));
        }
        if self.sets.is_empty() {
            return Err(OrmError::build("at least one SET expression is required"));
        }

        let mut params = ParamList::new();
        let mut sql = format!("UPDATE `{}` SET ", self.table);
        self.sets.write(&mut sql, &mut params);

        let where_sql = crate::qb::select::join_clause(
            &self.conditions,
            " AND ",
            &mut params,
            "where condition",
        )?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        Ok(BuiltQuery::new(sql, params.into_vec()))
    }
}

impl SqlQb for UpdateQb {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_update()
    }
}

impl MutationQb for UpdateQb {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Int32Field, Int64Field, StringField};

    #[test]
    fn test_update_with_where() {
        let id = Int64Field::new("users", "id");
        let name = StringField::new("users", "name");
        let built = UpdateQb::new("users")
            .set(&name, "bob")
            .and_where(id.eq(1))
            .build()
            .unwrap();
        assert_eq!(built.sql, "UPDATE `users` SET `name`=? WHERE `users`.`id` = ?");
        assert_eq!(built.params, vec![Value::from("bob"), Value::Int64(1)]);
    }

    #[test]
    fn test_increment_in_set() {
        let id = Int64Field::new("users", "id");
        let age = Int32Field::new("users", "age");
        let name = StringField::new("users", "name");
        let built = UpdateQb::new("users")
            .set(&name, "bob")
            .set(&age, age.increment(1))
            .and_where(id.eq(1))
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "UPDATE `users` SET `name`=?, `age`=`users`.`age`+? WHERE `users`.`id` = ?"
        );
        assert_eq!(
            built.params,
            vec![Value::from("bob"), Value::Int32(1), Value::Int64(1)]
        );
    }

    #[test]
    fn test_empty_conditions_omit_where() {
        let name = StringField::new("users", "name");
        let sql = UpdateQb::new("users")
            .set(&name, "x")
            .and_where(name.contains(""))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE `users` SET `name`=?");
    }

    #[test]
    fn test_requires_table_and_set() {
        let name = StringField::new("users", "name");
        let err = UpdateQb::new("").set(&name, "x").build().unwrap_err();
        assert_eq!(err.to_string(), "Build error: table name is required");
        let err = UpdateQb::new("users").build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Build error: at least one SET expression is required"
        );
    }

    #[test]
    fn test_first_set_error_is_staged() {
        let id = Int64Field::new("users", "id");
        let name = StringField::new("users", "name");
        let qb = UpdateQb::new("users")
            .set(&name, Expr::Invalid("bad value".into()))
            .set(&id, 3i64);
        assert_eq!(qb.set_count(), 0);
        let err = qb.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "SET field 'name': Invalid expression: bad value"
        );
    }
}
