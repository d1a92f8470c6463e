//! Unified expression layer for select lists, conditions and SET values.
//!
//! Every node renders to a SQL fragment plus the values for its `?`
//! placeholders. Values are pushed into a shared [`ParamList`] while the
//! fragment is produced, so the placeholder order always matches the
//! argument order without any string rewriting.
//!
//! A node that renders to an empty fragment is a *no-op*. Combinators and
//! clause lists drop no-ops, which is what makes conditional filters such as
//! [`optional`](crate::qb::optional) or an empty `contains("")` compose.

use crate::error::{OrmError, OrmResult};
use crate::field::Field;
use crate::qb::param::ParamList;
use crate::value::Value;
use chrono::{DateTime, Utc};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Renders nothing; dropped by combinators.
    Noop,

    /// Column reference.
    Column(Field),

    /// Literal bound as a single `?`.
    Value(Value),

    /// SQL fragment with its own `?` placeholders and their values.
    Raw { sql: String, params: Vec<Value> },

    /// `left op right`
    Compare {
        left: Box<Expr>,
        op: &'static str,
        right: Box<Expr>,
    },

    /// `target IN (?, ?, ...)`; rendering fails when `values` is empty.
    In { target: Box<Expr>, values: Vec<Value> },

    /// `target BETWEEN start AND end`
    Between {
        target: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },

    /// `target IS NULL` / `target IS NOT NULL`
    NullCheck { target: Box<Expr>, is_null: bool },

    And(Vec<Expr>),

    Or(Vec<Expr>),

    /// `NOT (a AND b ...)`
    Not(Vec<Expr>),

    Paren(Box<Expr>),

    /// Flat infix chain: `a + b + c`.
    Math { op: &'static str, operands: Vec<Expr> },

    /// `` `table`.`field`<op>? ``, used for increments in SET clauses.
    FieldOp {
        field: Field,
        op: &'static str,
        value: Value,
    },

    /// `NAME(arg, ...)`
    Func { name: String, args: Vec<Expr> },

    /// ``expr AS `alias` ``
    Alias { expr: Box<Expr>, alias: String },

    /// `expr ASC` / `expr DESC`
    Order { expr: Box<Expr>, desc: bool },

    /// An expression that was already known to be unrenderable when it was
    /// constructed (e.g. a value that failed to serialize).
    Invalid(String),
}

impl Expr {
    pub fn compare(left: Expr, op: &'static str, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn in_list(target: Expr, values: Vec<Value>) -> Self {
        Expr::In {
            target: Box::new(target),
            values,
        }
    }

    pub fn between(target: Expr, start: Expr, end: Expr) -> Self {
        Expr::Between {
            target: Box::new(target),
            start: Box::new(start),
            end: Box::new(end),
        }
    }

    pub fn null_check(target: Expr, is_null: bool) -> Self {
        Expr::NullCheck {
            target: Box::new(target),
            is_null,
        }
    }

    pub fn field_op(field: Field, op: &'static str, value: Value) -> Self {
        Expr::FieldOp { field, op, value }
    }

    /// A fragment with `?` placeholders, e.g. `raw("a = ? OR b = ?", [1, 2])`.
    pub fn raw<V: Into<Value>>(sql: impl Into<String>, params: impl IntoIterator<Item = V>) -> Self {
        Expr::Raw {
            sql: sql.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Append `` AS `alias` ``.
    pub fn as_(self, alias: impl Into<String>) -> Self {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }

    pub fn asc(self) -> Self {
        Expr::Order {
            expr: Box::new(self),
            desc: false,
        }
    }

    pub fn desc(self) -> Self {
        Expr::Order {
            expr: Box::new(self),
            desc: true,
        }
    }

    /// Render to a standalone fragment and its arguments.
    pub fn render(&self) -> OrmResult<(String, Vec<Value>)> {
        let mut params = ParamList::new();
        let sql = self.build(&mut params)?;
        Ok((sql, params.into_vec()))
    }

    /// Render into `params`, returning the fragment.
    ///
    /// On error the contents of `params` are unspecified; callers abandon the
    /// whole statement.
    pub fn build(&self, params: &mut ParamList) -> OrmResult<String> {
        match self {
            Expr::Noop => Ok(String::new()),
            Expr::Column(field) => Ok(field.to_sql()),
            Expr::Value(value) => {
                params.push(value.clone());
                Ok("?".to_string())
            }
            Expr::Raw { sql, params: values } => {
                params.extend_values(values.iter().cloned());
                Ok(sql.clone())
            }
            Expr::Compare { left, op, right } => {
                let left = left.build(params)?;
                let right = right.build(params)?;
                Ok(format!("{left} {op} {right}"))
            }
            Expr::In { target, values } => {
                if values.is_empty() {
                    return Err(OrmError::InvalidExpr(
                        "IN requires at least one value".to_string(),
                    ));
                }
                let target = target.build(params)?;
                let placeholders = vec!["?"; values.len()].join(", ");
                params.extend_values(values.iter().cloned());
                Ok(format!("{target} IN ({placeholders})"))
            }
            Expr::Between { target, start, end } => {
                let target = target.build(params)?;
                let start = start.build(params)?;
                let end = end.build(params)?;
                Ok(format!("{target} BETWEEN {start} AND {end}"))
            }
            Expr::NullCheck { target, is_null } => {
                let target = target.build(params)?;
                if *is_null {
                    Ok(format!("{target} IS NULL"))
                } else {
                    Ok(format!("{target} IS NOT NULL"))
                }
            }
            Expr::And(exprs) => build_group(exprs, " AND ", params),
            Expr::Or(exprs) => build_group(exprs, " OR ", params),
            Expr::Not(exprs) => {
                let parts = build_parts(exprs, params)?;
                if parts.is_empty() {
                    return Ok(String::new());
                }
                Ok(format!("NOT ({})", parts.join(" AND ")))
            }
            Expr::Paren(inner) => {
                let sql = inner.build(params)?;
                if sql.is_empty() {
                    return Ok(sql);
                }
                Ok(format!("({sql})"))
            }
            Expr::Math { op, operands } => {
                let parts = build_parts(operands, params)?;
                Ok(parts.join(&format!(" {op} ")))
            }
            Expr::FieldOp { field, op, value } => {
                params.push(value.clone());
                Ok(format!("{}{op}?", field.qualified_sql()))
            }
            Expr::Func { name, args } => {
                let mut parts = Vec::with_capacity(args.len());
                for (i, arg) in args.iter().enumerate() {
                    let sql = arg
                        .build(params)
                        .map_err(|e| OrmError::render(format!("arg[{i}]"), e))?;
                    parts.push(sql);
                }
                Ok(format!("{name}({})", parts.join(", ")))
            }
            Expr::Alias { expr, alias } => {
                let sql = expr.build(params)?;
                if sql.is_empty() {
                    return Ok(sql);
                }
                Ok(format!("{sql} AS `{alias}`"))
            }
            Expr::Order { expr, desc } => {
                let sql = match expr.as_ref() {
                    Expr::Column(field) => field.qualified_sql(),
                    other => other.build(params)?,
                };
                if sql.is_empty() {
                    return Ok(sql);
                }
                let dir = if *desc { "DESC" } else { "ASC" };
                Ok(format!("{sql} {dir}"))
            }
            Expr::Invalid(message) => Err(OrmError::InvalidExpr(message.clone())),
        }
    }
}

/// Render each expression, dropping the empty ones.
fn build_parts(exprs: &[Expr], params: &mut ParamList) -> OrmResult<Vec<String>> {
    let mut parts = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let sql = expr.build(params)?;
        if !sql.is_empty() {
            parts.push(sql);
        }
    }
    Ok(parts)
}

fn build_group(exprs: &[Expr], sep: &str, params: &mut ParamList) -> OrmResult<String> {
    let mut parts = build_parts(exprs, params)?;
    match parts.len() {
        0 => Ok(String::new()),
        1 => Ok(parts.remove(0)),
        _ => Ok(format!("({})", parts.join(sep))),
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

macro_rules! literal_into_expr {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Value(Value::from(v))
                }
            }
        )*
    };
}

literal_into_expr!(&str, String, i32, i64, f64, bool, DateTime<Utc>);

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Expr {
        Expr::Column(Field::new("t", name))
    }

    fn eq(name: &str, v: impl Into<Value>) -> Expr {
        Expr::compare(col(name), "=", Expr::Value(v.into()))
    }

    #[test]
    fn test_simple_compare() {
        let expr = eq("name", "alice");
        let mut params = ParamList::new();
        let sql = expr.build(&mut params).unwrap();
        assert_eq!(sql, "`t`.`name` = ?");
        assert_eq!(params.as_slice(), &[Value::from("alice")]);
    }

    #[test]
    fn test_and_group_is_parenthesized() {
        let expr = Expr::And(vec![eq("a", 1), eq("b", 2)]);
        let (sql, args) = expr.render().unwrap();
        assert_eq!(sql, "(`t`.`a` = ? AND `t`.`b` = ?)");
        assert_eq!(args, vec![Value::Int32(1), Value::Int32(2)]);
    }

    #[test]
    fn test_single_operand_group_is_verbatim() {
        let (sql, _) = Expr::Or(vec![Expr::Noop, eq("a", 1)]).render().unwrap();
        assert_eq!(sql, "`t`.`a` = ?");
    }

    #[test]
    fn test_empty_groups_are_noops() {
        assert_eq!(Expr::And(vec![]).render().unwrap().0, "");
        assert_eq!(Expr::Or(vec![Expr::Noop, Expr::Noop]).render().unwrap().0, "");
        assert_eq!(Expr::Not(vec![Expr::Noop]).render().unwrap().0, "");
        assert_eq!(Expr::Paren(Box::new(Expr::Noop)).render().unwrap().0, "");
    }

    #[test]
    fn test_nested_and_or() {
        let expr = Expr::And(vec![
            eq("status", "active"),
            Expr::Or(vec![eq("role", "admin"), eq("role", "root")]),
        ]);
        let (sql, args) = expr.render().unwrap();
        assert_eq!(
            sql,
            "(`t`.`status` = ? AND (`t`.`role` = ? OR `t`.`role` = ?))"
        );
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_not_and_combines() {
        let (sql, args) = Expr::Not(vec![eq("a", 1), eq("b", 2)]).render().unwrap();
        assert_eq!(sql, "NOT (`t`.`a` = ? AND `t`.`b` = ?)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_math_chain_drops_noops() {
        let expr = Expr::Math {
            op: "+",
            operands: vec![col("a"), Expr::Noop, Expr::Value(Value::Int64(3)), col("b")],
        };
        let (sql, args) = expr.render().unwrap();
        assert_eq!(sql, "`t`.`a` + ? + `t`.`b`");
        assert_eq!(args, vec![Value::Int64(3)]);
    }

    #[test]
    fn test_func_error_carries_arg_index() {
        let expr = Expr::Func {
            name: "COALESCE".to_string(),
            args: vec![col("a"), Expr::in_list(col("b"), vec![])],
        };
        let err = expr.render().unwrap_err();
        assert!(err.to_string().starts_with("arg[1]: "));
        assert!(matches!(err.root_cause(), OrmError::InvalidExpr(_)));
    }

    #[test]
    fn test_order_on_bare_column_keeps_empty_table_prefix() {
        let (sql, _) = Expr::Column(Field::bare("cnt")).desc().render().unwrap();
        assert_eq!(sql, "``.`cnt` DESC");
        let (sql, _) = col("id").asc().render().unwrap();
        assert_eq!(sql, "`t`.`id` ASC");
    }

    #[test]
    fn test_raw_keeps_params_in_order() {
        let expr = Expr::And(vec![Expr::raw("a = ? OR b = ?", [1i64, 2]), eq("c", 3i64)]);
        let (sql, args) = expr.render().unwrap();
        assert_eq!(sql, "(a = ? OR b = ? AND `t`.`c` = ?)");
        assert_eq!(
            args,
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]
        );
    }

    #[test]
    fn test_alias_leaves_args_alone() {
        let (sql, args) = Expr::Value(Value::from("x")).as_("label").render().unwrap();
        assert_eq!(sql, "? AS `label`");
        assert_eq!(args, vec![Value::from("x")]);
    }

    #[test]
    fn test_alias_and_order_of_noop_stay_empty() {
        assert_eq!(Expr::Noop.as_("n").render().unwrap(), (String::new(), vec![]));
        assert_eq!(Expr::Noop.desc().render().unwrap().0, "");
    }
}
