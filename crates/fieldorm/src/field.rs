//! Typed column references.
//!
//! A [`Field`] is a `(table, name)` pair. The typed wrappers
//! ([`Int64Field`], [`StringField`], ...) are what [`Table`](crate::Table)
//! hands out; their methods build [`Expr`] conditions with the literal type
//! checked at compile time.

use crate::qb::Expr;
use crate::value::Value;
use chrono::{DateTime, Utc};

/// A column reference, rendered as `` `table`.`name` `` (or `` `name` ``
/// when the table is empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    table: String,
    name: String,
}

impl Field {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    /// A column with no table qualifier.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn to_sql(&self) -> String {
        if self.table.is_empty() {
            format!("`{}`", self.name)
        } else {
            self.qualified_sql()
        }
    }

    /// Always carries the table prefix, even an empty one (`` ``.`x` ``).
    /// ORDER BY and field operations render through this.
    pub(crate) fn qualified_sql(&self) -> String {
        format!("`{}`.`{}`", self.table, self.name)
    }
}

/// Anything that is backed by a single column.
pub trait AsField {
    fn field(&self) -> &Field;

    fn expr(&self) -> Expr {
        Expr::Column(self.field().clone())
    }
}

impl AsField for Field {
    fn field(&self) -> &Field {
        self
    }
}

impl From<Field> for Expr {
    fn from(field: Field) -> Self {
        Expr::Column(field)
    }
}

impl From<&Field> for Expr {
    fn from(field: &Field) -> Self {
        Expr::Column(field.clone())
    }
}

macro_rules! typed_field {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Field);

        impl $name {
            pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
                Self(Field::new(table, name))
            }

            pub fn name(&self) -> &str {
                self.0.name()
            }

            pub fn table(&self) -> &str {
                self.0.table()
            }

            pub fn to_sql(&self) -> String {
                self.0.to_sql()
            }

            pub fn is_null(&self) -> Expr {
                Expr::null_check(self.expr(), true)
            }

            pub fn is_not_null(&self) -> Expr {
                Expr::null_check(self.expr(), false)
            }

            pub fn asc(&self) -> Expr {
                self.expr().asc()
            }

            pub fn desc(&self) -> Expr {
                self.expr().desc()
            }

            pub fn as_(&self, alias: impl Into<String>) -> Expr {
                self.expr().as_(alias)
            }
        }

        impl AsField for $name {
            fn field(&self) -> &Field {
                &self.0
            }
        }

        impl From<$name> for Field {
            fn from(f: $name) -> Self {
                f.0
            }
        }

        impl From<$name> for Expr {
            fn from(f: $name) -> Self {
                Expr::Column(f.0)
            }
        }

        impl From<&$name> for Expr {
            fn from(f: &$name) -> Self {
                Expr::Column(f.0.clone())
            }
        }
    };
}

/// Value comparisons plus the `_field` variants comparing two columns.
macro_rules! comparisons {
    ($name:ident, $ty:ty) => {
        impl $name {
            pub fn eq(&self, value: impl Into<$ty>) -> Expr {
                self.compare("=", value.into())
            }

            pub fn neq(&self, value: impl Into<$ty>) -> Expr {
                self.compare("!=", value.into())
            }

            pub fn gt(&self, value: impl Into<$ty>) -> Expr {
                self.compare(">", value.into())
            }

            pub fn gte(&self, value: impl Into<$ty>) -> Expr {
                self.compare(">=", value.into())
            }

            pub fn lt(&self, value: impl Into<$ty>) -> Expr {
                self.compare("<", value.into())
            }

            pub fn lte(&self, value: impl Into<$ty>) -> Expr {
                self.compare("<=", value.into())
            }

            pub fn eq_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), "=", other.expr())
            }

            pub fn neq_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), "!=", other.expr())
            }

            pub fn gt_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), ">", other.expr())
            }

            pub fn gte_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), ">=", other.expr())
            }

            pub fn lt_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), "<", other.expr())
            }

            pub fn lte_field(&self, other: &impl AsField) -> Expr {
                Expr::compare(self.expr(), "<=", other.expr())
            }

            pub fn between(&self, start: impl Into<$ty>, end: impl Into<$ty>) -> Expr {
                Expr::between(
                    self.expr(),
                    Expr::Value(Value::from(start.into())),
                    Expr::Value(Value::from(end.into())),
                )
            }

            pub fn between_field(&self, start: &impl AsField, end: &impl AsField) -> Expr {
                Expr::between(self.expr(), start.expr(), end.expr())
            }

            fn compare(&self, op: &'static str, value: $ty) -> Expr {
                Expr::compare(self.expr(), op, Expr::Value(Value::from(value)))
            }
        }
    };
}

/// `IN` lists. The strict form fails at render time when empty; the
/// `_or_empty` form degrades to a no-op instead.
macro_rules! in_lists {
    ($name:ident, $ty:ty) => {
        impl $name {
            pub fn in_<V: Into<$ty>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
                let values = values
                    .into_iter()
                    .map(|v| Value::from(v.into()))
                    .collect();
                Expr::in_list(self.expr(), values)
            }

            pub fn in_or_empty<V: Into<$ty>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
                match self.in_(values) {
                    Expr::In { values, .. } if values.is_empty() => Expr::Noop,
                    expr => expr,
                }
            }
        }
    };
}

macro_rules! arithmetic {
    ($name:ident, $ty:ty) => {
        impl $name {
            /// `` `t`.`f`+? ``, for UPDATE SET values.
            pub fn increment(&self, delta: impl Into<$ty>) -> Expr {
                Expr::field_op(self.0.clone(), "+", Value::from(delta.into()))
            }

            /// `` `t`.`f`-? ``, for UPDATE SET values.
            pub fn decrement(&self, delta: impl Into<$ty>) -> Expr {
                Expr::field_op(self.0.clone(), "-", Value::from(delta.into()))
            }
        }
    };
}

typed_field!(
    /// A BIGINT column.
    Int64Field
);
typed_field!(
    /// An INT column.
    Int32Field
);
typed_field!(
    /// A DOUBLE column.
    Float64Field
);
typed_field!(
    /// A VARCHAR/TEXT column.
    StringField
);
typed_field!(
    /// A DATETIME/TIMESTAMP column.
    TimeField
);
typed_field!(
    /// A TINYINT(1) column; booleans are compared as 1/0.
    BoolField
);

comparisons!(Int64Field, i64);
comparisons!(Int32Field, i32);
comparisons!(Float64Field, f64);
comparisons!(StringField, String);
comparisons!(TimeField, DateTime<Utc>);

in_lists!(Int64Field, i64);
in_lists!(Int32Field, i32);
in_lists!(Float64Field, f64);
in_lists!(StringField, String);

arithmetic!(Int64Field, i64);
arithmetic!(Int32Field, i32);
arithmetic!(Float64Field, f64);

impl StringField {
    /// `LIKE ?` with the pattern passed through untouched.
    pub fn like(&self, pattern: impl Into<String>) -> Expr {
        Expr::compare(self.expr(), "LIKE", Expr::Value(Value::String(pattern.into())))
    }

    /// `LIKE %value%`; an empty value is a no-op rather than a match-all.
    pub fn contains(&self, value: impl AsRef<str>) -> Expr {
        self.wildcard("%", value.as_ref(), "%")
    }

    pub fn starts_with(&self, value: impl AsRef<str>) -> Expr {
        self.wildcard("", value.as_ref(), "%")
    }

    pub fn ends_with(&self, value: impl AsRef<str>) -> Expr {
        self.wildcard("%", value.as_ref(), "")
    }

    /// `` `t`.`f`+? `` with a string operand.
    pub fn concat(&self, value: impl Into<String>) -> Expr {
        Expr::field_op(self.0.clone(), "+", Value::String(value.into()))
    }

    fn wildcard(&self, prefix: &str, value: &str, suffix: &str) -> Expr {
        if value.is_empty() {
            return Expr::Noop;
        }
        self.like(format!("{prefix}{value}{suffix}"))
    }
}

impl BoolField {
    pub fn eq(&self, value: bool) -> Expr {
        Expr::compare(self.expr(), "=", Expr::Value(Value::Int32(i32::from(value))))
    }

    pub fn is_true(&self) -> Expr {
        self.eq(true)
    }

    pub fn is_false(&self) -> Expr {
        self.eq(false)
    }
}
