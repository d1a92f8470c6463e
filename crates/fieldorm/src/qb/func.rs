//! SQL function calls and aggregates.

use crate::qb::expr::Expr;
use crate::value::Value;

/// Arbitrary function call: `NAME(a, b, ...)`.
///
/// ```ignore
/// func("JSON_EXTRACT", exprs![&data, "$.name"])  // JSON_EXTRACT(`t`.`data`, ?)
/// ```
pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Func {
        name: name.into(),
        args,
    }
}

macro_rules! unary_funcs {
    ($($(#[$meta:meta])* $fn_name:ident => $sql:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $fn_name(expr: impl Into<Expr>) -> Expr {
                func($sql, vec![expr.into()])
            }
        )*
    };
}

macro_rules! variadic_funcs {
    ($($(#[$meta:meta])* $fn_name:ident => $sql:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $fn_name(args: Vec<Expr>) -> Expr {
                func($sql, args)
            }
        )*
    };
}

/// Functions whose first argument is a JSON document followed by any number
/// of paths or path/value pairs.
macro_rules! json_doc_funcs {
    ($($fn_name:ident => $sql:literal;)*) => {
        $(
            pub fn $fn_name(json: impl Into<Expr>, rest: Vec<Expr>) -> Expr {
                let mut args = Vec::with_capacity(rest.len() + 1);
                args.push(json.into());
                args.extend(rest);
                func($sql, args)
            }
        )*
    };
}

unary_funcs! {
    /// `DATE(expr)`: the date part of a datetime.
    date => "DATE";
    upper => "UPPER";
    lower => "LOWER";
    length => "LENGTH";
    trim => "TRIM";
    json_unquote => "JSON_UNQUOTE";
    json_length => "JSON_LENGTH";
    json_type => "JSON_TYPE";
    json_valid => "JSON_VALID";
    json_keys => "JSON_KEYS";
}

variadic_funcs! {
    coalesce => "COALESCE";
    concat => "CONCAT";
    json_array => "JSON_ARRAY";
    /// Alternating keys and values.
    json_object => "JSON_OBJECT";
}

json_doc_funcs! {
    json_set => "JSON_SET";
    json_insert => "JSON_INSERT";
    json_replace => "JSON_REPLACE";
    json_remove => "JSON_REMOVE";
}

pub fn ifnull(expr: impl Into<Expr>, default: impl Into<Expr>) -> Expr {
    func("IFNULL", vec![expr.into(), default.into()])
}

pub fn json_extract(json: impl Into<Expr>, path: impl Into<Expr>) -> Expr {
    func("JSON_EXTRACT", vec![json.into(), path.into()])
}

pub fn json_contains(json: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    func("JSON_CONTAINS", vec![json.into(), value.into()])
}

/// `JSON_SEARCH(json, 'one'|'all', needle)`
pub fn json_search(
    json: impl Into<Expr>,
    one_or_all: impl Into<Expr>,
    needle: impl Into<Expr>,
) -> Expr {
    func(
        "JSON_SEARCH",
        vec![json.into(), one_or_all.into(), needle.into()],
    )
}

pub fn rand() -> Expr {
    func("RAND", Vec::new())
}

pub fn now() -> Expr {
    func("NOW", Vec::new())
}

/// An aggregate call such as `COUNT(x)`.
///
/// Converts into an [`Expr`] for select lists, and offers the comparisons
/// needed for HAVING.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    name: &'static str,
    target: Expr,
}

impl Aggregate {
    fn new(name: &'static str, target: Expr) -> Self {
        Self { name, target }
    }

    pub fn expr(&self) -> Expr {
        func(self.name, vec![self.target.clone()])
    }

    pub fn eq(&self, value: impl Into<Value>) -> Expr {
        self.compare("=", value.into())
    }

    pub fn gt(&self, value: impl Into<Value>) -> Expr {
        self.compare(">", value.into())
    }

    pub fn gte(&self, value: impl Into<Value>) -> Expr {
        self.compare(">=", value.into())
    }

    pub fn lt(&self, value: impl Into<Value>) -> Expr {
        self.compare("<", value.into())
    }

    pub fn lte(&self, value: impl Into<Value>) -> Expr {
        self.compare("<=", value.into())
    }

    pub fn as_(&self, alias: impl Into<String>) -> Expr {
        self.expr().as_(alias)
    }

    pub fn asc(&self) -> Expr {
        self.expr().asc()
    }

    pub fn desc(&self) -> Expr {
        self.expr().desc()
    }

    fn compare(&self, op: &'static str, value: Value) -> Expr {
        Expr::compare(self.expr(), op, Expr::Value(value))
    }
}

impl From<Aggregate> for Expr {
    fn from(agg: Aggregate) -> Self {
        agg.expr()
    }
}

impl From<&Aggregate> for Expr {
    fn from(agg: &Aggregate) -> Self {
        agg.expr()
    }
}

pub fn count(expr: impl Into<Expr>) -> Aggregate {
    Aggregate::new("COUNT", expr.into())
}

/// `COUNT(*)`
pub fn count_all() -> Aggregate {
    Aggregate::new("COUNT", Expr::raw("*", Vec::<Value>::new()))
}

pub fn max(expr: impl Into<Expr>) -> Aggregate {
    Aggregate::new("MAX", expr.into())
}

pub fn min(expr: impl Into<Expr>) -> Aggregate {
    Aggregate::new("MIN", expr.into())
}

pub fn sum(expr: impl Into<Expr>) -> Aggregate {
    Aggregate::new("SUM", expr.into())
}

pub fn avg(expr: impl Into<Expr>) -> Aggregate {
    Aggregate::new("AVG", expr.into())
}
