//! Table definitions: a name plus the ordered list of typed fields.
//!
//! ```ignore
//! let mut table = Table::new("users");
//! let id = table.int64("id");
//! let name = table.string("name");
//! let create_time = table.time("create_time");
//! ```

use crate::field::{
    BoolField, Field, Float64Field, Int32Field, Int64Field, StringField, TimeField,
};
use crate::qb::Expr;
use std::fmt;

/// Declared column type of a table field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Int32,
    Float64,
    String,
    Time,
    Bool,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "Int64Field",
            ColumnType::Int32 => "Int32Field",
            ColumnType::Float64 => "Float64Field",
            ColumnType::String => "StringField",
            ColumnType::Time => "TimeField",
            ColumnType::Bool => "BoolField",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableField {
    pub field: Field,
    pub column_type: ColumnType,
}

impl TableField {
    pub fn name(&self) -> &str {
        self.field.name()
    }
}

/// A table and its registered fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    fields: Vec<TableField>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[TableField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Every field as a select expression, in declaration order.
    pub fn all_fields(&self) -> Vec<Expr> {
        self.fields
            .iter()
            .map(|f| Expr::Column(f.field.clone()))
            .collect()
    }

    fn register(&mut self, name: &str, column_type: ColumnType) -> Field {
        let field = Field::new(self.name.clone(), name);
        self.fields.push(TableField {
            field: field.clone(),
            column_type,
        });
        field
    }

    pub fn int64(&mut self, name: &str) -> Int64Field {
        let field = self.register(name, ColumnType::Int64);
        Int64Field::new(field.table(), field.name())
    }

    pub fn int32(&mut self, name: &str) -> Int32Field {
        let field = self.register(name, ColumnType::Int32);
        Int32Field::new(field.table(), field.name())
    }

    pub fn float64(&mut self, name: &str) -> Float64Field {
        let field = self.register(name, ColumnType::Float64);
        Float64Field::new(field.table(), field.name())
    }

    pub fn string(&mut self, name: &str) -> StringField {
        let field = self.register(name, ColumnType::String);
        StringField::new(field.table(), field.name())
    }

    pub fn time(&mut self, name: &str) -> TimeField {
        let field = self.register(name, ColumnType::Time);
        TimeField::new(field.table(), field.name())
    }

    pub fn bool(&mut self, name: &str) -> BoolField {
        let field = self.register(name, ColumnType::Bool);
        BoolField::new(field.table(), field.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::AsField;

    #[test]
    fn registry_keeps_declaration_order() {
        let mut table = Table::new("users");
        let id = table.int64("id");
        table.string("name");
        table.time("create_time");

        assert_eq!(id.field(), &Field::new("users", "id"));
        let names: Vec<&str> = table.fields().iter().map(TableField::name).collect();
        assert_eq!(names, ["id", "name", "create_time"]);
        assert_eq!(table.field("create_time").unwrap().column_type, ColumnType::Time);
        assert!(table.field("missing").is_none());

        let rendered: Vec<String> = table
            .all_fields()
            .iter()
            .map(|e| e.render().unwrap().0)
            .collect();
        assert_eq!(rendered, ["`users`.`id`", "`users`.`name`", "`users`.`create_time`"]);
    }
}
