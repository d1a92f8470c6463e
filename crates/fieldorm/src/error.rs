//! Error types for fieldorm

use thiserror::Error;

/// Result type alias for fieldorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and record bindings
#[derive(Debug, Clone, Error)]
pub enum OrmError {
    /// Builder state is incomplete (missing table, empty SET list, ...)
    #[error("Build error: {0}")]
    Build(String),

    /// A sub-expression failed to render
    #[error("{context}: {source}")]
    Render {
        context: String,
        #[source]
        source: Box<OrmError>,
    },

    /// An expression that can never render (e.g. strict IN with no values)
    #[error("Invalid expression: {0}")]
    InvalidExpr(String),

    /// Binding-time mismatch between record, partial and table
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A partial update carried no fields
    #[error("nothing to update")]
    NothingToUpdate,

    /// By-id operation on a table without an `id` field
    #[error("table has no 'id' field")]
    MissingIdField,

    /// Count query on a record without a `count` field
    #[error("model type must have a count field of type i64")]
    MissingCountField,

    /// Caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error reported by the execution engine
    #[error("Engine error: {0}")]
    Engine(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl OrmError {
    /// Create a build error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Wrap an error with the clause or argument that produced it
    pub fn render(context: impl Into<String>, source: OrmError) -> Self {
        Self::Render {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an engine error
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Innermost error, skipping any render context wrappers.
    pub fn root_cause(&self) -> &OrmError {
        match self {
            Self::Render { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Reasons a record/partial/table binding is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("model type must be a struct with at least one field")]
    NotStruct,

    #[error("table must not contain a 'count' field, it is reserved for query operations")]
    ReservedCountColumn,

    #[error("table field '{0}' must be a time field")]
    TimestampColumnType(String),

    #[error(
        "field name must be strict CamelCase (no consecutive uppercase letters): field '{field}' has consecutive uppercase letters, use '{suggested}' instead"
    )]
    InvalidFieldNaming { field: String, suggested: String },

    #[error("model field '{field}' must be of type DateTime<Utc>, got {actual}")]
    TimestampFieldType { field: String, actual: String },

    #[error("model's count field must be of type i64, got {0}")]
    CountFieldType(String),

    #[error("model fields '{first}' and '{second}' both map to column '{column}'")]
    DuplicateColumn {
        column: String,
        first: String,
        second: String,
    },

    #[error("number of fields in model does not match table: {}", describe_missing(.missing_in_table, .missing_in_model))]
    FieldCountMismatch {
        missing_in_table: Vec<String>,
        missing_in_model: Vec<String>,
    },

    #[error("field type mismatch between model and table: field {field}, expected {expected}, got {actual}")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("optional field {0} not found in model")]
    OptionalUnknownField(String),

    #[error("model field {0} has no optional counterpart")]
    OptionalMissingField(String),

    #[error("optional field {0} must be an Option")]
    OptionalNotNullable(String),

    #[error("optional field {field} type {actual} doesn't match model field type {expected}")]
    OptionalTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },
}

fn describe_missing(missing_in_table: &[String], missing_in_model: &[String]) -> String {
    let mut msg = String::new();
    if !missing_in_table.is_empty() {
        msg.push_str(&format!(
            "Fields in model but missing from table: [{}].",
            missing_in_table.join(" ")
        ));
        if !missing_in_model.is_empty() {
            msg.push(' ');
        }
    }
    if !missing_in_model.is_empty() {
        msg.push_str(&format!(
            "Fields in table but missing from model: [{}].",
            missing_in_model.join(" ")
        ));
    }
    msg
}
