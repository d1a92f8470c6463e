//! Binding validation: record and partial descriptors against a table.
//!
//! Checks run in a fixed order and stop at the first failure, so the error a
//! caller sees is deterministic for a given record/table pair.

use crate::error::ValidationError;
use crate::record::FieldDesc;
use crate::table::{ColumnType, Table};
use crate::value::ValueKind;
use std::collections::BTreeMap;

const CREATE_TIME: &str = "create_time";
const UPDATE_TIME: &str = "update_time";
const COUNT: &str = "count";

pub(crate) fn validate_binding(
    table: &Table,
    record: &[FieldDesc],
    partial: &[FieldDesc],
) -> Result<(), ValidationError> {
    validate_record(table, record)?;
    validate_partial(record, partial)
}

fn validate_record(table: &Table, record: &[FieldDesc]) -> Result<(), ValidationError> {
    if record.is_empty() {
        return Err(ValidationError::NotStruct);
    }

    if table.has_field(COUNT) {
        return Err(ValidationError::ReservedCountColumn);
    }
    for name in [CREATE_TIME, UPDATE_TIME] {
        if let Some(f) = table.field(name) {
            if f.column_type != ColumnType::Time {
                return Err(ValidationError::TimestampColumnType(name.to_string()));
            }
        }
    }

    let mut by_column: BTreeMap<&str, &FieldDesc> = BTreeMap::new();
    let mut count_field = None;
    for desc in record {
        check_naming(desc.name)?;
        if desc.is_count() {
            count_field = Some(desc);
            continue;
        }
        if (desc.column == CREATE_TIME || desc.column == UPDATE_TIME)
            && (desc.kind != ValueKind::Time || desc.nullable)
        {
            return Err(ValidationError::TimestampFieldType {
                field: desc.name.to_string(),
                actual: (desc.type_name)().to_string(),
            });
        }
        if let Some(previous) = by_column.insert(desc.column, desc) {
            return Err(ValidationError::DuplicateColumn {
                column: desc.column.to_string(),
                first: previous.name.to_string(),
                second: desc.name.to_string(),
            });
        }
    }
    if let Some(count) = count_field {
        if count.kind != ValueKind::Int64 || count.nullable {
            return Err(ValidationError::CountFieldType(
                (count.type_name)().to_string(),
            ));
        }
    }

    let missing_in_table: Vec<String> = by_column
        .keys()
        .filter(|column| !table.has_field(column))
        .map(|column| column.to_string())
        .collect();
    let mut missing_in_model: Vec<String> = table
        .fields()
        .iter()
        .filter(|f| !by_column.contains_key(f.name()))
        .map(|f| f.name().to_string())
        .collect();
    missing_in_model.sort();
    if !missing_in_table.is_empty() || !missing_in_model.is_empty() {
        return Err(ValidationError::FieldCountMismatch {
            missing_in_table,
            missing_in_model,
        });
    }

    for table_field in table.fields() {
        let Some(desc) = by_column.get(table_field.name()) else {
            continue;
        };
        if desc.nullable || !compatible(table_field.column_type, desc.kind) {
            return Err(ValidationError::FieldTypeMismatch {
                field: table_field.name().to_string(),
                expected: expected_types(table_field.column_type).to_string(),
                actual: (desc.type_name)().to_string(),
            });
        }
    }

    Ok(())
}

/// Which Rust field kinds can hold a column's values. Integer columns accept
/// `bool` (0/1) and boolean columns accept integers.
fn compatible(column: ColumnType, kind: ValueKind) -> bool {
    use ValueKind as K;
    match column {
        ColumnType::Int64 => matches!(kind, K::Int64 | K::Int | K::Bool),
        ColumnType::Int32 => matches!(kind, K::Int32 | K::Int | K::Bool),
        ColumnType::String => kind == K::String,
        ColumnType::Float64 => kind == K::Float64,
        ColumnType::Time => kind == K::Time,
        ColumnType::Bool => matches!(kind, K::Bool | K::Int32 | K::Int64 | K::Int),
    }
}

fn expected_types(column: ColumnType) -> &'static str {
    match column {
        ColumnType::Int64 => "i64/isize/bool for Int64Field",
        ColumnType::Int32 => "i32/isize/bool for Int32Field",
        ColumnType::String => "String for StringField",
        ColumnType::Float64 => "f64 for Float64Field",
        ColumnType::Time => "DateTime<Utc> for TimeField",
        ColumnType::Bool => "bool/i32/i64/isize for BoolField",
    }
}

fn validate_partial(record: &[FieldDesc], partial: &[FieldDesc]) -> Result<(), ValidationError> {
    for p in partial {
        let Some(r) = record.iter().find(|r| r.name == p.name) else {
            return Err(ValidationError::OptionalUnknownField(p.name.to_string()));
        };
        if !p.nullable {
            return Err(ValidationError::OptionalNotNullable(p.name.to_string()));
        }
        if (p.type_id)() != (r.type_id)() {
            return Err(ValidationError::OptionalTypeMismatch {
                field: p.name.to_string(),
                expected: (r.type_name)().to_string(),
                actual: (p.type_name)().to_string(),
            });
        }
    }
    // `count` only carries aggregate results, so the partial may leave it out.
    if let Some(r) = record
        .iter()
        .find(|r| !r.is_count() && !partial.iter().any(|p| p.name == r.name))
    {
        return Err(ValidationError::OptionalMissingField(r.name.to_string()));
    }
    Ok(())
}

fn check_naming(name: &str) -> Result<(), ValidationError> {
    if has_consecutive_uppercase(name) {
        return Err(ValidationError::InvalidFieldNaming {
            field: name.to_string(),
            suggested: to_strict_camel_case(name),
        });
    }
    Ok(())
}

fn has_consecutive_uppercase(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_uppercase() && w[1].is_ascii_uppercase())
}

/// Lowercase every uppercase letter that follows another uppercase letter,
/// unless it starts a new word (the next letter is lowercase).
///
/// `SomeID` -> `SomeId`, `HTTPStatus` -> `HttpStatus`, `ALLCAPS` -> `Allcaps`.
fn to_strict_camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if c.is_ascii_uppercase() && prev_upper && !next_lower {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::{TypeId, type_name};

    macro_rules! desc {
        ($name:literal, $column:literal, $ty:ty, $kind:ident, $nullable:literal) => {
            FieldDesc {
                name: $name,
                column: $column,
                kind: ValueKind::$kind,
                nullable: $nullable,
                type_id: TypeId::of::<$ty>,
                type_name: type_name::<$ty>,
            }
        };
    }

    fn table() -> Table {
        let mut t = Table::new("test_table");
        t.int64("id");
        t.string("name");
        t.time("create_time");
        t
    }

    fn record() -> Vec<FieldDesc> {
        vec![
            desc!("id", "id", i64, Int64, false),
            desc!("name", "name", String, String, false),
            desc!("create_time", "create_time", chrono::DateTime<chrono::Utc>, Time, false),
        ]
    }

    fn partial() -> Vec<FieldDesc> {
        vec![
            desc!("id", "id", i64, Int64, true),
            desc!("name", "name", String, String, true),
            desc!("create_time", "create_time", chrono::DateTime<chrono::Utc>, Time, true),
        ]
    }

    #[test]
    fn matching_binding_passes() {
        assert_eq!(validate_binding(&table(), &record(), &partial()), Ok(()));
    }

    #[test]
    fn count_field_is_allowed_on_record_only() {
        let mut rec = record();
        rec.push(desc!("count", "count", i64, Int64, false));
        assert_eq!(validate_binding(&table(), &rec, &partial()), Ok(()));

        let mut rec = record();
        rec.push(desc!("count", "count", i32, Int32, false));
        assert_eq!(
            validate_binding(&table(), &rec, &partial()),
            Err(ValidationError::CountFieldType("i32".to_string()))
        );
    }

    #[test]
    fn empty_record_is_rejected() {
        assert_eq!(
            validate_binding(&table(), &[], &[]),
            Err(ValidationError::NotStruct)
        );
    }

    #[test]
    fn table_may_not_have_count_column() {
        let mut t = table();
        t.int64("count");
        assert_eq!(
            validate_binding(&t, &record(), &partial()),
            Err(ValidationError::ReservedCountColumn)
        );
    }

    #[test]
    fn timestamp_columns_must_be_time() {
        let mut t = Table::new("t");
        t.int64("update_time");
        assert_eq!(
            validate_binding(&t, &record(), &partial()),
            Err(ValidationError::TimestampColumnType("update_time".to_string()))
        );
    }

    #[test]
    fn timestamp_fields_must_be_time() {
        let rec = vec![
            desc!("id", "id", i64, Int64, false),
            desc!("name", "name", String, String, false),
            desc!("create_time", "create_time", String, String, false),
        ];
        assert!(matches!(
            validate_binding(&table(), &rec, &partial()),
            Err(ValidationError::TimestampFieldType { ref field, .. }) if field == "create_time"
        ));
    }

    #[test]
    fn two_fields_on_one_column_are_rejected() {
        let mut rec = record();
        rec.insert(2, desc!("Name", "name", String, String, false));
        let mut part = partial();
        part.insert(2, desc!("Name", "name", String, String, true));

        let err = validate_binding(&table(), &rec, &part).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateColumn {
                column: "name".to_string(),
                first: "name".to_string(),
                second: "Name".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "model fields 'name' and 'Name' both map to column 'name'"
        );
    }

    #[test]
    fn itemised_field_mismatch() {
        let mut rec = record();
        rec.push(desc!("extra", "extra", String, String, false));
        let mut t = table();
        t.int32("age");
        t.string("email");
        assert_eq!(
            validate_binding(&t, &rec, &partial()),
            Err(ValidationError::FieldCountMismatch {
                missing_in_table: vec!["extra".to_string()],
                missing_in_model: vec!["age".to_string(), "email".to_string()],
            })
        );
    }

    #[test]
    fn type_compatibility() {
        assert!(compatible(ColumnType::Int64, ValueKind::Bool));
        assert!(compatible(ColumnType::Int32, ValueKind::Int));
        assert!(!compatible(ColumnType::Int32, ValueKind::Int64));
        assert!(compatible(ColumnType::Bool, ValueKind::Int32));
        assert!(!compatible(ColumnType::String, ValueKind::Int64));

        let rec = vec![
            desc!("id", "id", i64, Int64, false),
            desc!("name", "name", i64, Int64, false),
            desc!("create_time", "create_time", chrono::DateTime<chrono::Utc>, Time, false),
        ];
        assert_eq!(
            validate_binding(&table(), &rec, &partial()),
            Err(ValidationError::FieldTypeMismatch {
                field: "name".to_string(),
                expected: "String for StringField".to_string(),
                actual: "i64".to_string(),
            })
        );
    }

    #[test]
    fn partial_must_mirror_record() {
        let mut p = partial();
        p[1] = desc!("name", "name", String, String, false);
        assert_eq!(
            validate_binding(&table(), &record(), &p),
            Err(ValidationError::OptionalNotNullable("name".to_string()))
        );

        let mut p = partial();
        p[0] = desc!("id", "id", i32, Int32, true);
        assert!(matches!(
            validate_binding(&table(), &record(), &p),
            Err(ValidationError::OptionalTypeMismatch { .. })
        ));

        let mut p = partial();
        p.push(desc!("ghost", "ghost", i64, Int64, true));
        assert_eq!(
            validate_binding(&table(), &record(), &p),
            Err(ValidationError::OptionalUnknownField("ghost".to_string()))
        );

        let mut p = partial();
        p.pop();
        assert_eq!(
            validate_binding(&table(), &record(), &p),
            Err(ValidationError::OptionalMissingField("create_time".to_string()))
        );
    }

    #[test]
    fn consecutive_uppercase_detection() {
        for ok in ["Id", "SomeId", "HttpStatus", "name", "a", "A", ""] {
            assert!(!has_consecutive_uppercase(ok), "{ok}");
        }
        for bad in ["ID", "SomeID", "HTTPStatus", "UserID", "AB"] {
            assert!(has_consecutive_uppercase(bad), "{bad}");
        }
    }

    #[test]
    fn strict_camel_case_suggestions() {
        let cases = [
            ("ID", "Id"),
            ("SomeID", "SomeId"),
            ("SomeJSON", "SomeJson"),
            ("HTTPStatus", "HttpStatus"),
            ("URLPath", "UrlPath"),
            ("ALLCAPS", "Allcaps"),
            ("HTTPSProtocol", "HttpsProtocol"),
            ("GetUserID", "GetUserId"),
            ("UserName", "UserName"),
        ];
        for (input, want) in cases {
            assert_eq!(to_strict_camel_case(input), want, "{input}");
        }
    }

    #[test]
    fn naming_error_names_the_fix() {
        let rec = vec![desc!("SomeID", "some_id", i64, Int64, false)];
        assert_eq!(
            validate_binding(&table(), &rec, &[]),
            Err(ValidationError::InvalidFieldNaming {
                field: "SomeID".to_string(),
                suggested: "SomeId".to_string(),
            })
        );
    }
}
