//! Value shaping for audit columns. Stamped values follow the physical
//! column type so the generated entity setters accept them.

use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, ColumnType, Value};

/// Timestamp for `column`: zoned columns receive `now` as is, naive columns
/// its UTC wall time.
pub(crate) fn timestamp_value<C: ColumnTrait>(column: C, now: DateTime<FixedOffset>) -> Value {
    match column.def().get_column_type() {
        ColumnType::DateTime | ColumnType::Timestamp => Value::from(now.naive_utc()),
        _ => Value::from(now),
    }
}

pub(crate) fn null_value<C: ColumnTrait>(column: C) -> Value {
    match column.def().get_column_type() {
        ColumnType::TimestampWithTimeZone => Value::ChronoDateTimeWithTimeZone(None),
        ColumnType::DateTime | ColumnType::Timestamp => Value::ChronoDateTime(None),
        ColumnType::BigInteger => Value::BigInt(None),
        ColumnType::BigUnsigned => Value::BigUnsigned(None),
        ColumnType::Integer => Value::Int(None),
        ColumnType::Unsigned => Value::Unsigned(None),
        ColumnType::Uuid => Value::Uuid(None),
        _ => Value::String(None),
    }
}

/// Adapts a value to the width or representation of `column`. `None` when
/// the value has no lossless representation in the column: the kinds
/// differ or an integer key is out of range.
pub(crate) fn fit_to_column<C: ColumnTrait>(value: Value, column: C) -> Option<Value> {
    if is_null(&value) {
        return Some(null_value(column));
    }
    match (value, column.def().get_column_type()) {
        (Value::BigInt(Some(id)), ColumnType::BigInteger) => Some(Value::BigInt(Some(id))),
        (Value::BigInt(Some(id)), ColumnType::Integer) => i32::try_from(id).ok().map(Value::from),
        (Value::BigInt(Some(id)), ColumnType::BigUnsigned) => {
            u64::try_from(id).ok().map(Value::from)
        }
        (Value::BigInt(Some(id)), ColumnType::Unsigned) => u32::try_from(id).ok().map(Value::from),
        (Value::Uuid(Some(id)), ColumnType::Uuid) => Some(Value::Uuid(Some(id))),
        (Value::Uuid(Some(id)), column_type) if is_text(column_type) => {
            Some(Value::from(id.hyphenated().to_string()))
        }
        (Value::String(Some(text)), column_type) if is_text(column_type) => {
            Some(Value::String(Some(text)))
        }
        _ => None,
    }
}

fn is_text(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::String(_) | ColumnType::Char(_) | ColumnType::Text
    )
}

pub(crate) fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::ChronoDateTimeLocal(None)
            | Value::ChronoDateTimeWithTimeZone(None)
            | Value::Uuid(None)
    )
}

/// Textual content of a string-like value.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(Some(text)) => Some(text.as_ref().clone()),
        Value::Char(Some(ch)) => Some(ch.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ledgers, notes, posts};

    fn fixed() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-01T10:00:00+00:00").unwrap()
    }

    #[test]
    fn test_timestamp_follows_column_type() {
        assert_eq!(
            timestamp_value(posts::Column::CreatedAt, fixed()),
            Value::from(fixed())
        );
        assert_eq!(
            timestamp_value(notes::Column::CreatedAt, fixed()),
            Value::from(fixed().naive_utc())
        );
    }

    #[test]
    fn test_typed_nulls() {
        assert_eq!(
            null_value(posts::Column::DeletedAt),
            Value::ChronoDateTimeWithTimeZone(None)
        );
        assert_eq!(null_value(posts::Column::DeletedBy), Value::BigInt(None));
        assert_eq!(null_value(notes::Column::ArchivedBy), Value::String(None));
        assert!(is_null(&null_value(posts::Column::RestoreAt)));
    }

    #[test]
    fn test_fit_to_column() {
        assert_eq!(
            fit_to_column(Value::BigInt(Some(5)), posts::Column::CreatedBy),
            Some(Value::BigInt(Some(5)))
        );
        assert_eq!(
            fit_to_column(Value::from("Ada".to_string()), notes::Column::CreatedBy),
            Some(Value::from("Ada".to_string()))
        );
        assert_eq!(
            fit_to_column(Value::BigInt(None), notes::Column::ArchivedBy),
            Some(Value::String(None))
        );
    }

    #[test]
    fn test_fit_to_column_rejects_other_kinds() {
        assert_eq!(
            fit_to_column(Value::from("Ada".to_string()), posts::Column::CreatedBy),
            None
        );
        assert_eq!(
            fit_to_column(Value::from(uuid::Uuid::nil()), posts::Column::UpdatedBy),
            None
        );
    }

    #[test]
    fn test_fit_to_column_integer_range() {
        assert_eq!(
            fit_to_column(Value::BigInt(Some(42)), ledgers::Column::CreatedBy),
            Some(Value::Int(Some(42)))
        );
        assert_eq!(
            fit_to_column(
                Value::BigInt(Some(i64::from(i32::MAX) + 1)),
                ledgers::Column::CreatedBy
            ),
            None
        );
    }

    #[test]
    fn test_text_of() {
        assert_eq!(text_of(&Value::from("x".to_string())), Some("x".to_string()));
        assert_eq!(text_of(&Value::String(None)), None);
        assert!(!is_null(&Value::from("x".to_string())));
    }
}
