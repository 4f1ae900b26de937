use crate::error::{AuditError, Result};
use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use uuid::Uuid;

/// Key strategy of a polymorphic reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphKeyType {
    /// `{name}_id` unsigned big integer.
    #[default]
    Int,
    /// `{name}_id` uuid.
    Uuid,
    /// `{name}_id` ulid.
    Ulid,
    /// Single `{name}_string` column.
    String,
    /// One nullable column per key shape.
    Any,
}

impl MorphKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uuid => "uuid",
            Self::Ulid => "ulid",
            Self::String => "string",
            Self::Any => "any",
        }
    }

    /// Column/value pairs representing `key` under this strategy. Every key
    /// column of the strategy is listed; the ones not matching the key carry
    /// a typed NULL so exactly one of them is populated.
    pub fn key_values(&self, name: &str, key: &MorphKey) -> Result<Vec<(String, Value)>> {
        let values = match (self, key) {
            (Self::Any, key) => MorphKey::SHAPES
                .iter()
                .map(|suffix| {
                    let column = format!("{name}_{suffix}");
                    if *suffix == key.suffix() {
                        (column, key.to_value())
                    } else {
                        (column, MorphKey::null_for(suffix))
                    }
                })
                .collect(),
            (Self::String, key) => vec![(format!("{name}_string"), Value::from(key.to_string()))],
            (Self::Int, MorphKey::Numeric(_))
            | (Self::Uuid, MorphKey::Uuid(_))
            | (Self::Ulid, MorphKey::Ulid(_)) => vec![(format!("{name}_id"), key.to_value())],
            (strategy, key) => {
                return Err(AuditError::morph(format!(
                    "{} key {key} cannot be stored under the {strategy} morph strategy",
                    key.suffix()
                )));
            }
        };
        Ok(values)
    }
}

impl fmt::Display for MorphKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphKeyType {
    type Err = AuditError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "numeric" => Ok(Self::Int),
            "uuid" => Ok(Self::Uuid),
            "ulid" => Ok(Self::Ulid),
            "string" => Ok(Self::String),
            "any" => Ok(Self::Any),
            other => Err(AuditError::config(format!("unknown morph key type {other}"))),
        }
    }
}

/// Key of the row a polymorphic reference points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MorphKey {
    Numeric(i64),
    Uuid(Uuid),
    Ulid(Ulid),
    String(String),
}

impl MorphKey {
    /// Column suffixes of the `any` strategy, in emission order.
    pub const SHAPES: [&'static str; 4] = ["id", "uuid", "ulid", "string"];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "id",
            Self::Uuid(_) => "uuid",
            Self::Ulid(_) => "ulid",
            Self::String(_) => "string",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Numeric(id) => Value::from(*id),
            Self::Uuid(id) => Value::from(*id),
            Self::Ulid(id) => Value::from(id.to_string()),
            Self::String(id) => Value::from(id.clone()),
        }
    }

    fn null_for(suffix: &str) -> Value {
        match suffix {
            "id" => Value::BigInt(None),
            "uuid" => Value::Uuid(None),
            _ => Value::String(None),
        }
    }
}

impl fmt::Display for MorphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Uuid(id) => write!(f, "{}", id.hyphenated()),
            Self::Ulid(id) => write!(f, "{id}"),
            Self::String(id) => f.write_str(id),
        }
    }
}
