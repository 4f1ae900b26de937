use crate::error::{AuditError, Result};
use sea_orm::{ColumnType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use uuid::Uuid;

/// Primary-key representation of a record (and of the principal table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Database-generated auto-increment integer.
    #[default]
    Int,
    /// Time-ordered UUID, canonical hyphenated form.
    Uuid,
    /// ULID in Crockford base-32.
    Ulid,
    /// Time-ordered UUID rendered as 32 hex characters.
    String,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uuid => "uuid",
            Self::Ulid => "ulid",
            Self::String => "string",
        }
    }

    /// `false` for every key type the application generates before insert.
    pub fn is_incrementing(&self) -> bool {
        matches!(self, Self::Int)
    }

    /// Generates an application-side key; `None` for integer keys, which are
    /// left to the database.
    pub fn generate(&self) -> Option<GeneratedKey> {
        match self {
            Self::Int => None,
            Self::Uuid => Some(GeneratedKey::Uuid(Uuid::now_v7())),
            Self::Ulid => Some(GeneratedKey::Ulid(Ulid::new())),
            Self::String => Some(GeneratedKey::Hex(Uuid::now_v7().simple().to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = AuditError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "uuid" => Ok(Self::Uuid),
            "ulid" => Ok(Self::Ulid),
            "string" => Ok(Self::String),
            other => Err(AuditError::config(format!("unknown key type {other}"))),
        }
    }
}

/// A key produced by [`KeyType::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedKey {
    Uuid(Uuid),
    Ulid(Ulid),
    Hex(String),
}

impl GeneratedKey {
    /// Converts the key into a value matching the physical column type of
    /// the primary key. Uuid columns receive a native uuid, every other
    /// column its textual form.
    pub fn to_value(&self, column_type: &ColumnType) -> Value {
        let native_uuid = matches!(column_type, ColumnType::Uuid);
        match self {
            Self::Uuid(id) if native_uuid => Value::from(*id),
            Self::Uuid(id) => Value::from(id.hyphenated().to_string()),
            Self::Ulid(id) if native_uuid => Value::from(Uuid::from(*id)),
            Self::Ulid(id) => Value::from(id.to_string()),
            Self::Hex(hex) => Value::from(hex.clone()),
        }
    }
}

impl fmt::Display for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(id) => write!(f, "{}", id.hyphenated()),
            Self::Ulid(id) => write!(f, "{id}"),
            Self::Hex(hex) => f.write_str(hex),
        }
    }
}
