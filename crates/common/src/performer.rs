//! 执行者（审计主体）相关类型
//!
//! users 模式下执行者是用户表的外键，plain 模式下是不超过 100 个字符的文本标签。

use crate::error::{AuditError, Result};
use crate::keys::KeyType;
use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;
use uuid::Uuid;

/// Maximum length of a plain performer label, matching the column width.
pub const PLAIN_LABEL_MAX: usize = 100;

/// Label used when a plain performer column is empty.
pub const SYSTEM_PERFORMER: &str = "By System";

/// How performers are stored in `*_by` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformerMode {
    /// Foreign key to the principal table.
    #[default]
    Users,
    /// Free-text label without referential integrity.
    Plain,
}

impl PerformerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Plain => "plain",
        }
    }

    /// Parses a configured mode. Anything other than `users` or `plain`
    /// selects [`PerformerMode::Plain`] and is logged.
    pub fn from_config(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "users" => Self::Users,
            "plain" => Self::Plain,
            other => {
                tracing::warn!(
                    performer_mode = %other,
                    "unrecognised performer mode, falling back to plain"
                );
                Self::Plain
            }
        }
    }
}

impl fmt::Display for PerformerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrincipalKey {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl fmt::Display for PrincipalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Uuid(id) => write!(f, "{}", id.hyphenated()),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// The authenticated principal of the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub key: PrincipalKey,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Principal {
    pub fn new(key: PrincipalKey) -> Self {
        Self {
            key,
            name: None,
            username: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display label: name, then username, then email, then the raw key.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.username.clone())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.key.to_string())
    }
}

/// The value credited with a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performer {
    User(PrincipalKey),
    Plain(String),
}

impl Performer {
    pub fn resolve(principal: &Principal, mode: PerformerMode) -> Self {
        match mode {
            PerformerMode::Users => Self::User(principal.key.clone()),
            PerformerMode::Plain => {
                Self::Plain(principal.label().chars().take(PLAIN_LABEL_MAX).collect())
            }
        }
    }

    /// Converts the performer into the value stored in a `*_by` column.
    pub fn to_value(&self, user_key_type: KeyType) -> Result<Value> {
        match self {
            Self::Plain(label) => Ok(Value::from(label.clone())),
            Self::User(key) => user_reference(key, user_key_type),
        }
    }
}

fn user_reference(key: &PrincipalKey, user_key_type: KeyType) -> Result<Value> {
    match (user_key_type, key) {
        (KeyType::Int, PrincipalKey::Int(id)) => Ok(Value::from(*id)),
        (KeyType::Int, PrincipalKey::Text(raw)) => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| AuditError::performer(format!("principal key {raw} is not an integer"))),
        (KeyType::Uuid | KeyType::Ulid, PrincipalKey::Uuid(id)) => Ok(Value::from(*id)),
        (KeyType::Uuid | KeyType::Ulid, PrincipalKey::Text(raw)) => Uuid::parse_str(raw)
            .or_else(|_| Ulid::from_string(raw).map(Uuid::from))
            .map(Value::from)
            .map_err(|_| {
                AuditError::performer(format!("principal key {raw} is neither uuid nor ulid"))
            }),
        (KeyType::String, key) => Ok(Value::from(key.to_string())),
        (expected, key) => Err(AuditError::performer(format!(
            "principal key {key} does not match user key type {expected}"
        ))),
    }
}

/// Synthetic user record derived from a plain performer label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlainPerformer {
    pub id: PrincipalKey,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl PlainPerformer {
    pub fn from_label(label: Option<&str>, user_key_type: KeyType, mail_domain: &str) -> Self {
        let name = match label.map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => SYSTEM_PERFORMER.to_string(),
        };
        let username = match slugify(&name) {
            slug if slug.is_empty() => slugify(SYSTEM_PERFORMER),
            slug => slug,
        };
        let email = format!("{username}@{mail_domain}");
        let id = match user_key_type {
            KeyType::Int => PrincipalKey::Int(0),
            _ => PrincipalKey::Uuid(Uuid::nil()),
        };

        Self {
            id,
            name,
            username,
            email,
        }
    }
}

/// Name of the `*_by` column paired with a timestamp column: a trailing
/// `_at` becomes `_by`, any other name gets `_by` appended.
pub fn performer_column(timestamp_column: &str) -> String {
    match timestamp_column.strip_suffix("_at") {
        Some(base) => format!("{base}_by"),
        None => format!("{timestamp_column}_by"),
    }
}

/// Lower-case ASCII slug; non-ASCII text is transliterated first.
fn slugify(value: &str) -> String {
    let mut out = String::new();
    let mut last_dash = false;

    for ch in deunicode::deunicode(value).chars() {
        let mapped = if ch.is_ascii_alphanumeric() {
            Some(ch.to_ascii_lowercase())
        } else if ch == '-' || ch == '_' || ch.is_whitespace() {
            Some('-')
        } else {
            None
        };

        let Some(mapped) = mapped else {
            continue;
        };

        if mapped == '-' {
            if !last_dash && !out.is_empty() {
                out.push('-');
                last_dash = true;
            }
        } else {
            out.push(mapped);
            last_dash = false;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}
