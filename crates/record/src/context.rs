use auditrail_common::Principal;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

/// Per-call state handed to every mutating operation: who is acting, which
/// columns the caller supplied explicitly, and an optional fixed clock.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    principal: Option<Principal>,
    explicit: HashSet<String>,
    now: Option<DateTime<FixedOffset>>,
}

impl OperationContext {
    /// Context without an authenticated principal.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            ..Self::default()
        }
    }

    pub fn with_explicit(mut self, column: impl Into<String>) -> Self {
        self.explicit.insert(column.into());
        self
    }

    /// Marks every top-level key of a JSON input object as explicitly
    /// supplied.
    pub fn with_input(mut self, input: &JsonValue) -> Self {
        if let Some(object) = input.as_object() {
            self.explicit.extend(object.keys().cloned());
        }
        self
    }

    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_explicit(&self, column: &str) -> bool {
        self.explicit.contains(column)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now.unwrap_or_else(|| Utc::now().fixed_offset())
    }
}

/// Keeps only the permitted keys of a JSON input object.
pub fn fillable_input(input: &JsonValue, fillable: &[&str]) -> Map<String, JsonValue> {
    input
        .as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(key, _)| fillable.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
