use auditrail_common::{AuditError, Result};
use sea_orm::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordEventKind {
    Trashed,
    Restoring,
    Restored,
}

impl RecordEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trashed => "trashed",
            Self::Restoring => "restoring",
            Self::Restored => "restored",
        }
    }

    /// Pre-events may veto or fail the operation; post-events are
    /// notifications only.
    pub fn is_pre(&self) -> bool {
        matches!(self, Self::Restoring)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordEvent {
    pub kind: RecordEventKind,
    pub table: String,
    pub key: Vec<Value>,
}

impl RecordEvent {
    pub fn new(kind: RecordEventKind, table: impl Into<String>, key: Vec<Value>) -> Self {
        Self {
            kind,
            table: table.into(),
            key,
        }
    }
}

/// Answer of an observer to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookDecision {
    Proceed,
    Veto,
    Fail(String),
}

pub trait RecordObserver: Send + Sync {
    fn observe(&self, event: &RecordEvent) -> HookDecision;
}

impl<F> RecordObserver for F
where
    F: Fn(&RecordEvent) -> HookDecision + Send + Sync,
{
    fn observe(&self, event: &RecordEvent) -> HookDecision {
        self(event)
    }
}

#[derive(Clone, Default)]
pub struct EventBus {
    observers: Vec<Arc<dyn RecordObserver>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, observer: impl RecordObserver + 'static) {
        self.observers.push(Arc::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `event` to every observer in subscription order. Returns
    /// `Ok(false)` when a pre-event is vetoed; the remaining observers are
    /// not called.
    pub fn dispatch(&self, event: &RecordEvent) -> Result<bool> {
        tracing::debug!(
            event = event.kind.as_str(),
            table = %event.table,
            observers = self.observers.len(),
            "dispatching record event"
        );

        for observer in &self.observers {
            match observer.observe(event) {
                HookDecision::Proceed => {}
                HookDecision::Veto if event.kind.is_pre() => {
                    tracing::debug!(event = event.kind.as_str(), table = %event.table, "vetoed");
                    return Ok(false);
                }
                HookDecision::Fail(reason) if event.kind.is_pre() => {
                    return Err(AuditError::hook(reason));
                }
                decision => {
                    tracing::warn!(
                        event = event.kind.as_str(),
                        decision = ?decision,
                        "ignoring decision on post-event"
                    );
                }
            }
        }
        Ok(true)
    }
}
