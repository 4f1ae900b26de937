//! 记录生命周期审计扩展
//!
//! 在 sea-orm 实体的新增、更新、软删除与恢复时写入执行者与时间戳列。

pub mod columns;
pub mod context;
pub mod events;
pub mod morph;
pub mod scopes;
pub mod trail;
mod values;

#[cfg(test)]
mod fixtures;

pub use columns::{AuditColumns, Auditable, SoftDeletable, SoftDeleteColumns};
pub use context::{OperationContext, fillable_input};
pub use events::{EventBus, HookDecision, RecordEvent, RecordEventKind, RecordObserver};
pub use morph::assign_morph;
pub use scopes::{by_md5, by_md5_not};
pub use trail::{AuditTrail, PerformerRef, RecordAuditor, RestoreOutcome, SoftDeleteAuditor, find_user};
