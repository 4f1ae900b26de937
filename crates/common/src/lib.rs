pub mod config;
pub mod error;
pub mod keys;
pub mod morph;
pub mod performer;

// ============ 重新导出常用类型 ============

// 错误处理
pub use error::{AuditError, Result as AuditResult};

// 配置相关
pub use config::{AuditConfig, ConfigIssue};

// 主键与多态键
pub use keys::{GeneratedKey, KeyType};
pub use morph::{MorphKey, MorphKeyType};

// 执行者
pub use performer::{
    Performer, PerformerMode, PlainPerformer, Principal, PrincipalKey, performer_column,
};

// 兼容性别名（Result 是更常用的名称）
pub use error::Result;
