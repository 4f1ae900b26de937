//! 审计扩展统一错误类型定义
//!
//! 全项目共享一个错误类型，存储层错误原样向上传播。

use thiserror::Error;

/// 审计扩展统一错误类型
#[derive(Error, Debug)]
pub enum AuditError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 实体缺少所需的列
    #[error("缺少列: {0}")]
    MissingColumn(String),

    /// 执行者与主键类型不匹配
    #[error("执行者错误: {0}")]
    Performer(String),

    /// 事件处理器中止了操作
    #[error("事件处理器中止: {0}")]
    Hook(String),

    /// 多态引用与键策略不匹配
    #[error("多态引用错误: {0}")]
    Morph(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 其他内部错误
    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuditError {
    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 创建缺少列错误
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// 创建执行者错误
    pub fn performer(msg: impl Into<String>) -> Self {
        Self::Performer(msg.into())
    }

    /// 创建事件中止错误
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// 创建多态引用错误
    pub fn morph(msg: impl Into<String>) -> Self {
        Self::Morph(msg.into())
    }

    /// 判断是否为存储层错误
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 判断是否为配置类错误（实体定义或运行配置有误）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingColumn(_) | Self::Performer(_)
        )
    }
}

/// 审计扩展 Result 类型别名
pub type Result<T> = std::result::Result<T, AuditError>;

// ============ 事务错误支持 ============

/// SeaORM 事务错误转换
impl<T> From<sea_orm::TransactionError<T>> for AuditError
where
    T: Into<AuditError>,
{
    fn from(err: sea_orm::TransactionError<T>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => Self::Database(db),
            sea_orm::TransactionError::Transaction(app) => app.into(),
        }
    }
}
