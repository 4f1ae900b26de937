use auditrail_common::AuditConfig;
use sea_orm_migration::prelude::*;

pub mod blueprint;

mod m20260301_000001_create_users;
mod m20260301_000002_create_posts;
mod m20260301_000003_create_comments;

pub use blueprint::{Blueprint, BlueprintStatements, ColumnKind, ColumnSpec, ForeignSpec, IndexSpec};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_posts::Migration),
            Box::new(m20260301_000003_create_comments::Migration),
        ]
    }
}

/// Audit configuration the reference migrations are generated under.
pub(crate) fn schema_config() -> Result<AuditConfig, DbErr> {
    AuditConfig::from_env().map_err(|err| DbErr::Custom(format!("audit configuration: {err}")))
}
