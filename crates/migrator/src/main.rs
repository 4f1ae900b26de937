mod db;

use crate::db::connect;
use anyhow::{Result, anyhow};
use auditrail_common::AuditConfig;
use auditrail_migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Up,
    /// Rolls back the latest migration.
    Down,
    /// Drops every table and migrates from scratch.
    Fresh,
    Status,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "fresh" => Ok(Self::Fresh),
            "status" => Ok(Self::Status),
            other => Err(anyhow!(
                "unknown command {other}, expected one of up, down, fresh, status"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let command = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<Command>()?,
        None => Command::Up,
    };

    let config = AuditConfig::from_env()?;
    let database_url = config
        .database_url
        .as_ref()
        .ok_or_else(|| anyhow!("DATABASE_URL is required for the migrator"))?;
    let db = connect(database_url).await?;

    info!(
        command = ?command,
        performer_mode = %config.performer_mode,
        user_key_type = %config.user_key_type,
        morph_key_type = %config.morph_key_type,
        "running migrations"
    );
    match command {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down => Migrator::down(&db, Some(1)).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }
    info!("migrations finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!("up".parse::<Command>().unwrap(), Command::Up);
        assert_eq!("fresh".parse::<Command>().unwrap(), Command::Fresh);
        assert_eq!("status".parse::<Command>().unwrap(), Command::Status);
        assert!("rollback".parse::<Command>().is_err());
    }
}
