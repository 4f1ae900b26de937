use crate::blueprint::{Blueprint, ColumnKind};
use crate::schema_config;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let config = schema_config()?;
        let mut users = Blueprint::create(config.users_table.as_str(), &config);
        users
            .id_named(&config.users_key)
            .string("name", 255)
            .col("username", ColumnKind::String(255), true)
            .string("email", 255)
            .timestamps();
        users.create_in(manager).await?;

        manager
            .create_index(
                Index::create()
                    .name(format!("{}_email_unique", config.users_table))
                    .table(Alias::new(&config.users_table))
                    .col(Alias::new("email"))
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let config = schema_config()?;
        manager
            .drop_table(Table::drop().table(Alias::new(&config.users_table)).to_owned())
            .await?;
        Ok(())
    }
}
