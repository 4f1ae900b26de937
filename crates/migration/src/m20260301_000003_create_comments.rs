use crate::blueprint::Blueprint;
use crate::schema_config;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let config = schema_config()?;
        let mut comments = Blueprint::create("comments", &config);
        comments
            .id()
            .text("body")
            .morphs("commentable", None)
            .timestamps();
        comments.create_in(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Comments {
    Table,
}
