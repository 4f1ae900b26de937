use crate::blueprint::Blueprint;
use crate::schema_config;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let config = schema_config()?;
        let mut posts = Blueprint::create("posts", &config);
        posts
            .id()
            .string("title", 255)
            .text("body")
            .timestamps()
            .soft_deletes();
        posts.create_in(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Posts {
    Table,
}
