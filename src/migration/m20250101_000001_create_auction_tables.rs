use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    Bids, Comments, Products, Sessions, UserProducts, Users, WatchlistProducts, Watchlists,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Referenced tables first so foreign keys resolve.
        create_table_of(manager, &schema, Users).await?;
        create_table_of(manager, &schema, Products).await?;
        create_table_of(manager, &schema, UserProducts).await?;
        create_table_of(manager, &schema, Watchlists).await?;
        create_table_of(manager, &schema, WatchlistProducts).await?;
        create_table_of(manager, &schema, Bids).await?;
        create_table_of(manager, &schema, Comments).await?;
        create_table_of(manager, &schema, Sessions).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_of(manager, Sessions).await?;
        drop_table_of(manager, Comments).await?;
        drop_table_of(manager, Bids).await?;
        drop_table_of(manager, WatchlistProducts).await?;
        drop_table_of(manager, Watchlists).await?;
        drop_table_of(manager, UserProducts).await?;
        drop_table_of(manager, Products).await?;
        drop_table_of(manager, Users).await?;
        Ok(())
    }
}

async fn create_table_of<E>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn drop_table_of<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
