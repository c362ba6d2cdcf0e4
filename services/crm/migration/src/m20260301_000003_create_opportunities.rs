use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Opportunities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Opportunities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Opportunities::Title).string().null())
                    .col(ColumnDef::new(Opportunities::Value).double().null())
                    .col(ColumnDef::new(Opportunities::Stage).string().null())
                    .col(ColumnDef::new(Opportunities::OwnerId).string().not_null())
                    .col(ColumnDef::new(Opportunities::LeadId).string().null())
                    .col(
                        ColumnDef::new(Opportunities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Opportunities::Table)
                    .col(Opportunities::OwnerId)
                    .name("idx_opportunities_owner_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_opportunities_owner_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Opportunities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Opportunities {
    Table,
    Id,
    Title,
    Value,
    Stage,
    OwnerId,
    LeadId,
    CreatedAt,
}
