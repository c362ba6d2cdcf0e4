use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Name).string().null())
                    .col(ColumnDef::new(Leads::Email).string().null())
                    .col(ColumnDef::new(Leads::Phone).string().null())
                    .col(ColumnDef::new(Leads::Status).string().null())
                    .col(ColumnDef::new(Leads::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        // Per-owner duplicate email lookup. Not unique: updates skip the check.
        manager
            .create_index(
                Index::create()
                    .table(Leads::Table)
                    .col(Leads::OwnerId)
                    .col(Leads::Email)
                    .name("idx_leads_owner_id_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_leads_owner_id_email").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Leads {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Status,
    OwnerId,
    CreatedAt,
}
