//! Initial schema migration - creates all tables from scratch.
//!
//! - `products`: the catalog (id, display name, unit of measure)
//! - `movements`: the append-only stock ledger; each row materializes the
//!   running balance after itself in `stock_after`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Unit,
}

#[derive(Iden)]
enum Movements {
    Table,
    Id,
    ProductId,
    Quantity,
    EffectiveDate,
    StockAfter,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Unit).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movements::ProductId).string().not_null())
                    .col(ColumnDef::new(Movements::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Movements::EffectiveDate).date().not_null())
                    .col(
                        ColumnDef::new(Movements::StockAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Movements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movements_product_id")
                            .from(Movements::Table, Movements::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The latest-record lookup per product is the hot path for both
        // validation and the stock projection.
        manager
            .create_index(
                Index::create()
                    .name("idx_movements_product_id_id")
                    .table(Movements::Table)
                    .col(Movements::ProductId)
                    .col(Movements::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        Ok(())
    }
}
