//! Initial schema for the codex economy.
//!
//! - `users`: principals that own characters
//! - `characters`: gold/downtime ledger per character
//! - `items`: permanent magic items, one owner each
//! - `item_origins`: the single immutable origin of every item
//! - `item_edits`, `trades`, `trade_rejections`: append-only provenance
//! - `adverts`, `offers`: the trading post
//! - `dt_*`: downtime activity records

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Characters {
    Table,
    Id,
    Player,
    Name,
    GoldMinor,
    Downtime,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    CharacterId,
    Name,
    Rarity,
    Description,
    Flavour,
    Version,
    CreatedAt,
}

#[derive(Iden)]
enum ItemOrigins {
    Table,
    ItemId,
    Kind,
    OccurredAt,
    Module,
    Dm,
    RewardName,
    Hours,
    CreatedBy,
}

#[derive(Iden)]
enum ItemEdits {
    Table,
    Id,
    ItemId,
    Actor,
    Summary,
    OccurredAt,
}

#[derive(Iden)]
enum Trades {
    Table,
    Id,
    ItemId,
    SenderId,
    RecipientId,
    AssociatedId,
    OccurredAt,
}

#[derive(Iden)]
enum TradeRejections {
    Table,
    Id,
    AdvertItemId,
    OfferedItemId,
    RejectedBy,
    OccurredAt,
}

#[derive(Iden)]
enum Adverts {
    Table,
    Id,
    ItemId,
    Description,
    Version,
    CreatedAt,
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    AdvertId,
    ItemId,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum DtCatchingUp {
    Table,
    Id,
    CharacterId,
    OccurredAt,
    Levels,
    Details,
    DowntimeCost,
}

#[derive(Iden)]
enum DtMundaneTrades {
    Table,
    Id,
    CharacterId,
    OccurredAt,
    Purchased,
    Sold,
    GoldChangeMinor,
}

#[derive(Iden)]
enum DtSpellbookUpdates {
    Table,
    Id,
    CharacterId,
    OccurredAt,
    GoldCostMinor,
    DowntimeCost,
    Dm,
    Source,
    Spells,
}

#[derive(Iden)]
enum DtFreeform {
    Table,
    Id,
    CharacterId,
    OccurredAt,
    Title,
    Details,
    GoldChangeMinor,
    DowntimeChange,
    AutoApply,
}

fn character_fk<T, C>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement
where
    T: IntoTableRef,
    C: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Characters::Table, Characters::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users & characters
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Characters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Characters::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Characters::Player).string().not_null())
                    .col(ColumnDef::new(Characters::Name).string().not_null())
                    .col(
                        ColumnDef::new(Characters::GoldMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Characters::Downtime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-characters-player")
                            .from(Characters::Table, Characters::Player)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-characters-player")
                    .table(Characters::Table)
                    .col(Characters::Player)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Items & provenance
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Items::CharacterId).string().not_null())
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::Rarity).string().not_null())
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::Flavour).text().not_null())
                    .col(
                        ColumnDef::new(Items::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Items::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-items-character_id")
                            .from(Items::Table, Items::CharacterId)
                            .to(Characters::Table, Characters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-items-character_id")
                    .table(Items::Table)
                    .col(Items::CharacterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItemOrigins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemOrigins::ItemId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemOrigins::Kind).string().not_null())
                    .col(ColumnDef::new(ItemOrigins::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(ItemOrigins::Module).string())
                    .col(ColumnDef::new(ItemOrigins::Dm).string())
                    .col(ColumnDef::new(ItemOrigins::RewardName).string())
                    .col(ColumnDef::new(ItemOrigins::Hours).integer())
                    .col(ColumnDef::new(ItemOrigins::CreatedBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-item_origins-item_id")
                            .from(ItemOrigins::Table, ItemOrigins::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItemEdits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemEdits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemEdits::ItemId).string().not_null())
                    .col(ColumnDef::new(ItemEdits::Actor).string().not_null())
                    .col(ColumnDef::new(ItemEdits::Summary).text().not_null())
                    .col(ColumnDef::new(ItemEdits::OccurredAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-item_edits-item_id")
                            .from(ItemEdits::Table, ItemEdits::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-item_edits-item_id")
                    .table(ItemEdits::Table)
                    .col(ItemEdits::ItemId)
                    .to_owned(),
            )
            .await?;

        // `associated_id` carries no FK: both legs are inserted together.
        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trades::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trades::ItemId).string().not_null())
                    .col(ColumnDef::new(Trades::SenderId).string().not_null())
                    .col(ColumnDef::new(Trades::RecipientId).string().not_null())
                    .col(ColumnDef::new(Trades::AssociatedId).string().not_null())
                    .col(ColumnDef::new(Trades::OccurredAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trades-item_id")
                            .from(Trades::Table, Trades::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut character_fk(
                        "fk-trades-sender_id",
                        Trades::Table,
                        Trades::SenderId,
                    ))
                    .foreign_key(&mut character_fk(
                        "fk-trades-recipient_id",
                        Trades::Table,
                        Trades::RecipientId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trades-item_id-occurred_at")
                    .table(Trades::Table)
                    .col(Trades::ItemId)
                    .col(Trades::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TradeRejections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TradeRejections::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TradeRejections::AdvertItemId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TradeRejections::OfferedItemId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TradeRejections::RejectedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TradeRejections::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Trading post
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Adverts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Adverts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Adverts::ItemId).string().not_null())
                    .col(ColumnDef::new(Adverts::Description).text())
                    .col(
                        ColumnDef::new(Adverts::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Adverts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-adverts-item_id")
                            .from(Adverts::Table, Adverts::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-adverts-item_id-unique")
                    .table(Adverts::Table)
                    .col(Adverts::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Offers::AdvertId).string().not_null())
                    .col(ColumnDef::new(Offers::ItemId).string().not_null())
                    .col(ColumnDef::new(Offers::Description).text())
                    .col(ColumnDef::new(Offers::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-advert_id")
                            .from(Offers::Table, Offers::AdvertId)
                            .to(Adverts::Table, Adverts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-item_id")
                            .from(Offers::Table, Offers::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-item_id-unique")
                    .table(Offers::Table)
                    .col(Offers::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-advert_id")
                    .table(Offers::Table)
                    .col(Offers::AdvertId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Downtime activities
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DtCatchingUp::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DtCatchingUp::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DtCatchingUp::CharacterId).string().not_null())
                    .col(ColumnDef::new(DtCatchingUp::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(DtCatchingUp::Levels).integer().not_null())
                    .col(ColumnDef::new(DtCatchingUp::Details).text())
                    .col(
                        ColumnDef::new(DtCatchingUp::DowntimeCost)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut character_fk(
                        "fk-dt_catching_up-character_id",
                        DtCatchingUp::Table,
                        DtCatchingUp::CharacterId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DtMundaneTrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DtMundaneTrades::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DtMundaneTrades::CharacterId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DtMundaneTrades::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DtMundaneTrades::Purchased).text())
                    .col(ColumnDef::new(DtMundaneTrades::Sold).text())
                    .col(
                        ColumnDef::new(DtMundaneTrades::GoldChangeMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut character_fk(
                        "fk-dt_mundane_trades-character_id",
                        DtMundaneTrades::Table,
                        DtMundaneTrades::CharacterId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DtSpellbookUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DtSpellbookUpdates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DtSpellbookUpdates::CharacterId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DtSpellbookUpdates::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DtSpellbookUpdates::GoldCostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DtSpellbookUpdates::DowntimeCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DtSpellbookUpdates::Dm).string())
                    .col(ColumnDef::new(DtSpellbookUpdates::Source).string())
                    .col(ColumnDef::new(DtSpellbookUpdates::Spells).text())
                    .foreign_key(&mut character_fk(
                        "fk-dt_spellbook_updates-character_id",
                        DtSpellbookUpdates::Table,
                        DtSpellbookUpdates::CharacterId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DtFreeform::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DtFreeform::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DtFreeform::CharacterId).string().not_null())
                    .col(ColumnDef::new(DtFreeform::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(DtFreeform::Title).string().not_null())
                    .col(ColumnDef::new(DtFreeform::Details).text())
                    .col(
                        ColumnDef::new(DtFreeform::GoldChangeMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DtFreeform::DowntimeChange)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DtFreeform::AutoApply).boolean().not_null())
                    .foreign_key(&mut character_fk(
                        "fk-dt_freeform-character_id",
                        DtFreeform::Table,
                        DtFreeform::CharacterId,
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(DtFreeform::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DtSpellbookUpdates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DtMundaneTrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DtCatchingUp::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Adverts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TradeRejections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemEdits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemOrigins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Characters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
