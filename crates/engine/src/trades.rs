//! Trade audit records.
//!
//! A completed barter produces two [`Trade`] legs, one per item, with sender
//! and recipient reversed. Each leg points at the other through
//! `associated_id`. Trades are never updated or deleted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub item_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub associated_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

/// One side of a barter: `item` moves from `sender` to `recipient`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeLeg {
    pub item_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
}

impl Trade {
    /// Build both mutually linked legs of a barter.
    pub(crate) fn pair(a: TradeLeg, b: TradeLeg, at: DateTime<Utc>) -> (Self, Self) {
        let a_id = Uuid::new_v4();
        let b_id = Uuid::new_v4();
        let leg = |id, associated_id, leg: TradeLeg| Self {
            id,
            item_id: leg.item_id,
            sender_id: leg.sender_id,
            recipient_id: leg.recipient_id,
            associated_id,
            occurred_at: at,
        };
        (leg(a_id, b_id, a), leg(b_id, a_id, b))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub item_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub associated_id: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Items,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trade> for ActiveModel {
    fn from(value: &Trade) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            item_id: ActiveValue::Set(value.item_id.to_string()),
            sender_id: ActiveValue::Set(value.sender_id.to_string()),
            recipient_id: ActiveValue::Set(value.recipient_id.to_string()),
            associated_id: ActiveValue::Set(value.associated_id.to_string()),
            occurred_at: ActiveValue::Set(value.occurred_at),
        }
    }
}

impl TryFrom<Model> for Trade {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "trade")?,
            item_id: parse_uuid(&model.item_id, "item")?,
            sender_id: parse_uuid(&model.sender_id, "character")?,
            recipient_id: parse_uuid(&model.recipient_id, "character")?,
            associated_id: parse_uuid(&model.associated_id, "trade")?,
            occurred_at: model.occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_links_legs_and_reverses_parties() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let a = TradeLeg {
            item_id: Uuid::new_v4(),
            sender_id: x,
            recipient_id: y,
        };
        let b = TradeLeg {
            item_id: Uuid::new_v4(),
            sender_id: y,
            recipient_id: x,
        };

        let (first, second) = Trade::pair(a, b, Utc::now());

        assert_eq!(first.associated_id, second.id);
        assert_eq!(second.associated_id, first.id);
        assert_eq!(first.sender_id, second.recipient_id);
        assert_eq!(first.recipient_id, second.sender_id);
        assert_eq!(first.occurred_at, second.occurred_at);
    }
}
