//! The module contains `Character` and its database entity.
//!
//! A character is owned by one player (a principal) and carries the gold and
//! downtime balances. Balances are only written by [`crate::ledger`].

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Ledger, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub player: String,
    pub name: String,
    pub ledger: Ledger,
}

impl Character {
    pub fn new(player: String, name: String, gold_minor: i64, downtime: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            name,
            ledger: Ledger {
                gold_minor,
                downtime,
            },
        }
    }

    pub fn is_owned_by(&self, principal: &str) -> bool {
        self.player == principal
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "characters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub player: String,
    pub name: String,
    pub gold_minor: i64,
    pub downtime: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::items::Entity")]
    Items,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Character> for ActiveModel {
    fn from(value: &Character) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            player: ActiveValue::Set(value.player.clone()),
            name: ActiveValue::Set(value.name.clone()),
            gold_minor: ActiveValue::Set(value.ledger.gold_minor),
            downtime: ActiveValue::Set(value.ledger.downtime),
        }
    }
}

impl TryFrom<Model> for Character {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "character")?,
            player: model.player,
            name: model.name,
            ledger: Ledger {
                gold_minor: model.gold_minor,
                downtime: model.downtime,
            },
        })
    }
}
