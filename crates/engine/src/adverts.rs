//! Adverts: an item put up for barter by its owner.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advert {
    pub id: Uuid,
    pub item_id: Uuid,
    pub description: Option<String>,
    /// Bumped when the advert is claimed by an accepted offer.
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Advert {
    pub fn new(item_id: Uuid, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            description,
            version: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "adverts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub item_id: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Advert> for ActiveModel {
    fn from(value: &Advert) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            item_id: ActiveValue::Set(value.item_id.to_string()),
            description: ActiveValue::Set(value.description.clone()),
            version: ActiveValue::Set(value.version),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Advert {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "advert")?,
            item_id: parse_uuid(&model.item_id, "item")?,
            description: model.description,
            version: model.version,
            created_at: model.created_at,
        })
    }
}
