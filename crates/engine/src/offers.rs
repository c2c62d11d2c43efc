//! Offers: an item proposed in exchange for an advertised one.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub advert_id: Uuid,
    pub item_id: Uuid,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(advert_id: Uuid, item_id: Uuid, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            advert_id,
            item_id,
            description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub advert_id: String,
    #[sea_orm(unique)]
    pub item_id: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::adverts::Entity",
        from = "Column::AdvertId",
        to = "super::adverts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Adverts,
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Items,
}

impl Related<super::adverts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adverts.def()
    }
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Offer> for ActiveModel {
    fn from(value: &Offer) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            advert_id: ActiveValue::Set(value.advert_id.to_string()),
            item_id: ActiveValue::Set(value.item_id.to_string()),
            description: ActiveValue::Set(value.description.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Offer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "offer")?,
            advert_id: parse_uuid(&model.advert_id, "advert")?,
            item_id: parse_uuid(&model.item_id, "item")?,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
