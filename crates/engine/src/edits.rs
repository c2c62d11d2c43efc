//! Append-only record of post-creation item changes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub id: i32,
    pub item_id: Uuid,
    pub actor: String,
    pub summary: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "item_edits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: String,
    pub actor: String,
    pub summary: String,
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

impl ActiveModel {
    pub(crate) fn new(item_id: Uuid, actor: &str, summary: String, at: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            item_id: ActiveValue::Set(item_id.to_string()),
            actor: ActiveValue::Set(actor.to_string()),
            summary: ActiveValue::Set(summary),
            occurred_at: ActiveValue::Set(at),
        }
    }
}

impl TryFrom<Model> for Edit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            item_id: parse_uuid(&model.item_id, "item")?,
            actor: model.actor,
            summary: model.summary,
            occurred_at: model.occurred_at,
        })
    }
}
