//! Log of rejected offers.
//!
//! Rejections are informational only: nothing in the exchange reads them back
//! to make a decision.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub id: Uuid,
    pub advert_item_id: Uuid,
    pub offered_item_id: Uuid,
    pub rejected_by: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trade_rejections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub advert_item_id: String,
    pub offered_item_id: String,
    pub rejected_by: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Rejection> for ActiveModel {
    fn from(value: &Rejection) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            advert_item_id: ActiveValue::Set(value.advert_item_id.to_string()),
            offered_item_id: ActiveValue::Set(value.offered_item_id.to_string()),
            rejected_by: ActiveValue::Set(value.rejected_by.clone()),
            occurred_at: ActiveValue::Set(value.occurred_at),
        }
    }
}

impl TryFrom<Model> for Rejection {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "rejection")?,
            advert_item_id: parse_uuid(&model.advert_item_id, "item")?,
            offered_item_id: parse_uuid(&model.offered_item_id, "item")?,
            rejected_by: model.rejected_by,
            occurred_at: model.occurred_at,
        })
    }
}
