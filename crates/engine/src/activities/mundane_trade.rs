use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Purchase or sale of mundane equipment. `gold_change_minor` is signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MundaneTrade {
    pub id: Uuid,
    pub character_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub purchased: Option<String>,
    pub sold: Option<String>,
    pub gold_change_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dt_mundane_trades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub character_id: String,
    pub occurred_at: DateTimeUtc,
    pub purchased: Option<String>,
    pub sold: Option<String>,
    pub gold_change_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MundaneTrade> for ActiveModel {
    fn from(value: &MundaneTrade) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            character_id: ActiveValue::Set(value.character_id.to_string()),
            occurred_at: ActiveValue::Set(value.occurred_at),
            purchased: ActiveValue::Set(value.purchased.clone()),
            sold: ActiveValue::Set(value.sold.clone()),
            gold_change_minor: ActiveValue::Set(value.gold_change_minor),
        }
    }
}

impl TryFrom<Model> for MundaneTrade {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            character_id: parse_uuid(&model.character_id, "character")?,
            occurred_at: model.occurred_at,
            purchased: model.purchased,
            sold: model.sold,
            gold_change_minor: model.gold_change_minor,
        })
    }
}
