use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Downtime spent to gain levels without playing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchingUp {
    pub id: Uuid,
    pub character_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub levels: i32,
    pub details: Option<String>,
    pub downtime_cost: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dt_catching_up")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub character_id: String,
    pub occurred_at: DateTimeUtc,
    pub levels: i32,
    pub details: Option<String>,
    pub downtime_cost: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CatchingUp> for ActiveModel {
    fn from(value: &CatchingUp) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            character_id: ActiveValue::Set(value.character_id.to_string()),
            occurred_at: ActiveValue::Set(value.occurred_at),
            levels: ActiveValue::Set(value.levels),
            details: ActiveValue::Set(value.details.clone()),
            downtime_cost: ActiveValue::Set(value.downtime_cost),
        }
    }
}

impl TryFrom<Model> for CatchingUp {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            character_id: parse_uuid(&model.character_id, "character")?,
            occurred_at: model.occurred_at,
            levels: model.levels,
            details: model.details,
            downtime_cost: model.downtime_cost,
        })
    }
}
