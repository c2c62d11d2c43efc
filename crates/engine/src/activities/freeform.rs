use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Anything else a character did with their downtime.
///
/// When `auto_apply` is false the deltas are informational and the balances
/// were left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeForm {
    pub id: Uuid,
    pub character_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub title: String,
    pub details: Option<String>,
    pub gold_change_minor: i64,
    pub downtime_change: i64,
    pub auto_apply: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dt_freeform")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub character_id: String,
    pub occurred_at: DateTimeUtc,
    pub title: String,
    pub details: Option<String>,
    pub gold_change_minor: i64,
    pub downtime_change: i64,
    pub auto_apply: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FreeForm> for ActiveModel {
    fn from(value: &FreeForm) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            character_id: ActiveValue::Set(value.character_id.to_string()),
            occurred_at: ActiveValue::Set(value.occurred_at),
            title: ActiveValue::Set(value.title.clone()),
            details: ActiveValue::Set(value.details.clone()),
            gold_change_minor: ActiveValue::Set(value.gold_change_minor),
            downtime_change: ActiveValue::Set(value.downtime_change),
            auto_apply: ActiveValue::Set(value.auto_apply),
        }
    }
}

impl TryFrom<Model> for FreeForm {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            character_id: parse_uuid(&model.character_id, "character")?,
            occurred_at: model.occurred_at,
            title: model.title,
            details: model.details,
            gold_change_minor: model.gold_change_minor,
            downtime_change: model.downtime_change,
            auto_apply: model.auto_apply,
        })
    }
}
