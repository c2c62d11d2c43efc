use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Spells copied into a wizard's spellbook. Both costs are non-negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellbookUpdate {
    pub id: Uuid,
    pub character_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub gold_cost_minor: i64,
    pub downtime_cost: i64,
    pub dm: Option<String>,
    pub source: Option<String>,
    pub spells: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dt_spellbook_updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub character_id: String,
    pub occurred_at: DateTimeUtc,
    pub gold_cost_minor: i64,
    pub downtime_cost: i64,
    pub dm: Option<String>,
    pub source: Option<String>,
    pub spells: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SpellbookUpdate> for ActiveModel {
    fn from(value: &SpellbookUpdate) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            character_id: ActiveValue::Set(value.character_id.to_string()),
            occurred_at: ActiveValue::Set(value.occurred_at),
            gold_cost_minor: ActiveValue::Set(value.gold_cost_minor),
            downtime_cost: ActiveValue::Set(value.downtime_cost),
            dm: ActiveValue::Set(value.dm.clone()),
            source: ActiveValue::Set(value.source.clone()),
            spells: ActiveValue::Set(value.spells.clone()),
        }
    }
}

impl TryFrom<Model> for SpellbookUpdate {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            character_id: parse_uuid(&model.character_id, "character")?,
            occurred_at: model.occurred_at,
            gold_cost_minor: model.gold_cost_minor,
            downtime_cost: model.downtime_cost,
            dm: model.dm,
            source: model.source,
            spells: model.spells,
        })
    }
}
