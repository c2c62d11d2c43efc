//! Item origins.
//!
//! Every item is created with exactly one [`ItemOrigin`]: it was found in a
//! game, granted as a dungeon-master service reward, or created by hand. The
//! origin is written once, at item creation, and never changes.
//!
//! Storage is a single `item_origins` row keyed by the item id: a `kind`
//! discriminator plus the typed columns each kind needs.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OriginKind {
    Game,
    DmReward,
    ManualCreation,
}

impl OriginKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::DmReward => "dm_reward",
            Self::ManualCreation => "manual",
        }
    }
}

impl TryFrom<&str> for OriginKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "game" => Ok(Self::Game),
            "dm_reward" => Ok(Self::DmReward),
            "manual" => Ok(Self::ManualCreation),
            other => Err(EngineError::InvalidValue(format!(
                "invalid origin kind: {other}"
            ))),
        }
    }
}

/// Item found during a played session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOrigin {
    pub module: String,
    pub dm: String,
    pub played_at: DateTime<Utc>,
}

/// Item granted for dungeon-master service hours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmRewardOrigin {
    pub name: String,
    pub hours: i32,
    pub awarded_at: DateTime<Utc>,
}

/// Item entered by hand by its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCreation {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ItemOrigin {
    Game(GameOrigin),
    DmReward(DmRewardOrigin),
    ManualCreation(ManualCreation),
}

impl ItemOrigin {
    pub(crate) fn kind(&self) -> OriginKind {
        match self {
            Self::Game(_) => OriginKind::Game,
            Self::DmReward(_) => OriginKind::DmReward,
            Self::ManualCreation(_) => OriginKind::ManualCreation,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Game(game) => game.played_at,
            Self::DmReward(reward) => reward.awarded_at,
            Self::ManualCreation(manual) => manual.created_at,
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        match self {
            Self::Game(game) if game.module.trim().is_empty() => Err(
                EngineError::InvalidValue("game origin requires a module".to_string()),
            ),
            Self::DmReward(reward) if reward.hours < 0 => Err(EngineError::InvalidAmount(
                "service hours must be >= 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "item_origins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: String,
    pub kind: String,
    pub occurred_at: DateTimeUtc,
    pub module: Option<String>,
    pub dm: Option<String>,
    pub reward_name: Option<String>,
    pub hours: Option<i32>,
    pub created_by: Option<String>,
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
    pub(crate) fn from_origin(item_id: Uuid, origin: &ItemOrigin) -> Self {
        let mut model = Self {
            item_id: ActiveValue::Set(item_id.to_string()),
            kind: ActiveValue::Set(origin.kind().as_str().to_string()),
            occurred_at: ActiveValue::Set(origin.occurred_at()),
            module: ActiveValue::Set(None),
            dm: ActiveValue::Set(None),
            reward_name: ActiveValue::Set(None),
            hours: ActiveValue::Set(None),
            created_by: ActiveValue::Set(None),
        };
        match origin {
            ItemOrigin::Game(game) => {
                model.module = ActiveValue::Set(Some(game.module.clone()));
                model.dm = ActiveValue::Set(Some(game.dm.clone()));
            }
            ItemOrigin::DmReward(reward) => {
                model.reward_name = ActiveValue::Set(Some(reward.name.clone()));
                model.hours = ActiveValue::Set(Some(reward.hours));
            }
            ItemOrigin::ManualCreation(manual) => {
                model.created_by = ActiveValue::Set(Some(manual.created_by.clone()));
            }
        }
        model
    }
}

fn required<T>(value: Option<T>, column: &str) -> ResultEngine<T> {
    value.ok_or_else(|| EngineError::InvalidValue(format!("origin is missing {column}")))
}

impl TryFrom<Model> for ItemOrigin {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let origin = match OriginKind::try_from(model.kind.as_str())? {
            OriginKind::Game => Self::Game(GameOrigin {
                module: required(model.module, "module")?,
                dm: model.dm.unwrap_or_default(),
                played_at: model.occurred_at,
            }),
            OriginKind::DmReward => Self::DmReward(DmRewardOrigin {
                name: model.reward_name.unwrap_or_default(),
                hours: required(model.hours, "hours")?,
                awarded_at: model.occurred_at,
            }),
            OriginKind::ManualCreation => Self::ManualCreation(ManualCreation {
                created_by: required(model.created_by, "created_by")?,
                created_at: model.occurred_at,
            }),
        };
        Ok(origin)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn stored(origin: &ItemOrigin) -> Model {
        let active = ActiveModel::from_origin(Uuid::nil(), origin);
        Model {
            item_id: active.item_id.unwrap(),
            kind: active.kind.unwrap(),
            occurred_at: active.occurred_at.unwrap(),
            module: active.module.unwrap(),
            dm: active.dm.unwrap(),
            reward_name: active.reward_name.unwrap(),
            hours: active.hours.unwrap(),
            created_by: active.created_by.unwrap(),
        }
    }

    #[test]
    fn game_origin_keeps_module_and_dm() {
        let origin = ItemOrigin::Game(GameOrigin {
            module: "DDAL-01".to_string(),
            dm: "Volo".to_string(),
            played_at: at(),
        });
        let model = stored(&origin);
        assert_eq!(model.kind, "game");
        assert_eq!(model.reward_name, None);
        assert_eq!(ItemOrigin::try_from(model).unwrap(), origin);
    }

    #[test]
    fn manual_origin_without_author_is_rejected() {
        let mut model = stored(&ItemOrigin::ManualCreation(ManualCreation {
            created_by: "alice".to_string(),
            created_at: at(),
        }));
        model.created_by = None;
        assert!(ItemOrigin::try_from(model).is_err());
    }

    #[test]
    fn unknown_kind_is_an_invalid_value() {
        let err = OriginKind::try_from("heist").unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidValue("invalid origin kind: heist".to_string())
        );
        assert_eq!(OriginKind::try_from("dm_reward").ok(), Some(OriginKind::DmReward));
    }

    #[test]
    fn negative_service_hours_are_invalid() {
        let origin = ItemOrigin::DmReward(DmRewardOrigin {
            name: "Service reward".to_string(),
            hours: -1,
            awarded_at: at(),
        });
        assert!(origin.validate().is_err());
    }
}
