//! Downtime activity records.
//!
//! Each variant lives in its own table. Records are immutable once written:
//! the engine only inserts and reads them.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryFilter, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub mod catching_up;
pub mod freeform;
pub mod mundane_trade;
pub mod spellbook_update;

pub use catching_up::CatchingUp;
pub use freeform::FreeForm;
pub use mundane_trade::MundaneTrade;
pub use spellbook_update::SpellbookUpdate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    CatchingUp,
    MundaneTrade,
    #[serde(rename = "spellbook")]
    SpellbookUpdate,
    FreeForm,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CatchingUp => "catchingup",
            Self::MundaneTrade => "mundanetrade",
            Self::SpellbookUpdate => "spellbook",
            Self::FreeForm => "freeform",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActivityKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "catchingup" => Ok(Self::CatchingUp),
            "mundanetrade" => Ok(Self::MundaneTrade),
            "spellbook" => Ok(Self::SpellbookUpdate),
            "freeform" => Ok(Self::FreeForm),
            other => Err(EngineError::KeyNotFound(format!(
                "activity kind {other}"
            ))),
        }
    }
}

/// A stored downtime activity of any kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DowntimeActivity {
    CatchingUp(CatchingUp),
    MundaneTrade(MundaneTrade),
    #[serde(rename = "spellbook")]
    SpellbookUpdate(SpellbookUpdate),
    FreeForm(FreeForm),
}

impl DowntimeActivity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::CatchingUp(_) => ActivityKind::CatchingUp,
            Self::MundaneTrade(_) => ActivityKind::MundaneTrade,
            Self::SpellbookUpdate(_) => ActivityKind::SpellbookUpdate,
            Self::FreeForm(_) => ActivityKind::FreeForm,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::CatchingUp(record) => record.id,
            Self::MundaneTrade(record) => record.id,
            Self::SpellbookUpdate(record) => record.id,
            Self::FreeForm(record) => record.id,
        }
    }

    pub fn character_id(&self) -> Uuid {
        match self {
            Self::CatchingUp(record) => record.character_id,
            Self::MundaneTrade(record) => record.character_id,
            Self::SpellbookUpdate(record) => record.character_id,
            Self::FreeForm(record) => record.character_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::CatchingUp(record) => record.occurred_at,
            Self::MundaneTrade(record) => record.occurred_at,
            Self::SpellbookUpdate(record) => record.occurred_at,
            Self::FreeForm(record) => record.occurred_at,
        }
    }

    pub(crate) async fn insert<C: ConnectionTrait>(&self, conn: &C) -> ResultEngine<()> {
        match self {
            Self::CatchingUp(record) => {
                catching_up::ActiveModel::from(record).insert(conn).await?;
            }
            Self::MundaneTrade(record) => {
                mundane_trade::ActiveModel::from(record).insert(conn).await?;
            }
            Self::SpellbookUpdate(record) => {
                spellbook_update::ActiveModel::from(record)
                    .insert(conn)
                    .await?;
            }
            Self::FreeForm(record) => {
                freeform::ActiveModel::from(record).insert(conn).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn find<C: ConnectionTrait>(
        conn: &C,
        kind: ActivityKind,
        id: Uuid,
    ) -> ResultEngine<Option<Self>> {
        let id = id.to_string();
        let activity = match kind {
            ActivityKind::CatchingUp => catching_up::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|model| CatchingUp::try_from(model).map(Self::CatchingUp))
                .transpose()?,
            ActivityKind::MundaneTrade => mundane_trade::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|model| MundaneTrade::try_from(model).map(Self::MundaneTrade))
                .transpose()?,
            ActivityKind::SpellbookUpdate => spellbook_update::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|model| SpellbookUpdate::try_from(model).map(Self::SpellbookUpdate))
                .transpose()?,
            ActivityKind::FreeForm => freeform::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|model| FreeForm::try_from(model).map(Self::FreeForm))
                .transpose()?,
        };
        Ok(activity)
    }

    /// Every record of `character_id`, newest first.
    pub(crate) async fn list_for_character<C: ConnectionTrait>(
        conn: &C,
        character_id: Uuid,
    ) -> ResultEngine<Vec<Self>> {
        let character = character_id.to_string();
        let mut out = Vec::new();

        for model in catching_up::Entity::find()
            .filter(catching_up::Column::CharacterId.eq(character.clone()))
            .all(conn)
            .await?
        {
            out.push(Self::CatchingUp(CatchingUp::try_from(model)?));
        }
        for model in mundane_trade::Entity::find()
            .filter(mundane_trade::Column::CharacterId.eq(character.clone()))
            .all(conn)
            .await?
        {
            out.push(Self::MundaneTrade(MundaneTrade::try_from(model)?));
        }
        for model in spellbook_update::Entity::find()
            .filter(spellbook_update::Column::CharacterId.eq(character.clone()))
            .all(conn)
            .await?
        {
            out.push(Self::SpellbookUpdate(SpellbookUpdate::try_from(model)?));
        }
        for model in freeform::Entity::find()
            .filter(freeform::Column::CharacterId.eq(character))
            .all(conn)
            .await?
        {
            out.push(Self::FreeForm(FreeForm::try_from(model)?));
        }

        out.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
        Ok(out)
    }
}
