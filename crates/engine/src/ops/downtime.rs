//! Downtime activities.
//!
//! Every activity runs the same routine: resolve the character and check the
//! requester plays it, price the activity as a list of signed deltas, apply
//! the deltas through the ledger and finally store the record. A short
//! balance aborts before anything is written.

use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use tracing::info;
use uuid::Uuid;

use crate::{
    CatchingUp, CatchingUpCmd, Delta, DowntimeActivity, EngineError, FreeForm, FreeFormCmd,
    MundaneTrade, MundaneTradeCmd, ResultEngine, SpellbookUpdate, SpellbookUpdateCmd,
    activities::ActivityKind, ledger,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{EconomyConfig, Engine, with_tx};

/// A priced downtime activity request.
pub(crate) trait Activity {
    fn character_id(&self) -> Uuid;

    fn user_id(&self) -> &str;

    /// Signed balance changes. Empty when the ledger must not be touched.
    fn price(&self, economy: &EconomyConfig) -> ResultEngine<Vec<Delta>>;

    fn into_record(
        self,
        id: Uuid,
        occurred_at: DateTime<Utc>,
        economy: &EconomyConfig,
    ) -> DowntimeActivity;
}

impl Activity for CatchingUpCmd {
    fn character_id(&self) -> Uuid {
        self.character_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn price(&self, economy: &EconomyConfig) -> ResultEngine<Vec<Delta>> {
        if self.levels.is_some_and(|levels| levels < 1) {
            return Err(EngineError::InvalidAmount(
                "levels must be >= 1".to_string(),
            ));
        }
        Ok(vec![Delta::downtime(-economy.catching_up_cost)])
    }

    fn into_record(
        self,
        id: Uuid,
        occurred_at: DateTime<Utc>,
        economy: &EconomyConfig,
    ) -> DowntimeActivity {
        DowntimeActivity::CatchingUp(CatchingUp {
            id,
            character_id: self.character_id,
            occurred_at,
            levels: self.levels.unwrap_or(1),
            details: normalize_optional_text(self.details.as_deref()),
            downtime_cost: economy.catching_up_cost,
        })
    }
}

impl Activity for MundaneTradeCmd {
    fn character_id(&self) -> Uuid {
        self.character_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn price(&self, _: &EconomyConfig) -> ResultEngine<Vec<Delta>> {
        Ok(vec![Delta::gold(self.gold_change_minor)])
    }

    fn into_record(self, id: Uuid, occurred_at: DateTime<Utc>, _: &EconomyConfig) -> DowntimeActivity {
        DowntimeActivity::MundaneTrade(MundaneTrade {
            id,
            character_id: self.character_id,
            occurred_at,
            purchased: normalize_optional_text(self.purchased.as_deref()),
            sold: normalize_optional_text(self.sold.as_deref()),
            gold_change_minor: self.gold_change_minor,
        })
    }
}

impl Activity for SpellbookUpdateCmd {
    fn character_id(&self) -> Uuid {
        self.character_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn price(&self, _: &EconomyConfig) -> ResultEngine<Vec<Delta>> {
        if self.gold_cost_minor < 0 || self.downtime_cost < 0 {
            return Err(EngineError::InvalidAmount(
                "spellbook costs must be >= 0".to_string(),
            ));
        }
        Ok(vec![
            Delta::gold(-self.gold_cost_minor),
            Delta::downtime(-self.downtime_cost),
        ])
    }

    fn into_record(self, id: Uuid, occurred_at: DateTime<Utc>, _: &EconomyConfig) -> DowntimeActivity {
        DowntimeActivity::SpellbookUpdate(SpellbookUpdate {
            id,
            character_id: self.character_id,
            occurred_at,
            gold_cost_minor: self.gold_cost_minor,
            downtime_cost: self.downtime_cost,
            dm: normalize_optional_text(self.dm.as_deref()),
            source: normalize_optional_text(self.source.as_deref()),
            spells: normalize_optional_text(self.spells.as_deref()),
        })
    }
}

impl Activity for FreeFormCmd {
    fn character_id(&self) -> Uuid {
        self.character_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn price(&self, _: &EconomyConfig) -> ResultEngine<Vec<Delta>> {
        normalize_required_text(&self.title, "title")?;
        if !self.auto_apply {
            return Ok(Vec::new());
        }
        Ok(vec![
            Delta::gold(self.gold_change_minor),
            Delta::downtime(self.downtime_change),
        ])
    }

    fn into_record(self, id: Uuid, occurred_at: DateTime<Utc>, _: &EconomyConfig) -> DowntimeActivity {
        DowntimeActivity::FreeForm(FreeForm {
            id,
            character_id: self.character_id,
            occurred_at,
            title: self.title.trim().to_string(),
            details: normalize_optional_text(self.details.as_deref()),
            gold_change_minor: self.gold_change_minor,
            downtime_change: self.downtime_change,
            auto_apply: self.auto_apply,
        })
    }
}

impl Engine {
    pub async fn catching_up(&self, cmd: CatchingUpCmd) -> ResultEngine<DowntimeActivity> {
        self.perform(cmd).await
    }

    pub async fn mundane_trade(&self, cmd: MundaneTradeCmd) -> ResultEngine<DowntimeActivity> {
        self.perform(cmd).await
    }

    pub async fn spellbook_update(
        &self,
        cmd: SpellbookUpdateCmd,
    ) -> ResultEngine<DowntimeActivity> {
        self.perform(cmd).await
    }

    pub async fn freeform(&self, cmd: FreeFormCmd) -> ResultEngine<DowntimeActivity> {
        self.perform(cmd).await
    }

    pub async fn activity(&self, kind: ActivityKind, id: Uuid) -> ResultEngine<DowntimeActivity> {
        with_tx!(self, |db_tx| {
            DowntimeActivity::find(&db_tx, kind, id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{kind} activity not exists")))
        })
    }

    /// All activities of a character, newest first.
    pub async fn list_activities(&self, character_id: Uuid) -> ResultEngine<Vec<DowntimeActivity>> {
        with_tx!(self, |db_tx| {
            self.require_character(&db_tx, character_id).await?;
            DowntimeActivity::list_for_character(&db_tx, character_id).await
        })
    }

    async fn perform<A: Activity + Send>(&self, activity: A) -> ResultEngine<DowntimeActivity> {
        let occurred_at = Utc::now();
        with_tx!(self, |db_tx| {
            let character = self
                .require_owned_character(&db_tx, activity.character_id(), activity.user_id())
                .await?;

            let price = activity.price(&self.economy)?;
            for delta in price {
                ledger::apply_delta(&db_tx, character.id, delta).await?;
            }

            let record = activity.into_record(Uuid::new_v4(), occurred_at, &self.economy);
            record.insert(&db_tx).await?;
            info!(
                activity_id = %record.id(),
                kind = %record.kind(),
                character_id = %character.id,
                "downtime activity recorded"
            );
            Ok(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catching_up_costs_the_configured_downtime() {
        let cmd = CatchingUpCmd::new(Uuid::new_v4(), "alice");
        let economy = EconomyConfig {
            trade_fee: 5,
            catching_up_cost: 12,
        };
        assert_eq!(cmd.price(&economy).unwrap(), vec![Delta::downtime(-12)]);
    }

    #[test]
    fn catching_up_requires_at_least_one_level() {
        let cmd = CatchingUpCmd::new(Uuid::new_v4(), "alice").levels(0);
        assert!(matches!(
            cmd.price(&EconomyConfig::default()),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn freeform_without_auto_apply_has_no_price() {
        let cmd = FreeFormCmd::new(Uuid::new_v4(), "alice", "Carousing")
            .gold_change(-500)
            .auto_apply(false);
        assert!(cmd.price(&EconomyConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn spellbook_costs_are_debits() {
        let cmd = SpellbookUpdateCmd::new(Uuid::new_v4(), "alice", 5000, 2);
        assert_eq!(
            cmd.price(&EconomyConfig::default()).unwrap(),
            vec![Delta::gold(-5000), Delta::downtime(-2)]
        );
        let negative = SpellbookUpdateCmd::new(Uuid::new_v4(), "alice", -1, 0);
        assert!(negative.price(&EconomyConfig::default()).is_err());
    }
}
