use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    Character, EngineError, Ledger, Resource, ResultEngine, characters, ledger,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a character for an existing player with opening balances.
    pub async fn new_character(
        &self,
        user_id: &str,
        name: &str,
        gold_minor: i64,
        downtime: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_text(name, "character name")?;
        if gold_minor < 0 || downtime < 0 {
            return Err(EngineError::InvalidAmount(
                "opening balances must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let character = Character::new(user_id.to_string(), name, gold_minor, downtime);
            characters::ActiveModel::from(&character)
                .insert(&db_tx)
                .await?;
            info!(character_id = %character.id, player = user_id, "character created");
            Ok(character.id)
        })
    }

    pub async fn character(&self, character_id: Uuid) -> ResultEngine<Character> {
        with_tx!(self, |db_tx| {
            self.require_character(&db_tx, character_id).await
        })
    }

    /// Characters played by `user_id`, by name.
    pub async fn characters(&self, user_id: &str) -> ResultEngine<Vec<Character>> {
        with_tx!(self, |db_tx| {
            characters::Entity::find()
                .filter(characters::Column::Player.eq(user_id.to_string()))
                .order_by_asc(characters::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Character::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Current gold and downtime of a character.
    pub async fn balance(&self, character_id: Uuid) -> ResultEngine<Ledger> {
        Ok(self.character(character_id).await?.ledger)
    }

    pub async fn credit(
        &self,
        character_id: Uuid,
        amount: i64,
        resource: Resource,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            ledger::credit(&db_tx, character_id, amount, resource).await
        })
    }

    pub async fn debit_checked(
        &self,
        character_id: Uuid,
        amount: i64,
        resource: Resource,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            ledger::debit_checked(&db_tx, character_id, amount, resource).await
        })
    }
}
