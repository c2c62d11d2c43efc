use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    Advert, Character, EngineError, Item, Offer, ResultEngine, adverts, characters, items, offers,
    users,
};

use super::Engine;

/// Generates a `require_*` lookup that loads a row by id and converts it.
macro_rules! impl_require {
    ($require_fn:ident, $entity:path, $domain:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$domain> {
            let model = <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))?;
            <$domain>::try_from(model)
        }
    };
}

impl Engine {
    impl_require!(
        require_character,
        characters::Entity,
        Character,
        "character not exists"
    );
    impl_require!(require_item, items::Entity, Item, "item not exists");
    impl_require!(require_advert, adverts::Entity, Advert, "advert not exists");
    impl_require!(require_offer, offers::Entity, Offer, "offer not exists");

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        Ok(())
    }

    pub(super) async fn require_owned_character(
        &self,
        db: &DatabaseTransaction,
        character_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Character> {
        let character = self.require_character(db, character_id).await?;
        if !character.is_owned_by(user_id) {
            return Err(EngineError::Forbidden(
                "character belongs to another player".to_string(),
            ));
        }
        Ok(character)
    }

    /// Load an item together with the character currently holding it.
    pub(super) async fn require_item_with_owner(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
    ) -> ResultEngine<(Item, Character)> {
        let item = self.require_item(db, item_id).await?;
        let owner = self.require_character(db, item.character_id).await?;
        Ok((item, owner))
    }

    pub(super) async fn require_owned_item(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(Item, Character)> {
        let (item, owner) = self.require_item_with_owner(db, item_id).await?;
        if !owner.is_owned_by(user_id) {
            return Err(EngineError::Forbidden(
                "item belongs to another player".to_string(),
            ));
        }
        Ok((item, owner))
    }
}
