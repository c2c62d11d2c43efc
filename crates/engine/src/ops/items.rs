use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    EngineError, Item, ItemHistory, ItemPatch, NewItemCmd, ResultEngine, adverts, items, offers,
    provenance, util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an item for one of the requester's characters and record its
    /// origin.
    pub async fn new_item(&self, cmd: NewItemCmd) -> ResultEngine<Item> {
        let name = normalize_required_text(&cmd.name, "item name")?;
        cmd.origin.validate()?;
        with_tx!(self, |db_tx| {
            let character = self
                .require_owned_character(&db_tx, cmd.character_id, &cmd.user_id)
                .await?;

            let item = Item {
                id: Uuid::new_v4(),
                character_id: character.id,
                name,
                rarity: cmd.rarity,
                description: cmd.description.trim().to_string(),
                flavour: cmd.flavour.trim().to_string(),
                version: 0,
                created_at: Utc::now(),
            };
            items::ActiveModel::from(&item).insert(&db_tx).await?;
            provenance::record_origin(&db_tx, item.id, &cmd.origin).await?;

            info!(item_id = %item.id, character_id = %character.id, "item created");
            Ok(item)
        })
    }

    pub async fn item(&self, item_id: Uuid) -> ResultEngine<Item> {
        with_tx!(self, |db_tx| { self.require_item(&db_tx, item_id).await })
    }

    /// Items currently held by a character.
    pub async fn items(&self, character_id: Uuid) -> ResultEngine<Vec<Item>> {
        with_tx!(self, |db_tx| {
            self.require_character(&db_tx, character_id).await?;
            items::Entity::find()
                .filter(items::Column::CharacterId.eq(character_id.to_string()))
                .order_by_asc(items::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Item::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Patch the mutable fields of an item the requester owns.
    ///
    /// An `Edit` row describing the changed fields is appended when at least
    /// one field actually changes. Rarity cannot change while the item is
    /// listed or offered.
    pub async fn update_item(
        &self,
        item_id: Uuid,
        patch: ItemPatch,
        user_id: &str,
    ) -> ResultEngine<Item> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "item name"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let (mut item, _) = self.require_owned_item(&db_tx, item_id, user_id).await?;
            let mut changes = Vec::new();

            if let Some(name) = name.filter(|name| *name != item.name) {
                changes.push(format!("name: '{}' -> '{}'", item.name, name));
                item.name = name;
            }
            if let Some(rarity) = patch.rarity.filter(|rarity| *rarity != item.rarity) {
                self.ensure_not_traded(&db_tx, item.id).await?;
                changes.push(format!("rarity: {} -> {}", item.rarity, rarity));
                item.rarity = rarity;
            }
            if let Some(description) = patch
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| *text != item.description)
            {
                changes.push("description updated".to_string());
                item.description = description;
            }
            if let Some(flavour) = patch
                .flavour
                .map(|text| text.trim().to_string())
                .filter(|text| *text != item.flavour)
            {
                changes.push("flavour updated".to_string());
                item.flavour = flavour;
            }

            if !changes.is_empty() {
                let model = items::ActiveModel {
                    id: ActiveValue::Set(item.id.to_string()),
                    name: ActiveValue::Set(item.name.clone()),
                    rarity: ActiveValue::Set(item.rarity.as_str().to_string()),
                    description: ActiveValue::Set(item.description.clone()),
                    flavour: ActiveValue::Set(item.flavour.clone()),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
                provenance::record_edit(&db_tx, item.id, user_id, changes.join("; "), Utc::now())
                    .await?;
                info!(item_id = %item.id, "item updated");
            }

            Ok(item)
        })
    }

    /// Origin plus every edit, trade and rejection of an item.
    pub async fn item_history(&self, item_id: Uuid) -> ResultEngine<ItemHistory> {
        with_tx!(self, |db_tx| {
            self.require_item(&db_tx, item_id).await?;
            provenance::load_history(&db_tx, item_id).await
        })
    }

    async fn ensure_not_traded(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
    ) -> ResultEngine<()> {
        let item = item_id.to_string();
        let listed = adverts::Entity::find()
            .filter(adverts::Column::ItemId.eq(item.clone()))
            .one(db)
            .await?
            .is_some();
        let offered = offers::Entity::find()
            .filter(offers::Column::ItemId.eq(item))
            .one(db)
            .await?
            .is_some();
        if listed || offered {
            return Err(EngineError::Conflict(
                "rarity cannot change while the item is listed or offered".to_string(),
            ));
        }
        Ok(())
    }
}
