//! Advert and offer lifecycle, and the accept/reject state machine.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    Advert, EngineError, Item, Offer, Resource, ResultEngine, Trade, TradeLeg, adverts, items,
    ledger, offers, provenance, util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn advert(&self, advert_id: Uuid) -> ResultEngine<Advert> {
        with_tx!(self, |db_tx| {
            self.require_advert(&db_tx, advert_id).await
        })
    }

    pub async fn offer(&self, offer_id: Uuid) -> ResultEngine<Offer> {
        with_tx!(self, |db_tx| { self.require_offer(&db_tx, offer_id).await })
    }

    /// List an item the requester owns. An item has at most one advert.
    pub async fn create_advert(
        &self,
        item_id: Uuid,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Advert> {
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            let (item, _) = self.require_owned_item(&db_tx, item_id, user_id).await?;

            let listed = adverts::Entity::find()
                .filter(adverts::Column::ItemId.eq(item.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if listed {
                return Err(EngineError::Conflict(
                    "item already has an advert".to_string(),
                ));
            }

            let advert = Advert::new(item.id, description);
            adverts::ActiveModel::from(&advert).insert(&db_tx).await?;
            info!(advert_id = %advert.id, item_id = %item.id, "advert created");
            Ok(advert)
        })
    }

    /// Propose one of the requester's items in exchange for an advertised one.
    ///
    /// Checks, in order: the requester owns the offered item, the two items
    /// belong to different characters, the rarities match, the offered item
    /// is not already offered elsewhere.
    pub async fn create_offer(
        &self,
        advert_id: Uuid,
        item_id: Uuid,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Offer> {
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            let (offered, _) = self.require_owned_item(&db_tx, item_id, user_id).await?;
            let advert = self.require_advert(&db_tx, advert_id).await?;
            let wanted = self.require_item(&db_tx, advert.item_id).await?;

            if offered.character_id == wanted.character_id {
                return Err(EngineError::InvalidTrade(
                    "cannot offer an item to its own character".to_string(),
                ));
            }
            if offered.rarity != wanted.rarity {
                return Err(EngineError::RarityMismatch {
                    offered: offered.rarity,
                    wanted: wanted.rarity,
                });
            }

            let already_offered = offers::Entity::find()
                .filter(offers::Column::ItemId.eq(offered.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if already_offered {
                return Err(EngineError::Conflict(
                    "item is already offered in another trade".to_string(),
                ));
            }

            let offer = Offer::new(advert.id, offered.id, description);
            offers::ActiveModel::from(&offer).insert(&db_tx).await?;
            info!(offer_id = %offer.id, advert_id = %advert.id, "offer created");
            Ok(offer)
        })
    }

    /// Accept an offer on one of the requester's adverts.
    ///
    /// Both characters pay the trade fee in downtime, the two items swap
    /// owners, a linked pair of trade records is written and every advert or
    /// offer involving either item is removed. Returns the trade legs of the
    /// advertised item and of the offered item, in that order.
    pub async fn accept(&self, offer_id: Uuid, user_id: &str) -> ResultEngine<(Trade, Trade)> {
        let fee = self.economy.trade_fee;
        with_tx!(self, |db_tx| {
            let offer = self.require_offer(&db_tx, offer_id).await?;
            let advert = self.require_advert(&db_tx, offer.advert_id).await?;
            let (wanted, seller) = self.require_item_with_owner(&db_tx, advert.item_id).await?;
            if !seller.is_owned_by(user_id) {
                return Err(EngineError::Forbidden(
                    "only the advert owner can accept offers".to_string(),
                ));
            }
            let offered = self.require_item(&db_tx, offer.item_id).await?;
            let buyer_id = offered.character_id;
            if buyer_id == seller.id {
                return Err(EngineError::InvalidTrade(
                    "both items belong to the same character".to_string(),
                ));
            }

            if fee > 0 {
                ledger::ensure_available(&db_tx, buyer_id, fee, Resource::Downtime).await?;
                ledger::ensure_available(&db_tx, seller.id, fee, Resource::Downtime).await?;
            }

            let claimed = adverts::Entity::update_many()
                .col_expr(
                    adverts::Column::Version,
                    Expr::col(adverts::Column::Version).add(1),
                )
                .filter(adverts::Column::Id.eq(advert.id.to_string()))
                .filter(adverts::Column::Version.eq(advert.version))
                .exec(&db_tx)
                .await?;
            if claimed.rows_affected == 0 {
                warn!(advert_id = %advert.id, "advert claimed by a concurrent accept");
                return Err(EngineError::Conflict(
                    "advert was already traded".to_string(),
                ));
            }

            if fee > 0 {
                ledger::debit_checked(&db_tx, buyer_id, fee, Resource::Downtime).await?;
                ledger::debit_checked(&db_tx, seller.id, fee, Resource::Downtime).await?;
            }

            self.transfer_item(&db_tx, &wanted, buyer_id).await?;
            self.transfer_item(&db_tx, &offered, seller.id).await?;

            let trades = provenance::record_trade(
                &db_tx,
                TradeLeg {
                    item_id: wanted.id,
                    sender_id: seller.id,
                    recipient_id: buyer_id,
                },
                TradeLeg {
                    item_id: offered.id,
                    sender_id: buyer_id,
                    recipient_id: seller.id,
                },
                Utc::now(),
            )
            .await?;

            offers::Entity::delete_many()
                .filter(offers::Column::AdvertId.eq(advert.id.to_string()))
                .exec(&db_tx)
                .await?;
            adverts::Entity::delete_by_id(advert.id.to_string())
                .exec(&db_tx)
                .await?;
            self.clear_listings(&db_tx, &[wanted.id, offered.id]).await?;

            info!(
                advert_id = %advert.id,
                offer_id = %offer.id,
                seller = %seller.id,
                buyer = %buyer_id,
                "trade completed"
            );
            Ok(trades)
        })
    }

    /// Decline an offer on one of the requester's adverts. Only the offer is
    /// removed; the advert stays listed.
    pub async fn reject(&self, offer_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let offer = self.require_offer(&db_tx, offer_id).await?;
            let advert = self.require_advert(&db_tx, offer.advert_id).await?;
            self.require_owned_item(&db_tx, advert.item_id, user_id)
                .await
                .map_err(|err| match err {
                    EngineError::Forbidden(_) => EngineError::Forbidden(
                        "only the advert owner can reject offers".to_string(),
                    ),
                    other => other,
                })?;

            offers::Entity::delete_by_id(offer.id.to_string())
                .exec(&db_tx)
                .await?;
            provenance::record_rejection(
                &db_tx,
                advert.item_id,
                offer.item_id,
                user_id,
                Utc::now(),
            )
            .await?;
            info!(offer_id = %offer.id, advert_id = %advert.id, "offer rejected");
            Ok(())
        })
    }

    /// Remove an advert and every offer made against it.
    pub async fn withdraw_advert(&self, advert_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let advert = self.require_advert(&db_tx, advert_id).await?;
            self.require_owned_item(&db_tx, advert.item_id, user_id).await?;

            offers::Entity::delete_many()
                .filter(offers::Column::AdvertId.eq(advert.id.to_string()))
                .exec(&db_tx)
                .await?;
            adverts::Entity::delete_by_id(advert.id.to_string())
                .exec(&db_tx)
                .await?;
            info!(advert_id = %advert.id, "advert withdrawn");
            Ok(())
        })
    }

    pub async fn withdraw_offer(&self, offer_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let offer = self.require_offer(&db_tx, offer_id).await?;
            self.require_owned_item(&db_tx, offer.item_id, user_id).await?;

            offers::Entity::delete_by_id(offer.id.to_string())
                .exec(&db_tx)
                .await?;
            info!(offer_id = %offer.id, "offer withdrawn");
            Ok(())
        })
    }

    pub async fn update_advert(
        &self,
        advert_id: Uuid,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Advert> {
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            let mut advert = self.require_advert(&db_tx, advert_id).await?;
            self.require_owned_item(&db_tx, advert.item_id, user_id).await?;

            let model = adverts::ActiveModel {
                id: ActiveValue::Set(advert.id.to_string()),
                description: ActiveValue::Set(description.clone()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            advert.description = description;
            Ok(advert)
        })
    }

    pub async fn update_offer(
        &self,
        offer_id: Uuid,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Offer> {
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            let mut offer = self.require_offer(&db_tx, offer_id).await?;
            self.require_owned_item(&db_tx, offer.item_id, user_id).await?;

            let model = offers::ActiveModel {
                id: ActiveValue::Set(offer.id.to_string()),
                description: ActiveValue::Set(description.clone()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            offer.description = description;
            Ok(offer)
        })
    }

    /// Move `item` to `recipient_id`, provided nobody changed it since it was
    /// read.
    async fn transfer_item(
        &self,
        db: &DatabaseTransaction,
        item: &Item,
        recipient_id: Uuid,
    ) -> ResultEngine<()> {
        let moved = items::Entity::update_many()
            .col_expr(
                items::Column::CharacterId,
                Expr::value(recipient_id.to_string()),
            )
            .col_expr(
                items::Column::Version,
                Expr::col(items::Column::Version).add(1),
            )
            .filter(items::Column::Id.eq(item.id.to_string()))
            .filter(items::Column::CharacterId.eq(item.character_id.to_string()))
            .filter(items::Column::Version.eq(item.version))
            .exec(db)
            .await?;
        if moved.rows_affected == 0 {
            warn!(item_id = %item.id, "item changed during trade");
            return Err(EngineError::Conflict(
                "item changed owner during the trade".to_string(),
            ));
        }
        Ok(())
    }

    /// Drop every advert, and offer against it, for the given items, plus any
    /// offer of those items.
    async fn clear_listings(&self, db: &DatabaseTransaction, item_ids: &[Uuid]) -> ResultEngine<()> {
        let item_ids: Vec<String> = item_ids.iter().map(Uuid::to_string).collect();

        let advert_ids: Vec<String> = adverts::Entity::find()
            .filter(adverts::Column::ItemId.is_in(item_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|model| model.id)
            .collect();

        if !advert_ids.is_empty() {
            offers::Entity::delete_many()
                .filter(offers::Column::AdvertId.is_in(advert_ids.clone()))
                .exec(db)
                .await?;
            adverts::Entity::delete_many()
                .filter(adverts::Column::Id.is_in(advert_ids))
                .exec(db)
                .await?;
        }
        offers::Entity::delete_many()
            .filter(offers::Column::ItemId.is_in(item_ids))
            .exec(db)
            .await?;
        Ok(())
    }
}
