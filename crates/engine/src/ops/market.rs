//! Read-side queries over open adverts and offers.

use sea_orm::{
    Condition, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::{Deserialize, Serialize};

use crate::{
    Advert, AdvertFilter, Direction, Item, Offer, OfferFilter, ResultEngine, adverts, characters,
    items, offers,
};

use super::{Engine, with_tx};

const LIKE_ESCAPE: char = '\\';

/// Case-insensitive `LIKE` prefix pattern matching `search` literally.
fn prefix_pattern(search: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(search.len() + 1);
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// An open advert with the item on offer and who holds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertListing {
    pub advert: Advert,
    pub item: Item,
    pub owner: String,
    pub character_name: String,
}

/// An outstanding offer with both items involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferListing {
    pub offer: Offer,
    pub item: Item,
    pub advert_item: Item,
}

impl Engine {
    /// Open adverts matching `filter`, newest first.
    pub async fn list_adverts(&self, filter: &AdvertFilter) -> ResultEngine<Vec<AdvertListing>> {
        with_tx!(self, |db_tx| {
            let mut query = adverts::Entity::find()
                .join(JoinType::InnerJoin, adverts::Relation::Items.def())
                .join(JoinType::InnerJoin, items::Relation::Characters.def());

            if let Some(owner) = filter.owner.as_deref() {
                query = query.filter(characters::Column::Player.eq(owner.to_string()));
            }
            if let Some(character_id) = filter.character_id {
                query = query.filter(items::Column::CharacterId.eq(character_id.to_string()));
            }
            if let Some(rarity) = filter.rarity {
                query = query.filter(items::Column::Rarity.eq(rarity.as_str()));
            }
            if let Some(search) = filter
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                query = query.filter(
                    Expr::expr(Func::lower(Expr::col((items::Entity, items::Column::Name))))
                        .like(prefix_pattern(search)),
                );
            }

            let models = query
                .order_by_desc(adverts::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut listings = Vec::with_capacity(models.len());
            for model in models {
                let advert = Advert::try_from(model)?;
                let (item, character) = self.require_item_with_owner(&db_tx, advert.item_id).await?;
                listings.push(AdvertListing {
                    advert,
                    item,
                    owner: character.player,
                    character_name: character.name,
                });
            }
            Ok(listings)
        })
    }

    /// Outstanding offers the requester is involved in.
    ///
    /// `Direction::In` selects offers against the requester's adverts,
    /// `Direction::Out` the offers the requester made. Narrowing by character
    /// only considers that character's items.
    pub async fn list_offers(
        &self,
        filter: &OfferFilter,
        user_id: &str,
    ) -> ResultEngine<Vec<OfferListing>> {
        with_tx!(self, |db_tx| {
            let mut characters_query = characters::Entity::find()
                .filter(characters::Column::Player.eq(user_id.to_string()));
            if let Some(character_id) = filter.character_id {
                characters_query =
                    characters_query.filter(characters::Column::Id.eq(character_id.to_string()));
            }
            let character_ids: Vec<String> = characters_query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| model.id)
                .collect();

            let item_ids: Vec<String> = items::Entity::find()
                .filter(items::Column::CharacterId.is_in(character_ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| model.id)
                .collect();

            let advert_ids: Vec<String> = adverts::Entity::find()
                .filter(adverts::Column::ItemId.is_in(item_ids.clone()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| model.id)
                .collect();

            let incoming = offers::Column::AdvertId.is_in(advert_ids);
            let outgoing = offers::Column::ItemId.is_in(item_ids);
            let involvement = match filter.direction {
                Direction::In => Condition::all().add(incoming),
                Direction::Out => Condition::all().add(outgoing),
                Direction::Both => Condition::any().add(incoming).add(outgoing),
            };

            let mut query = offers::Entity::find().filter(involvement);
            if let Some(advert_id) = filter.advert_id {
                query = query.filter(offers::Column::AdvertId.eq(advert_id.to_string()));
            }

            let models = query
                .order_by_desc(offers::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut listings = Vec::with_capacity(models.len());
            for model in models {
                let offer = Offer::try_from(model)?;
                let advert = self.require_advert(&db_tx, offer.advert_id).await?;
                let item = self.require_item(&db_tx, offer.item_id).await?;
                let advert_item = self.require_item(&db_tx, advert.item_id).await?;
                listings.push(OfferListing {
                    offer,
                    item,
                    advert_item,
                });
            }
            Ok(listings)
        })
    }
}

