//! Item provenance: origin plus append-only edit, trade and rejection logs.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Edit, EngineError, ItemOrigin, Rejection, ResultEngine, Trade, TradeLeg, edits, origins,
    rejections, trades,
};

/// Full audit trail of one item. Lists are oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemHistory {
    pub item_id: Uuid,
    pub origin: ItemOrigin,
    pub edits: Vec<Edit>,
    pub trades: Vec<Trade>,
    pub rejections: Vec<Rejection>,
}

/// Store the origin of a freshly created item.
///
/// The origin row is keyed by the item id, so a second call for the same item
/// fails with `Conflict`.
pub async fn record_origin<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    origin: &ItemOrigin,
) -> ResultEngine<()> {
    origin.validate()?;
    let exists = origins::Entity::find_by_id(item_id.to_string())
        .one(conn)
        .await?
        .is_some();
    if exists {
        return Err(EngineError::Conflict(
            "item origin already recorded".to_string(),
        ));
    }
    origins::ActiveModel::from_origin(item_id, origin)
        .insert(conn)
        .await?;
    Ok(())
}

pub async fn record_edit<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    actor: &str,
    summary: String,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<()> {
    edits::ActiveModel::new(item_id, actor, summary, occurred_at)
        .insert(conn)
        .await?;
    Ok(())
}

/// Write both legs of a completed barter. Only the exchange calls this.
pub(crate) async fn record_trade<C: ConnectionTrait>(
    conn: &C,
    leg_a: TradeLeg,
    leg_b: TradeLeg,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<(Trade, Trade)> {
    let (first, second) = Trade::pair(leg_a, leg_b, occurred_at);
    trades::ActiveModel::from(&first).insert(conn).await?;
    trades::ActiveModel::from(&second).insert(conn).await?;
    Ok((first, second))
}

pub(crate) async fn record_rejection<C: ConnectionTrait>(
    conn: &C,
    advert_item_id: Uuid,
    offered_item_id: Uuid,
    rejected_by: &str,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<Rejection> {
    let rejection = Rejection {
        id: Uuid::new_v4(),
        advert_item_id,
        offered_item_id,
        rejected_by: rejected_by.to_string(),
        occurred_at,
    };
    rejections::ActiveModel::from(&rejection)
        .insert(conn)
        .await?;
    Ok(rejection)
}

pub(crate) async fn load_history<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
) -> ResultEngine<ItemHistory> {
    let item = item_id.to_string();

    let origin = origins::Entity::find_by_id(item.clone())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("item origin not exists".to_string()))?;
    let origin = ItemOrigin::try_from(origin)?;

    let edits = edits::Entity::find()
        .filter(edits::Column::ItemId.eq(item.clone()))
        .order_by_asc(edits::Column::OccurredAt)
        .order_by_asc(edits::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Edit::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    let trades = trades::Entity::find()
        .filter(trades::Column::ItemId.eq(item.clone()))
        .order_by_asc(trades::Column::OccurredAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Trade::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    let rejections = rejections::Entity::find()
        .filter(
            rejections::Column::AdvertItemId
                .eq(item.clone())
                .or(rejections::Column::OfferedItemId.eq(item)),
        )
        .order_by_asc(rejections::Column::OccurredAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Rejection::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    Ok(ItemHistory {
        item_id,
        origin,
        edits,
        trades,
        rejections,
    })
}
