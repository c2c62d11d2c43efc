//! Item API endpoints

use api_types::{
    Rarity as ApiRarity,
    item::{
        EditView, ItemHistory, ItemNew, ItemUpdate, ItemView, OriginNew, OriginView,
        RejectionView,
    },
    trade::TradeView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_rarity(rarity: engine::Rarity) -> ApiRarity {
    match rarity {
        engine::Rarity::Common => ApiRarity::Common,
        engine::Rarity::Uncommon => ApiRarity::Uncommon,
        engine::Rarity::Rare => ApiRarity::Rare,
        engine::Rarity::VeryRare => ApiRarity::VeryRare,
        engine::Rarity::Legendary => ApiRarity::Legendary,
    }
}

pub(crate) fn engine_rarity(rarity: ApiRarity) -> engine::Rarity {
    match rarity {
        ApiRarity::Common => engine::Rarity::Common,
        ApiRarity::Uncommon => engine::Rarity::Uncommon,
        ApiRarity::Rare => engine::Rarity::Rare,
        ApiRarity::VeryRare => engine::Rarity::VeryRare,
        ApiRarity::Legendary => engine::Rarity::Legendary,
    }
}

pub(crate) fn item_view(item: engine::Item) -> ItemView {
    ItemView {
        id: item.id,
        character_id: item.character_id,
        name: item.name,
        rarity: map_rarity(item.rarity),
        description: item.description,
        flavour: item.flavour,
        version: item.version,
        created_at: item.created_at,
    }
}

pub(crate) fn trade_view(trade: engine::Trade) -> TradeView {
    TradeView {
        id: trade.id,
        item_id: trade.item_id,
        sender_id: trade.sender_id,
        recipient_id: trade.recipient_id,
        associated_id: trade.associated_id,
        occurred_at: trade.occurred_at,
    }
}

fn origin_view(origin: engine::ItemOrigin) -> OriginView {
    match origin {
        engine::ItemOrigin::Game(game) => OriginView::Game {
            module: game.module,
            dm: game.dm,
            played_at: game.played_at,
        },
        engine::ItemOrigin::DmReward(reward) => OriginView::DmReward {
            name: reward.name,
            hours: reward.hours,
            awarded_at: reward.awarded_at,
        },
        engine::ItemOrigin::ManualCreation(manual) => OriginView::ManualCreation {
            created_by: manual.created_by,
            created_at: manual.created_at,
        },
    }
}

fn engine_origin(origin: OriginNew, username: &str) -> engine::ItemOrigin {
    let now = Utc::now();
    match origin {
        OriginNew::Game {
            module,
            dm,
            played_at,
        } => engine::ItemOrigin::Game(engine::GameOrigin {
            module,
            dm,
            played_at: played_at.unwrap_or(now),
        }),
        OriginNew::DmReward {
            name,
            hours,
            awarded_at,
        } => engine::ItemOrigin::DmReward(engine::DmRewardOrigin {
            name,
            hours,
            awarded_at: awarded_at.unwrap_or(now),
        }),
        OriginNew::ManualCreation => engine::ItemOrigin::ManualCreation(engine::ManualCreation {
            created_by: username.to_string(),
            created_at: now,
        }),
    }
}

/// Handle requests for creating a new item
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ItemNew>,
) -> Result<Json<ItemView>, ServerError> {
    let origin = engine_origin(payload.origin, &user.username);
    let mut cmd = engine::NewItemCmd::new(
        payload.character_id,
        &user.username,
        payload.name,
        engine_rarity(payload.rarity),
        origin,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(flavour) = payload.flavour {
        cmd = cmd.flavour(flavour);
    }

    let item = state.engine.new_item(cmd).await?;
    Ok(Json(item_view(item)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<ItemView>, ServerError> {
    let patch = engine::ItemPatch {
        name: payload.name,
        rarity: payload.rarity.map(engine_rarity),
        description: payload.description,
        flavour: payload.flavour,
    };
    let item = state.engine.update_item(id, patch, &user.username).await?;
    Ok(Json(item_view(item)))
}

/// Origin, edits, trades and rejections of an item
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemHistory>, ServerError> {
    let history = state.engine.item_history(id).await?;

    Ok(Json(ItemHistory {
        item_id: history.item_id,
        origin: origin_view(history.origin),
        edits: history
            .edits
            .into_iter()
            .map(|edit| EditView {
                actor: edit.actor,
                summary: edit.summary,
                occurred_at: edit.occurred_at,
            })
            .collect(),
        trades: history.trades.into_iter().map(trade_view).collect(),
        rejections: history
            .rejections
            .into_iter()
            .map(|rejection| RejectionView {
                advert_item_id: rejection.advert_item_id,
                offered_item_id: rejection.offered_item_id,
                rejected_by: rejection.rejected_by,
                occurred_at: rejection.occurred_at,
            })
            .collect(),
    }))
}
