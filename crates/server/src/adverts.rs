//! Advert API endpoints

use api_types::advert::{AdvertListing, AdvertNew, AdvertQuery, AdvertUpdate, AdvertView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    items::{engine_rarity, item_view},
    server::ServerState,
    user,
};

pub(crate) fn advert_view(advert: engine::Advert) -> AdvertView {
    AdvertView {
        id: advert.id,
        item_id: advert.item_id,
        description: advert.description,
        created_at: advert.created_at,
    }
}

/// Open adverts, optionally filtered by owner, character, name prefix or rarity
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdvertQuery>,
) -> Result<Json<Vec<AdvertListing>>, ServerError> {
    let filter = engine::AdvertFilter {
        owner: query.owner,
        character_id: query.character,
        search: query.search,
        rarity: query.rarity.map(engine_rarity),
    };

    let listings = state
        .engine
        .list_adverts(&filter)
        .await?
        .into_iter()
        .map(|listing| AdvertListing {
            advert: advert_view(listing.advert),
            item: item_view(listing.item),
            owner: listing.owner,
            character_name: listing.character_name,
        })
        .collect();
    Ok(Json(listings))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvertView>, ServerError> {
    let advert = state.engine.advert(id).await?;
    Ok(Json(advert_view(advert)))
}

/// Handle requests for listing an item
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AdvertNew>,
) -> Result<Json<AdvertView>, ServerError> {
    let advert = state
        .engine
        .create_advert(
            payload.item_id,
            payload.description.as_deref(),
            &user.username,
        )
        .await?;
    Ok(Json(advert_view(advert)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvertUpdate>,
) -> Result<Json<AdvertView>, ServerError> {
    let advert = state
        .engine
        .update_advert(id, payload.description.as_deref(), &user.username)
        .await?;
    Ok(Json(advert_view(advert)))
}

pub async fn withdraw(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.withdraw_advert(id, &user.username).await?;
    Ok(StatusCode::OK)
}
