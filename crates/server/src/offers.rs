//! Offer API endpoints

use api_types::offer::{Direction, OfferListing, OfferNew, OfferQuery, OfferUpdate, OfferView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, items::item_view, server::ServerState, user};

fn offer_view(offer: engine::Offer) -> OfferView {
    OfferView {
        id: offer.id,
        advert_id: offer.advert_id,
        item_id: offer.item_id,
        description: offer.description,
        created_at: offer.created_at,
    }
}

fn map_direction(direction: Direction) -> engine::Direction {
    match direction {
        Direction::In => engine::Direction::In,
        Direction::Out => engine::Direction::Out,
        Direction::Both => engine::Direction::Both,
    }
}

/// Offers the requesting user made or received
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<OfferQuery>,
) -> Result<Json<Vec<OfferListing>>, ServerError> {
    let filter = engine::OfferFilter {
        direction: map_direction(query.direction.unwrap_or_default()),
        character_id: query.character,
        advert_id: query.advert,
    };

    let listings = state
        .engine
        .list_offers(&filter, &user.username)
        .await?
        .into_iter()
        .map(|listing| OfferListing {
            offer: offer_view(listing.offer),
            item: item_view(listing.item),
            advert_item: item_view(listing.advert_item),
        })
        .collect();
    Ok(Json(listings))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferView>, ServerError> {
    let offer = state.engine.offer(id).await?;
    Ok(Json(offer_view(offer)))
}

/// Handle requests for offering an item against an advert
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OfferNew>,
) -> Result<Json<OfferView>, ServerError> {
    let offer = state
        .engine
        .create_offer(
            payload.advert_id,
            payload.item_id,
            payload.description.as_deref(),
            &user.username,
        )
        .await?;
    Ok(Json(offer_view(offer)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OfferUpdate>,
) -> Result<Json<OfferView>, ServerError> {
    let offer = state
        .engine
        .update_offer(id, payload.description.as_deref(), &user.username)
        .await?;
    Ok(Json(offer_view(offer)))
}

pub async fn withdraw(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.withdraw_offer(id, &user.username).await?;
    Ok(StatusCode::OK)
}
