//! Character read endpoints

use api_types::{character::LedgerView, downtime::ActivityView};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, downtime::activity_view, server::ServerState};

/// Current gold and downtime of a character
pub async fn ledger(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LedgerView>, ServerError> {
    let character = state.engine.character(id).await?;
    Ok(Json(LedgerView {
        character_id: character.id,
        name: character.name,
        player: character.player,
        gold_minor: character.ledger.gold_minor,
        downtime: character.ledger.downtime,
    }))
}

/// Downtime activities of a character, newest first
pub async fn downtime(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ActivityView>>, ServerError> {
    let activities = state.engine.list_activities(id).await?;
    Ok(Json(activities.into_iter().map(activity_view).collect()))
}
