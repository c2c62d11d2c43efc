//! Downtime activity endpoints

use api_types::downtime::{
    ActivityView, CatchingUpNew, FreeFormNew, MundaneTradeNew, SpellbookUpdateNew,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{
    CatchingUpCmd, DowntimeActivity, FreeFormCmd, MundaneTradeCmd, SpellbookUpdateCmd,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn activity_view(activity: DowntimeActivity) -> ActivityView {
    match activity {
        DowntimeActivity::CatchingUp(record) => ActivityView::CatchingUp {
            id: record.id,
            character_id: record.character_id,
            occurred_at: record.occurred_at,
            levels: record.levels,
            details: record.details,
            downtime_cost: record.downtime_cost,
        },
        DowntimeActivity::MundaneTrade(record) => ActivityView::MundaneTrade {
            id: record.id,
            character_id: record.character_id,
            occurred_at: record.occurred_at,
            purchased: record.purchased,
            sold: record.sold,
            gold_change_minor: record.gold_change_minor,
        },
        DowntimeActivity::SpellbookUpdate(record) => ActivityView::SpellbookUpdate {
            id: record.id,
            character_id: record.character_id,
            occurred_at: record.occurred_at,
            gold_cost_minor: record.gold_cost_minor,
            downtime_cost: record.downtime_cost,
            dm: record.dm,
            source: record.source,
            spells: record.spells,
        },
        DowntimeActivity::FreeForm(record) => ActivityView::FreeForm {
            id: record.id,
            character_id: record.character_id,
            occurred_at: record.occurred_at,
            title: record.title,
            details: record.details,
            gold_change_minor: record.gold_change_minor,
            downtime_change: record.downtime_change,
            auto_apply: record.auto_apply,
        },
    }
}

pub async fn catching_up(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CatchingUpNew>,
) -> Result<Json<ActivityView>, ServerError> {
    let mut cmd = CatchingUpCmd::new(payload.character_id, &user.username);
    if let Some(levels) = payload.levels {
        cmd = cmd.levels(levels);
    }
    if let Some(details) = payload.details {
        cmd = cmd.details(details);
    }

    let record = state.engine.catching_up(cmd).await?;
    Ok(Json(activity_view(record)))
}

pub async fn mundane_trade(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MundaneTradeNew>,
) -> Result<Json<ActivityView>, ServerError> {
    let mut cmd = MundaneTradeCmd::new(
        payload.character_id,
        &user.username,
        payload.gold_change_minor,
    );
    cmd.purchased = payload.purchased;
    cmd.sold = payload.sold;

    let record = state.engine.mundane_trade(cmd).await?;
    Ok(Json(activity_view(record)))
}

pub async fn spellbook(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SpellbookUpdateNew>,
) -> Result<Json<ActivityView>, ServerError> {
    let mut cmd = SpellbookUpdateCmd::new(
        payload.character_id,
        &user.username,
        payload.gold_cost_minor,
        payload.downtime_cost,
    );
    cmd.dm = payload.dm;
    cmd.source = payload.source;
    cmd.spells = payload.spells;

    let record = state.engine.spellbook_update(cmd).await?;
    Ok(Json(activity_view(record)))
}

pub async fn freeform(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FreeFormNew>,
) -> Result<Json<ActivityView>, ServerError> {
    let mut cmd = FreeFormCmd::new(payload.character_id, &user.username, payload.title)
        .gold_change(payload.gold_change_minor.unwrap_or(0))
        .downtime_change(payload.downtime_change.unwrap_or(0))
        .auto_apply(payload.auto_apply.unwrap_or(true));
    cmd.details = payload.details;

    let record = state.engine.freeform(cmd).await?;
    Ok(Json(activity_view(record)))
}

/// Handle requests for a single activity record
pub async fn get(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<ActivityView>, ServerError> {
    let kind = engine::ActivityKind::try_from(kind.as_str())?;
    let record = state.engine.activity(kind, id).await?;
    Ok(Json(activity_view(record)))
}
