//! Accept or reject an offer

use api_types::trade::{TradeAction, TradeActionResult};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, items::trade_view, server::ServerState, user};

pub async fn action(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((offer_id, action)): Path<(Uuid, TradeAction)>,
) -> Result<Json<TradeActionResult>, ServerError> {
    let trades = match action {
        TradeAction::Accept => {
            let (advert_leg, offer_leg) = state.engine.accept(offer_id, &user.username).await?;
            vec![trade_view(advert_leg), trade_view(offer_leg)]
        }
        TradeAction::Reject => {
            state.engine.reject(offer_id, &user.username).await?;
            Vec::new()
        }
    };

    Ok(Json(TradeActionResult { action, trades }))
}
