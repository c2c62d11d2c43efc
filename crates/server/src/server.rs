use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{adverts, characters, downtime, items, offers, trade, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Resolve the principal from HTTP Basic credentials and store it in the
/// request extensions as a `user::Model`.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Routes reachable without credentials.
fn public_router() -> Router<ServerState> {
    Router::new()
        .route("/adverts", get(adverts::list))
        .route("/adverts/{id}", get(adverts::get))
        .route("/offers/{id}", get(offers::get))
        .route("/items/{id}/history", get(items::history))
        .route("/characters/{id}/ledger", get(characters::ledger))
        .route("/characters/{id}/downtime", get(characters::downtime))
        .route("/downtime/{kind}/{id}", get(downtime::get))
}

fn authed_router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/adverts", post(adverts::create))
        .route(
            "/adverts/{id}",
            patch(adverts::update).delete(adverts::withdraw),
        )
        .route("/offers", get(offers::list).post(offers::create))
        .route(
            "/offers/{id}",
            patch(offers::update).delete(offers::withdraw),
        )
        .route("/trade-action/{offer_id}/{action}", post(trade::action))
        .route("/items", post(items::create))
        .route("/items/{id}", patch(items::update))
        .route("/downtime/catchingup", post(downtime::catching_up))
        .route("/downtime/mundanetrade", post(downtime::mundane_trade))
        .route("/downtime/spellbook", post(downtime::spellbook))
        .route("/downtime/freeform", post(downtime::freeform))
        .route_layer(middleware::from_fn_with_state(state, auth))
}

/// Full application router.
pub fn app(state: ServerState) -> Router {
    public_router()
        .merge(authed_router(state.clone()))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, app(state)).await
}
