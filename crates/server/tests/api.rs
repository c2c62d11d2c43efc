use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use engine::{Engine, ItemOrigin, ManualCreation, NewItemCmd, Rarity};
use migration::MigratorTrait;
use server::{ServerState, app};

struct Harness {
    app: Router,
    engine: Arc<Engine>,
}

async fn harness() -> Harness {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Arc::new(
        Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap(),
    );
    let app = app(ServerState {
        engine: engine.clone(),
        db,
    });
    Harness { app, engine }
}

impl Harness {
    async fn character(&self, user: &str, name: &str, downtime: i64) -> Uuid {
        self.engine
            .new_character(user, name, 0, downtime)
            .await
            .unwrap()
    }

    async fn item(&self, character_id: Uuid, user: &str, name: &str, rarity: Rarity) -> Uuid {
        let origin = ItemOrigin::ManualCreation(ManualCreation {
            created_by: user.to_string(),
            created_at: chrono::Utc::now(),
        });
        self.engine
            .new_item(NewItemCmd::new(
                character_id,
                user,
                name,
                rarity,
                origin,
            ))
            .await
            .unwrap()
            .id
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            let credentials = STANDARD.encode(format!("{user}:password"));
            request = request.header(header::AUTHORIZATION, format!("Basic {credentials}"));
        }
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

#[tokio::test]
async fn writes_require_credentials() {
    let h = harness().await;

    let (status, _) = h
        .send(
            Method::POST,
            "/adverts",
            None,
            Some(json!({ "item_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = h
        .send(
            Method::POST,
            "/adverts",
            Some("mallory"),
            Some(json!({ "item_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_trade_over_http() {
    let h = harness().await;
    let meepo = h.character("alice", "Meepo", 10).await;
    let meela = h.character("bob", "Meela", 10).await;
    let boots = h.item(meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let lantern = h.item(meela, "bob", "Lantern", Rarity::Uncommon).await;

    let (status, advert) = h
        .send(
            Method::POST,
            "/adverts",
            Some("alice"),
            Some(json!({ "item_id": boots, "description": "barely used" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let advert_id = advert["id"].as_str().unwrap().to_string();

    let (status, listings) = h.send(Method::GET, "/adverts?search=wing", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listings.as_array().unwrap().len(), 1);
    assert_eq!(listings[0]["owner"], "alice");

    let (status, offer) = h
        .send(
            Method::POST,
            "/offers",
            Some("bob"),
            Some(json!({ "advert_id": advert_id, "item_id": lantern })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let (status, incoming) = h
        .send(Method::GET, "/offers?direction=in", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(incoming[0]["offer"]["id"], offer_id.as_str());

    let (status, _) = h
        .send(
            Method::POST,
            &format!("/trade-action/{offer_id}/accept"),
            Some("bob"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, result) = h
        .send(
            Method::POST,
            &format!("/trade-action/{offer_id}/accept"),
            Some("alice"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["trades"].as_array().unwrap().len(), 2);

    let (status, ledger) = h
        .send(Method::GET, &format!("/characters/{meela}/ledger"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["downtime"], 5);

    let (status, history) = h
        .send(Method::GET, &format!("/items/{boots}/history"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["origin"]["event_type"], "manual_creation");
    assert_eq!(history["trades"][0]["recipient_id"], meela.to_string());

    let (status, body) = h
        .send(Method::GET, &format!("/adverts/{advert_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn domain_errors_are_bad_requests() {
    let h = harness().await;
    let meepo = h.character("alice", "Meepo", 10).await;
    let boots = h.item(meepo, "alice", "Winged boots", Rarity::Uncommon).await;

    let body = json!({ "item_id": boots });
    let (status, _) = h
        .send(Method::POST, "/adverts", Some("alice"), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = h
        .send(Method::POST, "/adverts", Some("alice"), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().starts_with("Conflict"));

    let (status, record) = h
        .send(
            Method::POST,
            "/downtime/catchingup",
            Some("alice"),
            Some(json!({ "character_id": meepo, "levels": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["kind"], "catchingup");

    let (status, error) = h
        .send(
            Method::POST,
            "/downtime/catchingup",
            Some("alice"),
            Some(json!({ "character_id": meepo })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["message"],
        "Insufficient downtime: required 10 days, available 0 days"
    );
}

#[tokio::test]
async fn downtime_records_are_public() {
    let h = harness().await;
    let meepo = h.character("alice", "Meepo", 3).await;

    let (status, record) = h
        .send(
            Method::POST,
            "/downtime/freeform",
            Some("alice"),
            Some(json!({
                "character_id": meepo,
                "title": "Carousing",
                "gold_change_minor": -500,
                "auto_apply": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = record["id"].as_str().unwrap().to_string();

    let (status, fetched) = h
        .send(Method::GET, &format!("/downtime/freeform/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Carousing");

    let (status, _) = h
        .send(Method::GET, &format!("/downtime/crafting/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = h
        .send(Method::GET, &format!("/characters/{meepo}/downtime"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn other_players_cannot_spend_my_downtime() {
    let h = harness().await;
    let meepo = h.character("alice", "Meepo", 30).await;

    let (status, _) = h
        .send(
            Method::POST,
            "/downtime/catchingup",
            Some("bob"),
            Some(json!({ "character_id": meepo })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(h.engine.balance(meepo).await.unwrap().downtime, 30);
}

#[tokio::test]
async fn offers_must_match_rarity() {
    let h = harness().await;
    let meepo = h.character("alice", "Meepo", 10).await;
    let meela = h.character("bob", "Meela", 10).await;
    let boots = h.item(meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let staff = h.item(meela, "bob", "Staff of power", Rarity::VeryRare).await;

    let (_, advert) = h
        .send(
            Method::POST,
            "/adverts",
            Some("alice"),
            Some(json!({ "item_id": boots })),
        )
        .await;

    let (status, error) = h
        .send(
            Method::POST,
            "/offers",
            Some("bob"),
            Some(json!({ "advert_id": advert["id"], "item_id": staff })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["message"],
        "Trades must be of the same rarity: offered veryrare, wanted uncommon"
    );
}
