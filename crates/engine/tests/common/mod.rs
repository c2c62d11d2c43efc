#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, ItemOrigin, ManualCreation, NewItemCmd, Rarity};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob", "carol"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn manual(user: &str) -> ItemOrigin {
    ItemOrigin::ManualCreation(ManualCreation {
        created_by: user.to_string(),
        created_at: Utc::now(),
    })
}

/// Character with `downtime` days and 100 gp.
pub async fn character(engine: &Engine, user: &str, name: &str, downtime: i64) -> Uuid {
    engine
        .new_character(user, name, 10_000, downtime)
        .await
        .unwrap()
}

pub async fn item(engine: &Engine, character_id: Uuid, user: &str, name: &str, rarity: Rarity) -> Uuid {
    engine
        .new_item(NewItemCmd::new(character_id, user, name, rarity, manual(user)))
        .await
        .unwrap()
        .id
}
