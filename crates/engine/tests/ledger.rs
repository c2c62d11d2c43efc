mod common;

use engine::{Delta, EngineError, Resource, ledger};
use uuid::Uuid;

use common::{character, engine_with_db};

#[tokio::test]
async fn debit_checked_moves_balance() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 12).await;

    engine.debit_checked(id, 5, Resource::Downtime).await.unwrap();
    engine.credit(id, 250, Resource::Gold).await.unwrap();

    let balance = engine.balance(id).await.unwrap();
    assert_eq!(balance.downtime, 7);
    assert_eq!(balance.gold_minor, 10_250);
}

#[tokio::test]
async fn debit_checked_refuses_overdraft_without_mutation() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 4).await;

    let err = engine
        .debit_checked(id, 5, Resource::Downtime)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientResource {
            resource: Resource::Downtime,
            required: 5,
            available: 4,
        }
    );
    assert_eq!(engine.balance(id).await.unwrap().downtime, 4);
}

#[tokio::test]
async fn debit_to_exactly_zero_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 0).await;

    engine
        .debit_checked(id, 10_000, Resource::Gold)
        .await
        .unwrap();
    assert_eq!(engine.balance(id).await.unwrap().gold_minor, 0);
}

#[tokio::test]
async fn non_positive_debit_is_invalid() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 3).await;

    for amount in [0, -2] {
        let err = engine
            .debit_checked(id, amount, Resource::Downtime)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn credit_accepts_negative_amounts() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 3).await;

    engine.credit(id, -5, Resource::Downtime).await.unwrap();
    assert_eq!(engine.balance(id).await.unwrap().downtime, -2);
}

#[tokio::test]
async fn unknown_character_is_not_found() {
    let (engine, db) = engine_with_db().await;

    let err = engine
        .credit(Uuid::new_v4(), 1, Resource::Gold)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = ledger::debit_checked(&db, Uuid::new_v4(), 1, Resource::Gold)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn new_character_requires_existing_player() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_character("mallory", "Nobody", 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.new_character("alice", "Aria", -1, 0).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn credit_refuses_to_overflow() {
    let (engine, _db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 3).await;

    let err = engine.credit(id, i64::MAX, Resource::Gold).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let balance = engine.balance(id).await.unwrap();
    assert_eq!(balance.gold_minor, 10_000);

    engine
        .credit(id, i64::MAX - 10_000, Resource::Gold)
        .await
        .unwrap();
    assert_eq!(engine.balance(id).await.unwrap().gold_minor, i64::MAX);
}

#[tokio::test]
async fn most_negative_delta_is_invalid() {
    let (engine, db) = engine_with_db().await;
    let id = character(&engine, "alice", "Aria", 3).await;

    for delta in [Delta::gold(i64::MIN), Delta::downtime(i64::MIN)] {
        let err = ledger::apply_delta(&db, id, delta).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert_eq!(engine.balance(id).await.unwrap().downtime, 3);
}
