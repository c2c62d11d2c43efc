mod common;

use engine::{
    AdvertFilter, Direction, EconomyConfig, Engine, EngineError, OfferFilter, Rarity, Resource,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use uuid::Uuid;

use common::{character, engine_with_db, item};

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

struct Barter {
    meepo: Uuid,
    meela: Uuid,
    boots: Uuid,
    lantern: Uuid,
}

/// Meepo (alice) and Meela (bob), ten days of downtime each, one uncommon
/// item each.
async fn barter(engine: &Engine) -> Barter {
    let meepo = character(engine, "alice", "Meepo", 10).await;
    let meela = character(engine, "bob", "Meela", 10).await;
    let boots = item(engine, meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let lantern = item(engine, meela, "bob", "Lantern", Rarity::Uncommon).await;
    Barter {
        meepo,
        meela,
        boots,
        lantern,
    }
}

#[tokio::test]
async fn accepted_offer_swaps_items_and_charges_both_sides() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, Some("flying"), "alice").await.unwrap();
    let offer = engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let (boots_leg, lantern_leg) = engine.accept(offer.id, "alice").await.unwrap();

    assert_eq!(engine.item(b.boots).await.unwrap().character_id, b.meela);
    assert_eq!(engine.item(b.lantern).await.unwrap().character_id, b.meepo);
    assert_eq!(engine.balance(b.meepo).await.unwrap().downtime, 5);
    assert_eq!(engine.balance(b.meela).await.unwrap().downtime, 5);
    assert_eq!(count(&db, "trades").await, 2);
    assert!(matches!(
        engine.advert(advert.id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    assert_eq!(boots_leg.sender_id, b.meepo);
    assert_eq!(boots_leg.recipient_id, b.meela);
    assert_eq!(lantern_leg.sender_id, b.meela);
    assert_eq!(lantern_leg.recipient_id, b.meepo);
    assert_eq!(boots_leg.associated_id, lantern_leg.id);
    assert_eq!(lantern_leg.associated_id, boots_leg.id);

    let history = engine.item_history(b.boots).await.unwrap();
    assert_eq!(history.trades.len(), 1);
    assert_eq!(history.trades[0].id, boots_leg.id);
}

#[tokio::test]
async fn mismatched_rarity_is_refused() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;
    let cloak = item(&engine, b.meela, "bob", "Cloak", Rarity::Rare).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let err = engine
        .create_offer(advert.id, cloak, None, "bob")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::RarityMismatch {
            offered: Rarity::Rare,
            wanted: Rarity::Uncommon,
        }
    );
    assert_eq!(count(&db, "offers").await, 0);
}

#[tokio::test]
async fn offering_to_the_same_character_is_invalid() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;
    let ring = item(&engine, b.meepo, "alice", "Ring", Rarity::Uncommon).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let err = engine
        .create_offer(advert.id, ring, None, "alice")
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidTrade(_)));
}

#[tokio::test]
async fn reject_removes_only_that_offer() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let amulet = item(&engine, carol, "carol", "Amulet", Rarity::Uncommon).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let rejected = engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let kept = engine
        .create_offer(advert.id, amulet, None, "carol")
        .await
        .unwrap();

    engine.reject(rejected.id, "alice").await.unwrap();

    assert!(engine.advert(advert.id).await.is_ok());
    assert!(engine.offer(kept.id).await.is_ok());
    assert!(matches!(
        engine.offer(rejected.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(count(&db, "trade_rejections").await, 1);

    let history = engine.item_history(b.lantern).await.unwrap();
    assert_eq!(history.rejections.len(), 1);
    assert_eq!(history.rejections[0].rejected_by, "alice");
}

#[tokio::test]
async fn item_can_only_be_listed_once() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;

    engine.create_advert(b.boots, None, "alice").await.unwrap();
    let err = engine
        .create_advert(b.boots, None, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn item_can_only_be_offered_once() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let amulet = item(&engine, carol, "carol", "Amulet", Rarity::Uncommon).await;

    let first = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let second = engine.create_advert(amulet, None, "carol").await.unwrap();

    engine
        .create_offer(first.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let err = engine
        .create_offer(second.id, b.lantern, None, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn listed_item_may_also_be_offered_elsewhere() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;

    let boots_advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let lantern_advert = engine.create_advert(b.lantern, None, "bob").await.unwrap();
    engine
        .create_offer(lantern_advert.id, b.boots, None, "alice")
        .await
        .unwrap();
    assert!(engine.advert(boots_advert.id).await.is_ok());
}

#[tokio::test]
async fn only_owners_may_act() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;

    let err = engine
        .create_advert(b.boots, None, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let err = engine
        .create_offer(advert.id, b.lantern, None, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let offer = engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    for result in [
        engine.accept(offer.id, "bob").await.map(|_| ()),
        engine.reject(offer.id, "bob").await,
        engine.withdraw_advert(advert.id, "bob").await,
        engine.withdraw_offer(offer.id, "alice").await,
    ] {
        assert!(matches!(result, Err(EngineError::Forbidden(_))));
    }
}

#[tokio::test]
async fn fee_boundary_is_inclusive() {
    let (engine, _db) = engine_with_db().await;
    let meepo = character(&engine, "alice", "Meepo", 5).await;
    let meela = character(&engine, "bob", "Meela", 5).await;
    let boots = item(&engine, meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let lantern = item(&engine, meela, "bob", "Lantern", Rarity::Uncommon).await;

    let advert = engine.create_advert(boots, None, "alice").await.unwrap();
    let offer = engine.create_offer(advert.id, lantern, None, "bob").await.unwrap();
    engine.accept(offer.id, "alice").await.unwrap();

    assert_eq!(engine.balance(meepo).await.unwrap().downtime, 0);
    assert_eq!(engine.balance(meela).await.unwrap().downtime, 0);
}

#[tokio::test]
async fn short_downtime_aborts_without_mutation() {
    let (engine, db) = engine_with_db().await;
    let meepo = character(&engine, "alice", "Meepo", 10).await;
    let meela = character(&engine, "bob", "Meela", 4).await;
    let boots = item(&engine, meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let lantern = item(&engine, meela, "bob", "Lantern", Rarity::Uncommon).await;

    let advert = engine.create_advert(boots, None, "alice").await.unwrap();
    let offer = engine.create_offer(advert.id, lantern, None, "bob").await.unwrap();
    let err = engine.accept(offer.id, "alice").await.unwrap_err();

    assert_eq!(
        err,
        EngineError::InsufficientResource {
            resource: Resource::Downtime,
            required: 5,
            available: 4,
        }
    );
    assert_eq!(engine.balance(meepo).await.unwrap().downtime, 10);
    assert_eq!(engine.balance(meela).await.unwrap().downtime, 4);
    assert_eq!(engine.item(boots).await.unwrap().character_id, meepo);
    assert_eq!(count(&db, "trades").await, 0);
    assert!(engine.offer(offer.id).await.is_ok());
}

#[tokio::test]
async fn failed_accept_rolls_back_every_write() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let offer = engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();

    // Fails after the claim, the fee debits and the ownership swap.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE TRIGGER trades_closed BEFORE INSERT ON trades \
         BEGIN SELECT RAISE(ABORT, 'trades closed'); END",
    ))
    .await
    .unwrap();

    let err = engine.accept(offer.id, "alice").await.unwrap_err();
    assert!(err.to_string().contains("trades closed"), "{err}");

    assert_eq!(engine.balance(b.meepo).await.unwrap().downtime, 10);
    assert_eq!(engine.balance(b.meela).await.unwrap().downtime, 10);
    let boots = engine.item(b.boots).await.unwrap();
    let lantern = engine.item(b.lantern).await.unwrap();
    assert_eq!(boots.character_id, b.meepo);
    assert_eq!(lantern.character_id, b.meela);
    assert_eq!(boots.version, 0);
    assert_eq!(lantern.version, 0);
    assert_eq!(engine.advert(advert.id).await.unwrap().version, advert.version);
    assert!(engine.offer(offer.id).await.is_ok());
    assert_eq!(count(&db, "trades").await, 0);

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TRIGGER trades_closed",
    ))
    .await
    .unwrap();
    engine.accept(offer.id, "alice").await.unwrap();
    assert_eq!(count(&db, "trades").await, 2);
}

#[tokio::test]
async fn offering_side_is_reported_first_when_both_are_short() {
    let (engine, _db) = engine_with_db().await;
    let meepo = character(&engine, "alice", "Meepo", 2).await;
    let meela = character(&engine, "bob", "Meela", 3).await;
    let boots = item(&engine, meepo, "alice", "Winged boots", Rarity::Uncommon).await;
    let lantern = item(&engine, meela, "bob", "Lantern", Rarity::Uncommon).await;

    let advert = engine.create_advert(boots, None, "alice").await.unwrap();
    let offer = engine.create_offer(advert.id, lantern, None, "bob").await.unwrap();
    let err = engine.accept(offer.id, "alice").await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::InsufficientResource { available: 3, .. }
    ));
}

#[tokio::test]
async fn accept_clears_every_listing_of_both_items() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let amulet = item(&engine, carol, "carol", "Amulet", Rarity::Uncommon).await;
    let torch = item(&engine, carol, "carol", "Torch", Rarity::Uncommon).await;

    let boots_advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let lantern_advert = engine.create_advert(b.lantern, None, "bob").await.unwrap();
    let amulet_advert = engine.create_advert(amulet, None, "carol").await.unwrap();

    let winning = engine
        .create_offer(boots_advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let sibling = engine
        .create_offer(boots_advert.id, torch, None, "carol")
        .await
        .unwrap();
    let on_lantern = engine
        .create_offer(lantern_advert.id, amulet, None, "carol")
        .await
        .unwrap();
    let boots_elsewhere = engine
        .create_offer(amulet_advert.id, b.boots, None, "alice")
        .await
        .unwrap();

    engine.accept(winning.id, "alice").await.unwrap();

    for offer in [winning.id, sibling.id, on_lantern.id, boots_elsewhere.id] {
        assert!(matches!(
            engine.offer(offer).await,
            Err(EngineError::KeyNotFound(_))
        ));
    }
    for advert in [boots_advert.id, lantern_advert.id] {
        assert!(matches!(
            engine.advert(advert).await,
            Err(EngineError::KeyNotFound(_))
        ));
    }
    assert!(engine.advert(amulet_advert.id).await.is_ok());
    assert_eq!(count(&db, "adverts").await, 1);
    assert_eq!(count(&db, "offers").await, 0);
}

#[tokio::test]
async fn items_can_be_traded_back() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let offer = engine.create_offer(advert.id, b.lantern, None, "bob").await.unwrap();
    engine.accept(offer.id, "alice").await.unwrap();

    let advert = engine.create_advert(b.boots, None, "bob").await.unwrap();
    let offer = engine.create_offer(advert.id, b.lantern, None, "alice").await.unwrap();
    engine.accept(offer.id, "bob").await.unwrap();

    assert_eq!(engine.item(b.boots).await.unwrap().character_id, b.meepo);
    assert_eq!(engine.item(b.lantern).await.unwrap().character_id, b.meela);
    assert_eq!(engine.item(b.boots).await.unwrap().version, 2);
    assert_eq!(engine.balance(b.meepo).await.unwrap().downtime, 0);
    assert_eq!(count(&db, "trades").await, 4);
}

#[tokio::test]
async fn concurrent_sibling_accepts_swap_once() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let amulet = item(&engine, carol, "carol", "Amulet", Rarity::Uncommon).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let first = engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let second = engine
        .create_offer(advert.id, amulet, None, "carol")
        .await
        .unwrap();

    let (a, c) = tokio::join!(
        engine.accept(first.id, "alice"),
        engine.accept(second.id, "alice")
    );

    let results = [a.map(|_| ()), c.map(|_| ())];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(EngineError::Conflict(_) | EngineError::KeyNotFound(_))
        ));
    }
    assert_eq!(count(&db, "trades").await, 2);
    assert_eq!(engine.balance(b.meepo).await.unwrap().downtime, 5);
}

#[tokio::test]
async fn custom_fee_is_charged() {
    let (_, db) = engine_with_db().await;
    let engine = Engine::builder()
        .database(db.clone())
        .economy(EconomyConfig {
            trade_fee: 2,
            ..EconomyConfig::default()
        })
        .build()
        .await
        .unwrap();
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let offer = engine.create_offer(advert.id, b.lantern, None, "bob").await.unwrap();
    engine.accept(offer.id, "alice").await.unwrap();

    assert_eq!(engine.balance(b.meela).await.unwrap().downtime, 8);
}

#[tokio::test]
async fn withdrawing_an_advert_drops_its_offers() {
    let (engine, db) = engine_with_db().await;
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    engine
        .create_offer(advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    engine.withdraw_advert(advert.id, "alice").await.unwrap();

    assert_eq!(count(&db, "adverts").await, 0);
    assert_eq!(count(&db, "offers").await, 0);
}

#[tokio::test]
async fn descriptions_can_be_edited_by_owners() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;

    let advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let offer = engine
        .create_offer(advert.id, b.lantern, Some("shiny"), "bob")
        .await
        .unwrap();

    let advert = engine
        .update_advert(advert.id, Some(" lightly used "), "alice")
        .await
        .unwrap();
    assert_eq!(advert.description.as_deref(), Some("lightly used"));

    let err = engine
        .update_offer(offer.id, Some("dull"), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let offer = engine.update_offer(offer.id, None, "bob").await.unwrap();
    assert_eq!(engine.offer(offer.id).await.unwrap().description, None);
}

#[tokio::test]
async fn adverts_can_be_filtered() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let wand = item(&engine, carol, "carol", "Wand of Web", Rarity::Rare).await;

    engine.create_advert(b.boots, None, "alice").await.unwrap();
    engine.create_advert(b.lantern, None, "bob").await.unwrap();
    engine.create_advert(wand, None, "carol").await.unwrap();

    let all = engine.list_adverts(&AdvertFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let by_owner = engine
        .list_adverts(&AdvertFilter {
            owner: Some("bob".to_string()),
            ..AdvertFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_owner.len(), 1);
    assert_eq!(by_owner[0].item.name, "Lantern");
    assert_eq!(by_owner[0].character_name, "Meela");

    let by_prefix = engine
        .list_adverts(&AdvertFilter {
            search: Some("WIN".to_string()),
            ..AdvertFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_prefix.len(), 1);
    assert_eq!(by_prefix[0].item.id, b.boots);

    let rare = engine
        .list_adverts(&AdvertFilter {
            rarity: Some(Rarity::Rare),
            character_id: Some(carol),
            ..AdvertFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(rare.len(), 1);
    assert_eq!(rare[0].item.id, wand);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let potion = item(&engine, carol, "carol", "100% pure_oil", Rarity::Uncommon).await;

    engine.create_advert(b.boots, None, "alice").await.unwrap();
    engine.create_advert(potion, None, "carol").await.unwrap();

    for search in ["%", "_", "1_0"] {
        let hits = engine
            .list_adverts(&AdvertFilter {
                search: Some(search.to_string()),
                ..AdvertFilter::default()
            })
            .await
            .unwrap();
        assert!(hits.is_empty(), "{search} matched {hits:?}");
    }

    let hits = engine
        .list_adverts(&AdvertFilter {
            search: Some("100% pure_".to_string()),
            ..AdvertFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.id, potion);
}

#[tokio::test]
async fn offers_are_listed_by_direction() {
    let (engine, _db) = engine_with_db().await;
    let b = barter(&engine).await;
    let carol = character(&engine, "carol", "Cora", 10).await;
    let amulet = item(&engine, carol, "carol", "Amulet", Rarity::Uncommon).await;

    let boots_advert = engine.create_advert(b.boots, None, "alice").await.unwrap();
    let amulet_advert = engine.create_advert(amulet, None, "carol").await.unwrap();
    let incoming = engine
        .create_offer(boots_advert.id, b.lantern, None, "bob")
        .await
        .unwrap();
    let outgoing = engine
        .create_offer(amulet_advert.id, b.boots, None, "alice")
        .await
        .unwrap();

    let list = |direction| {
        let engine = &engine;
        async move {
            engine
                .list_offers(
                    &OfferFilter {
                        direction,
                        ..OfferFilter::default()
                    },
                    "alice",
                )
                .await
                .unwrap()
                .into_iter()
                .map(|listing| listing.offer.id)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(list(Direction::In).await, vec![incoming.id]);
    assert_eq!(list(Direction::Out).await, vec![outgoing.id]);
    assert_eq!(list(Direction::Both).await.len(), 2);

    let carol_view = engine
        .list_offers(&OfferFilter::default(), "carol")
        .await
        .unwrap();
    assert_eq!(carol_view.len(), 1);
    assert_eq!(carol_view[0].offer.id, outgoing.id);
    assert_eq!(carol_view[0].advert_item.id, amulet);
}
