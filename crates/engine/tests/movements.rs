use std::sync::Arc;

use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, MovementRequest};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_product() -> Engine {
    let (engine, _db) = engine_with_db().await;
    engine.new_product("P001", "Widget", "pcs").await.unwrap();
    engine
}

fn today() -> String {
    Utc::now().date_naive().to_string()
}

/// Replays a product's full history in creation order and checks the
/// continuity invariant: every stored balance equals the running sum of
/// quantities from zero.
async fn assert_continuity(engine: &Engine, product_id: &str) {
    let mut history = engine.movements_for_product(product_id).await.unwrap();
    history.reverse(); // newest-first -> creation order

    let mut running = 0;
    for record in &history {
        running += record.quantity;
        assert_eq!(record.stock_after, running, "broken balance chain");
        assert!(record.stock_after >= 0);
    }
    assert_eq!(engine.current_stock(product_id).await.unwrap(), running);
}

#[tokio::test]
async fn ledger_scenario_in_out_and_overdraw() {
    let engine = engine_with_product().await;

    assert_eq!(engine.current_stock("P001").await.unwrap(), 0);

    let record = engine
        .submit_movement(&MovementRequest::new("P001", "50", &today()))
        .await
        .unwrap();
    assert_eq!(record.stock_after, 50);

    let record = engine
        .submit_movement(&MovementRequest::new("P001", "-20", &today()))
        .await
        .unwrap();
    assert_eq!(record.stock_after, 30);

    let err = engine
        .submit_movement(&MovementRequest::new("P001", "-40", &today()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            available: 30,
            unit: "pcs".to_string(),
        }
    );

    // The rejected movement left no trace.
    assert_eq!(engine.current_stock("P001").await.unwrap(), 30);
    assert_eq!(engine.movements_for_product("P001").await.unwrap().len(), 2);
    assert_continuity(&engine, "P001").await;
}

#[tokio::test]
async fn stock_of_unknown_history_is_zero() {
    let engine = engine_with_product().await;
    assert_eq!(engine.current_stock("P001").await.unwrap(), 0);
    // No history requirement on the calculator, even for uncataloged ids.
    assert_eq!(engine.current_stock("NOPE").await.unwrap(), 0);
}

#[tokio::test]
async fn reads_are_idempotent() {
    let engine = engine_with_product().await;
    engine
        .submit_movement(&MovementRequest::new("P001", "7", &today()))
        .await
        .unwrap();

    let first = engine.current_stock("P001").await.unwrap();
    let second = engine.current_stock("P001").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn movement_dated_today_is_accepted_tomorrow_is_not() {
    let engine = engine_with_product().await;

    engine
        .submit_movement(&MovementRequest::new("P001", "1", &today()))
        .await
        .unwrap();

    let tomorrow = (Utc::now().date_naive() + chrono::Days::new(1)).to_string();
    let err = engine
        .submit_movement(&MovementRequest::new("P001", "1", &tomorrow))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::FutureDate(_)));
}

#[tokio::test]
async fn backdated_movements_are_accepted() {
    let engine = engine_with_product().await;

    let last_week = (Utc::now().date_naive() - chrono::Days::new(7)).to_string();
    let record = engine
        .submit_movement(&MovementRequest::new("P001", "5", &last_week))
        .await
        .unwrap();
    assert_eq!(record.stock_after, 5);
}

#[tokio::test]
async fn structural_failures_reject_before_touching_the_store() {
    let engine = engine_with_product().await;

    let err = engine
        .submit_movement(&MovementRequest {
            product_id: None,
            quantity: Some("5".to_string()),
            effective_date: Some(today()),
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MissingField("productId"));

    let err = engine
        .submit_movement(&MovementRequest::new("P001", "lots", &today()))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidQuantity("lots".to_string()));

    let err = engine
        .submit_movement(&MovementRequest::new("P999", "5", &today()))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownProduct("P999".to_string()));

    assert!(engine.movements().await.unwrap().is_empty());
}

#[tokio::test]
async fn product_ids_are_case_normalized() {
    let engine = engine_with_product().await;

    let record = engine
        .submit_movement(&MovementRequest::new("p001", "10", &today()))
        .await
        .unwrap();
    assert_eq!(record.product_id, "P001");
    assert_eq!(engine.current_stock("p001").await.unwrap(), 10);
}

#[tokio::test]
async fn zero_quantity_movement_is_recorded() {
    let engine = engine_with_product().await;
    engine
        .submit_movement(&MovementRequest::new("P001", "4", &today()))
        .await
        .unwrap();

    // Accepted, recorded, balance unchanged.
    let record = engine
        .submit_movement(&MovementRequest::new("P001", "0", &today()))
        .await
        .unwrap();
    assert_eq!(record.quantity, 0);
    assert_eq!(record.stock_after, 4);
    assert_eq!(engine.movements_for_product("P001").await.unwrap().len(), 2);
    assert_continuity(&engine, "P001").await;
}

#[tokio::test]
async fn products_are_independent_ledgers() {
    let engine = engine_with_product().await;
    engine.new_product("P002", "Gadget", "kg").await.unwrap();

    engine
        .submit_movement(&MovementRequest::new("P001", "10", &today()))
        .await
        .unwrap();
    engine
        .submit_movement(&MovementRequest::new("P002", "3", &today()))
        .await
        .unwrap();

    let err = engine
        .submit_movement(&MovementRequest::new("P002", "-5", &today()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            available: 3,
            unit: "kg".to_string(),
        }
    );

    assert_eq!(engine.current_stock("P001").await.unwrap(), 10);
    assert_eq!(engine.current_stock("P002").await.unwrap(), 3);
    assert_continuity(&engine, "P001").await;
    assert_continuity(&engine, "P002").await;
}

#[tokio::test]
async fn history_orders_by_business_date_then_creation() {
    let engine = engine_with_product().await;

    let yesterday = (Utc::now().date_naive() - chrono::Days::new(1)).to_string();
    engine
        .submit_movement(&MovementRequest::new("P001", "10", &today()))
        .await
        .unwrap();
    // Backdated record entered later: listed after today's record, but the
    // balance chain still follows creation order.
    engine
        .submit_movement(&MovementRequest::new("P001", "5", &yesterday))
        .await
        .unwrap();

    let history = engine.movements().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].0.quantity, 10);
    assert_eq!(history[1].0.quantity, 5);
    assert_eq!(history[1].0.stock_after, 15);
    assert_continuity(&engine, "P001").await;
}

#[tokio::test]
async fn stock_levels_cover_the_whole_catalog() {
    let engine = engine_with_product().await;
    engine.new_product("P002", "Gadget", "kg").await.unwrap();
    engine
        .submit_movement(&MovementRequest::new("P001", "8", &today()))
        .await
        .unwrap();

    let levels = engine.stock_levels().await.unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].0.id, "P001");
    assert_eq!(levels[0].1, 8);
    assert_eq!(levels[1].0.id, "P002");
    assert_eq!(levels[1].1, 0);
}

#[tokio::test]
async fn duplicate_product_id_is_rejected() {
    let engine = engine_with_product().await;

    let err = engine.new_product("p001", "Other", "kg").await.unwrap_err();
    assert_eq!(err, EngineError::ProductExists("P001".to_string()));
}

#[tokio::test]
async fn interleaved_submissions_keep_the_chain_consistent() {
    let engine = Arc::new({
        let engine = engine_with_product().await;
        engine
            .submit_movement(&MovementRequest::new("P001", "5", &today()))
            .await
            .unwrap();
        engine
    });

    let incoming = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .submit_movement(&MovementRequest::new("P001", "10", &today()))
                .await
        })
    };
    let outgoing = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .submit_movement(&MovementRequest::new("P001", "-8", &today()))
                .await
        })
    };

    let incoming = incoming.await.unwrap();
    let outgoing = outgoing.await.unwrap();

    // +10 always fits. -8 is legal only after +10 landed; otherwise it must
    // be rejected, never clamped or applied out of order.
    assert!(incoming.is_ok());
    let expected = match &outgoing {
        Ok(_) => 7,
        Err(EngineError::InsufficientStock { available, unit }) => {
            assert_eq!(unit, "pcs");
            assert!(*available == 5 || *available == 15);
            15
        }
        Err(other) => panic!("unexpected failure: {other}"),
    };

    assert_eq!(engine.current_stock("P001").await.unwrap(), expected);
    assert_continuity(&engine, "P001").await;
}
