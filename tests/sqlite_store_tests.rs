// SQLite store integration tests
#![cfg(feature = "database")]

mod fixtures;

use chrono::Utc;
use tempfile::TempDir;

use fieldstock::inventory::types::{
    CustomerId, Equipment, EquipmentStatus, LocationId, StockId,
};
use fieldstock::orders::types::{Order, OrderActivity, OrderStatus};
use fieldstock::{
    Action, ActionEngine, AllowAll, InventoryStore, OrderAggregator, OrderStore, SqliteStore,
    StoreError,
};

use fixtures::{fully_working_condition, stock, technician};

async fn open_store(dir: &TempDir) -> SqliteStore {
    let url = format!("sqlite://{}", dir.path().join("fieldstock.db").display());
    SqliteStore::new(&url, 2, true).await.unwrap()
}

#[tokio::test]
async fn equipment_round_trips_through_sqlite() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let warehouse = stock("Central warehouse");
    store.save_stock(&warehouse).await.unwrap();
    let equipment = Equipment::new("Router X200", fully_working_condition());
    store.save_equipment(&equipment).await.unwrap();

    let loaded = store.equipment(equipment.id).await.unwrap();
    assert_eq!(loaded, equipment);

    let loaded_stock = store.stock(warehouse.id).await.unwrap();
    assert_eq!(loaded_stock, warehouse);
}

#[tokio::test]
async fn missing_rows_surface_as_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    assert!(matches!(
        store.stock(StockId::new()).await.unwrap_err(),
        StoreError::NotFound { entity: "stock", .. }
    ));
}

#[tokio::test]
async fn actions_execute_and_ledger_persists() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let warehouse = stock("Central warehouse");
    store.save_stock(&warehouse).await.unwrap();
    let equipment = Equipment::new("Modem M50", fully_working_condition());
    store.save_equipment(&equipment).await.unwrap();

    let engine = ActionEngine::new(store.clone(), AllowAll);
    let tech = technician("alice");
    engine
        .execute(Action::Store {
            equipment: equipment.id,
            user: tech.clone(),
            stock: Some(warehouse.clone()),
            condition: None,
        })
        .await
        .unwrap();
    engine
        .execute(Action::Withdraw {
            equipment: equipment.id,
            user: tech.clone(),
            condition: None,
        })
        .await
        .unwrap();

    let held = store.equipment(equipment.id).await.unwrap();
    assert_eq!(held.status, EquipmentStatus::PickedUp);
    assert_eq!(held.holder, Some(tech.id));
    assert_eq!(held.version, 2);

    let ledger = store.transactions(equipment.id).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].stock, Some(warehouse.id));
    assert!(ledger[0].timestamp <= ledger[1].timestamp);
}

#[tokio::test]
async fn stale_version_commit_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let equipment = Equipment::new("ONT unit", fully_working_condition());
    store.save_equipment(&equipment).await.unwrap();

    let engine = ActionEngine::new(store.clone(), AllowAll);
    engine
        .execute(Action::Withdraw {
            equipment: equipment.id,
            user: technician("bob"),
            condition: None,
        })
        .await
        .unwrap();

    let current = store.equipment(equipment.id).await.unwrap();
    let ledger = store.transactions(equipment.id).await.unwrap();
    let err = store
        .commit_action(&current, 0, &ledger[0])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { expected: 0, .. }));

    // Failed commit left the ledger untouched.
    assert_eq!(store.transactions(equipment.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn orders_complete_against_the_persisted_ledger() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let order = Order::new(
        OrderActivity::Deploy,
        CustomerId::new(),
        LocationId::new(),
        Utc::now(),
    );
    store.save_order(&order).await.unwrap();
    let equipment = Equipment::new("Router X200", fully_working_condition());
    store.save_equipment(&equipment).await.unwrap();
    store.link_equipment(order.id, equipment.id).await.unwrap();

    let aggregator = OrderAggregator::new(store.clone());
    assert!(aggregator.complete(order.id, false).await.is_err());

    ActionEngine::new(store.clone(), AllowAll)
        .execute(Action::Deploy {
            equipment: equipment.id,
            user: technician("carol"),
            location: order.location,
            condition: None,
        })
        .await
        .unwrap();

    let completed = aggregator.complete(order.id, false).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(
        store.order(order.id).await.unwrap().status,
        OrderStatus::Completed
    );
}
