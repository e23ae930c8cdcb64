//! Integration tests for inventory-core

use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{Locale, NaiveDate};
use inventory_core::{
    utils::{MemoryAuth, MemoryStore, StrictRecordValidator},
    Collection, ExpensePatch, InventoryConfig, InventoryError, InventoryManager, NewExpense,
    NewProduct, ProductPatch, SaleBuilder, SaleHeader, SaleItem, StoreFailureKind, User,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn owner() -> User {
    User {
        uid: "owner-1".to_string(),
        display_name: Some("Store Owner".to_string()),
        email: Some("owner@example.com".to_string()),
    }
}

async fn signed_in(store: &MemoryStore) -> InventoryManager<MemoryStore> {
    let mut manager = InventoryManager::new(store.clone());
    manager
        .sign_in(&MemoryAuth::new(owner()))
        .await
        .unwrap();
    manager
}

#[tokio::test]
async fn test_complete_store_day() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;

    let tools = manager
        .categories()
        .unwrap()
        .iter()
        .find(|c| c.name == "Tools")
        .cloned()
        .unwrap();
    let paint = manager
        .categories()
        .unwrap()
        .iter()
        .find(|c| c.name == "Paint")
        .cloned()
        .unwrap();

    let hammer = manager
        .add_product(
            NewProduct::new("HAM-16", "Claw hammer", BigDecimal::from(25), BigDecimal::from(14), 12)
                .category(&tools.id)
                .supplier("Stanley"),
        )
        .await
        .unwrap();
    let roller = manager
        .add_product(
            NewProduct::new("ROL-9", "Paint roller", BigDecimal::from(8), BigDecimal::from(3), 6)
                .category(&paint.id)
                .min_stock(4),
        )
        .await
        .unwrap();

    manager
        .add_sale_from(
            SaleBuilder::new("INV-0001", date(2024, 6, 3))
                .customer("Luis", "555-0199")
                .item(&hammer.id, 2, BigDecimal::from(25))
                .item(&roller.id, 3, BigDecimal::from(8)),
        )
        .await
        .unwrap();
    manager
        .add_sale_from(
            SaleBuilder::new("INV-0002", date(2024, 6, 5)).item(&roller.id, 1, BigDecimal::from(8)),
        )
        .await
        .unwrap();
    manager
        .add_expense(NewExpense::new(
            date(2024, 6, 1),
            "Rent",
            "June rent",
            BigDecimal::from(40),
        ))
        .await
        .unwrap();

    let metrics = manager.dashboard_metrics_at(date(2024, 6, 20)).unwrap();
    assert_eq!(metrics.total_products, 2);
    assert_eq!(metrics.monthly_sales, 2);
    assert_eq!(metrics.total_sales, BigDecimal::from(82));
    assert_eq!(metrics.total_expenses, BigDecimal::from(40));
    assert_eq!(metrics.profit, BigDecimal::from(42));
    // roller: 6 - 3 - 1 = 2 <= 4
    assert_eq!(metrics.low_stock_products, 1);

    let by_category = manager.category_sales_data().unwrap();
    let names: Vec<&str> = by_category.iter().map(|c| c.name.as_str()).collect();
    // Sales are most recent first, so INV-0002 (paint only) is seen first
    assert_eq!(names, vec!["Paint", "Tools"]);
    assert_eq!(by_category[0].value, BigDecimal::from(32));
    assert_eq!(by_category[1].value, BigDecimal::from(50));

    let top = manager.top_products(10).unwrap();
    assert_eq!(top[0].name, "Paint roller");
    assert_eq!(top[0].quantity, 4);
    assert_eq!(top[1].quantity, 2);

    // A fresh session sees the same persisted state
    let reopened = signed_in(&store).await;
    assert_eq!(reopened.product_required(&hammer.id).unwrap().stock, 10);
    assert_eq!(reopened.product_required(&roller.id).unwrap().stock, 2);
    assert_eq!(reopened.sales().unwrap()[0].invoice_number, "INV-0002");
}

#[tokio::test]
async fn test_sale_then_single_month_chart() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;
    let nails = manager
        .add_product(NewProduct::new(
            "NAIL-2",
            "Nails 2in",
            BigDecimal::from(3),
            BigDecimal::from(1),
            500,
        ))
        .await
        .unwrap();

    let sale = manager
        .add_sale(
            SaleHeader::new("INV-1", date(2024, 3, 14)),
            vec![SaleItem::new(&nails.id, 40, BigDecimal::from(3))],
        )
        .await
        .unwrap();

    let chart = manager.sales_data_at(date(2024, 3, 31), 1).unwrap();
    assert_eq!(chart.len(), 1);
    assert_eq!(chart[0].sales, sale.total);
    assert_eq!(chart[0].month, "Mar 2024");
}

#[tokio::test]
async fn test_month_labels_follow_locale() {
    let config = InventoryConfig::default().with_month_labels(Locale::fr_FR, "%B %Y");
    let mut manager = InventoryManager::with_config(MemoryStore::new(), config);
    manager.on_auth_changed(Some(owner())).await.unwrap();

    let chart = manager.sales_data_at(date(2024, 3, 2), 1).unwrap();
    assert_eq!(chart[0].month, "mars 2024");
}

#[tokio::test]
async fn test_unauthenticated_mutations_issue_no_store_calls() {
    let store = MemoryStore::new();
    let mut manager = InventoryManager::new(store.clone());

    let product = NewProduct::new("X-1", "Thing", BigDecimal::from(1), BigDecimal::from(1), 1);
    assert!(matches!(
        manager.add_product(product).await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.update_product("p", ProductPatch::stock(1)).await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.delete_product("p").await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager
            .add_sale(
                SaleHeader::new("INV", date(2024, 1, 1)),
                vec![SaleItem::new("p", 1, BigDecimal::from(1))]
            )
            .await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager
            .add_expense(NewExpense::new(date(2024, 1, 1), "Misc", "Coffee", BigDecimal::from(2)))
            .await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.update_expense("e", ExpensePatch::default()).await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.delete_expense("e").await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.reload().await,
        Err(InventoryError::Unauthenticated)
    ));
    assert!(matches!(
        manager.dashboard_metrics(),
        Err(InventoryError::Unauthenticated)
    ));

    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_deleting_product_keeps_sale_history() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;
    let pipe = manager
        .add_product(NewProduct::new(
            "PIPE-1",
            "Copper pipe",
            BigDecimal::from(12),
            BigDecimal::from(7),
            20,
        ))
        .await
        .unwrap();

    let sale = manager
        .add_sale_from(
            SaleBuilder::new("INV-9", date(2024, 2, 2)).item(&pipe.id, 5, BigDecimal::from(12)),
        )
        .await
        .unwrap();

    manager.delete_product(&pipe.id).await.unwrap();

    let kept = manager.sale_required(&sale.id).unwrap();
    assert_eq!(kept, &sale);
    assert_eq!(kept.total, BigDecimal::from(60));
    assert_eq!(kept.items[0].product_id, pipe.id);

    // Unresolvable items drop out of product-based reports
    assert!(manager.top_products(10).unwrap().is_empty());
    assert!(manager.category_sales_data().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_of_record_missing_from_ledger_still_writes() {
    let store = MemoryStore::new();
    let mut stale = signed_in(&store).await;
    let mut other_device = signed_in(&store).await;

    let glue = other_device
        .add_product(NewProduct::new(
            "GLU-1",
            "Wood glue",
            BigDecimal::from(6),
            BigDecimal::from(2),
            9,
        ))
        .await
        .unwrap();

    stale
        .update_product(&glue.id, ProductPatch::stock(1))
        .await
        .unwrap();
    assert!(stale.ledger().unwrap().product(&glue.id).is_none());

    other_device.reload().await.unwrap();
    assert_eq!(other_device.product_required(&glue.id).unwrap().stock, 1);
}

#[tokio::test]
async fn test_low_stock_never_exceeds_threshold() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;

    let mut ids = Vec::new();
    let levels = [
        (0, None),
        (5, None),
        (6, None),
        (9, Some(10)),
        (11, Some(10)),
        (3, Some(0)),
    ];
    for (i, (stock, min)) in levels.into_iter().enumerate() {
        let mut draft = NewProduct::new(
            format!("SKU-{i}"),
            format!("Item {i}"),
            BigDecimal::from(1),
            BigDecimal::from(1),
            stock,
        );
        draft.min_stock = min;
        ids.push(manager.add_product(draft).await.unwrap().id);
    }
    manager
        .update_product(&ids[2], ProductPatch::stock(2))
        .await
        .unwrap();

    let low = manager.low_stock_products().unwrap();
    for product in &low {
        assert!(product.stock <= product.effective_min_stock(5));
    }
    let low_ids: Vec<&str> = low.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        low_ids,
        vec![ids[0].as_str(), ids[1].as_str(), ids[2].as_str(), ids[3].as_str(), ids[5].as_str()]
    );
}

#[tokio::test]
async fn test_store_timeout_surfaces_as_failure() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;

    let slow = store.clone().with_latency(Duration::from_millis(250));
    let config = InventoryConfig::default().with_request_timeout(Duration::from_millis(20));
    let mut slow_manager = InventoryManager::with_config(slow, config);

    let result = slow_manager.on_auth_changed(Some(owner())).await;
    assert_eq!(
        result.unwrap_err().store_kind(),
        Some(StoreFailureKind::Timeout)
    );
    // The session survives the failure
    assert!(slow_manager.is_signed_in());

    // The fast manager on the same data is unaffected
    manager.reload().await.unwrap();
}

#[tokio::test]
async fn test_strict_validator_rejects_before_store() {
    let store = MemoryStore::new();
    let mut manager = InventoryManager::with_validator(
        store.clone(),
        InventoryConfig::default(),
        Box::new(StrictRecordValidator),
    );
    manager.on_auth_changed(Some(owner())).await.unwrap();
    let calls = store.call_count();

    let result = manager
        .add_product(NewProduct::new(
            "bad sku!",
            "Thing",
            BigDecimal::from(1),
            BigDecimal::from(1),
            1,
        ))
        .await;

    assert!(matches!(result, Err(InventoryError::Validation(_))));
    assert_eq!(store.call_count(), calls);
    assert!(store.documents(&owner(), Collection::Products).is_empty());
}

#[tokio::test]
async fn test_search_products() {
    let store = MemoryStore::new();
    let mut manager = signed_in(&store).await;
    let electrical = manager
        .categories()
        .unwrap()
        .iter()
        .find(|c| c.name == "Electrical")
        .map(|c| c.id.clone())
        .unwrap();

    manager
        .add_product(
            NewProduct::new("CAB-25", "Cable 2.5mm", BigDecimal::from(2), BigDecimal::from(1), 300)
                .category(&electrical),
        )
        .await
        .unwrap();
    manager
        .add_product(NewProduct::new(
            "BRU-3",
            "Paint brush",
            BigDecimal::from(4),
            BigDecimal::from(2),
            30,
        ))
        .await
        .unwrap();

    let hits = manager.search_products("electri").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].product.sku, "CAB-25");

    let hits = manager.search_products("bru").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].category.is_none());
}
