//! Stock movements, low-stock alerts and catalog constraints.

use assert_matches::assert_matches;
use ingetech_core::inventory::MovementKind;
use ingetech_core::types::DbId;
use ingetech_db::models::inventory::{CreateInventoryItem, CreateInventoryMovement};
use ingetech_db::models::product::CreateProduct;
use ingetech_db::models::warehouse::CreateWarehouse;
use ingetech_db::repositories::{
    InventoryRepo, MovementError, ProductRepo, StockAlertRepo, WarehouseRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup(pool: &PgPool) -> (DbId, DbId, DbId) {
    let product = ProductRepo::create(
        pool,
        &CreateProduct {
            code: "P-001".to_string(),
            name: "Taladro".to_string(),
            description: None,
            price_cents: 4_500_000,
            brand_id: None,
            created_by: None,
        },
    )
    .await
    .unwrap();
    let main = WarehouseRepo::create(
        pool,
        &CreateWarehouse {
            name: "Central".to_string(),
            location: None,
        },
    )
    .await
    .unwrap();
    let branch = WarehouseRepo::create(
        pool,
        &CreateWarehouse {
            name: "Sucursal".to_string(),
            location: Some("Heredia".to_string()),
        },
    )
    .await
    .unwrap();
    (product.id, main.id, branch.id)
}

fn movement(
    product_id: DbId,
    warehouse_id: DbId,
    kind: MovementKind,
    quantity: i32,
) -> CreateInventoryMovement {
    CreateInventoryMovement {
        product_id,
        warehouse_id,
        destination_warehouse_id: None,
        kind,
        quantity,
        user_id: None,
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn entry_creates_missing_stock_row(pool: PgPool) {
    let (product, main, _) = setup(&pool).await;

    let recorded = InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Entry, 20))
        .await
        .unwrap();

    assert_eq!(recorded.item.quantity, 20);
    assert_eq!(recorded.item.minimum_quantity, 5);
    assert_eq!(recorded.movement.kind, "ENTRY");
    assert!(recorded.alert.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exit_beyond_stock_is_rejected_and_rolled_back(pool: PgPool) {
    let (product, main, _) = setup(&pool).await;
    InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Entry, 3))
        .await
        .unwrap();

    let result =
        InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Exit, 4)).await;
    assert_matches!(result, Err(MovementError::Rejected(_)));

    let items = InventoryRepo::list(&pool, Some(main)).await.unwrap();
    assert_eq!(items[0].quantity, 3);
    assert_eq!(InventoryRepo::list_movements(&pool, Some(product)).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transfer_moves_stock_between_warehouses(pool: PgPool) {
    let (product, main, branch) = setup(&pool).await;
    InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Entry, 30))
        .await
        .unwrap();

    let mut transfer = movement(product, main, MovementKind::Transfer, 10);
    transfer.destination_warehouse_id = Some(branch);
    let recorded = InventoryRepo::record_movement(&pool, &transfer).await.unwrap();

    assert_eq!(recorded.item.quantity, 20);
    let destination = recorded.destination.unwrap();
    assert_eq!(destination.warehouse_id, branch);
    assert_eq!(destination.quantity, 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn low_stock_raises_single_open_alert(pool: PgPool) {
    let (product, main, _) = setup(&pool).await;
    InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Entry, 10))
        .await
        .unwrap();

    let first = InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Exit, 5))
        .await
        .unwrap();
    let alert = first.alert.expect("alert at the minimum");
    assert_eq!(alert.quantity, 5);
    assert_eq!(alert.minimum_quantity, 5);

    let second = InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Exit, 1))
        .await
        .unwrap();
    assert!(second.alert.is_none());
    assert_eq!(StockAlertRepo::list(&pool, true).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn processing_alert_keeps_stock(pool: PgPool) {
    let (product, main, _) = setup(&pool).await;
    InventoryRepo::record_movement(&pool, &movement(product, main, MovementKind::Entry, 2))
        .await
        .unwrap();
    let alert = StockAlertRepo::list(&pool, true).await.unwrap().remove(0);

    let processed = StockAlertRepo::mark_processed(&pool, alert.id).await.unwrap().unwrap();
    assert!(processed.is_processed);
    assert!(processed.processed_at.is_some());
    assert!(StockAlertRepo::mark_processed(&pool, alert.id).await.unwrap().is_none());

    let item = InventoryRepo::find_by_id(&pool, alert.inventory_item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.quantity, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_stock_row_violates_unique_pair(pool: PgPool) {
    let (product, main, _) = setup(&pool).await;
    let input = CreateInventoryItem {
        product_id: product,
        warehouse_id: main,
        quantity: 10,
        minimum_quantity: None,
    };
    InventoryRepo::create(&pool, &input).await.unwrap();

    let err = InventoryRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db)
        if db.constraint() == Some("uq_inventory_items_product_warehouse"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_deactivate_hides_from_default_listing(pool: PgPool) {
    let (product, _, _) = setup(&pool).await;

    assert!(ProductRepo::deactivate(&pool, product).await.unwrap());
    assert!(ProductRepo::list(&pool, false).await.unwrap().is_empty());
    assert_eq!(ProductRepo::list(&pool, true).await.unwrap().len(), 1);
}
