//! HTTP-level tests for products, warehouses and stock movements.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login, post_auth, post_json_auth, PASSWORD, SAN_JOSE,
};
use ingetech_core::inventory::DEFAULT_MINIMUM_QUANTITY;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Create a product and a warehouse as the admin behind `cookie`.
async fn product_and_warehouse(app: axum::Router, cookie: &str) -> (i64, i64) {
    let product = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/products",
            json!({ "code": "TAL-001", "name": "Taladro", "price_cents": 4_500_000 }),
            cookie,
        )
        .await,
    )
    .await;
    let warehouse = body_json(
        post_json_auth(
            app,
            "/api/v1/warehouses",
            json!({ "name": "Central", "location": "San José" }),
            cookie,
        )
        .await,
    )
    .await;
    (
        product["data"]["id"].as_i64().unwrap(),
        warehouse["data"]["id"].as_i64().unwrap(),
    )
}

async fn movement(app: axum::Router, cookie: &str, body: Value) -> axum::response::Response {
    post_json_auth(app, "/api/v1/inventory/movements", body, cookie).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_validation(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        json!({ "code": "X", "name": "Negativo", "price_cents": -1 }),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "code": "DUP", "name": "Uno", "price_cents": 100 });
    let first = post_json_auth(app.clone(), "/api/v1/products", body.clone(), &cookie).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json_auth(app, "/api/v1/products", body, &cookie).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_product_is_hidden_from_clients(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    common::create_client(&pool, "cli", SAN_JOSE).await;
    let app = common::build_test_app(pool);
    let admin = login(app.clone(), "admin@example.com", PASSWORD).await;
    let client = login(app.clone(), "cli@example.com", PASSWORD).await;

    let (product_id, _) = product_and_warehouse(app.clone(), &admin).await;
    let uri = format!("/api/v1/products/{product_id}");

    let listed = body_json(get_auth(app.clone(), "/api/v1/products", &client).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    // Clients cannot manage products.
    assert_eq!(
        delete_auth(app.clone(), &uri, &client).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        delete_auth(app.clone(), &uri, &admin).await.status(),
        StatusCode::NO_CONTENT
    );

    let listed = body_json(get_auth(app.clone(), "/api/v1/products", &client).await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
    assert_eq!(
        get_auth(app.clone(), &uri, &client).await.status(),
        StatusCode::NOT_FOUND
    );

    // Still there for administrators.
    let listed = body_json(
        get_auth(app.clone(), "/api/v1/products?include_inactive=true", &admin).await,
    )
    .await;
    assert_eq!(listed["data"][0]["is_active"], false);
    assert_eq!(get_auth(app, &uri, &admin).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entry_creates_stock_row(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;
    let (product_id, warehouse_id) = product_and_warehouse(app.clone(), &cookie).await;

    let response = movement(
        app.clone(),
        &cookie,
        json!({
            "product_id": product_id,
            "warehouse_id": warehouse_id,
            "kind": "ENTRY",
            "quantity": 10,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["item"]["quantity"], 10);
    assert_eq!(json["data"]["item"]["minimum_quantity"], DEFAULT_MINIMUM_QUANTITY);
    assert!(json["data"]["alert"].is_null());

    let items = body_json(
        get_auth(
            app.clone(),
            &format!("/api/v1/inventory?warehouse_id={warehouse_id}"),
            &cookie,
        )
        .await,
    )
    .await;
    assert_eq!(items["data"].as_array().unwrap().len(), 1);

    let movements = body_json(get_auth(app, "/api/v1/inventory/movements", &cookie).await).await;
    assert_eq!(movements["data"][0]["kind"], "ENTRY");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exit_cannot_overdraw_stock(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;
    let (product_id, warehouse_id) = product_and_warehouse(app.clone(), &cookie).await;

    let entry = json!({
        "product_id": product_id,
        "warehouse_id": warehouse_id,
        "kind": "ENTRY",
        "quantity": 3,
    });
    movement(app.clone(), &cookie, entry).await;

    let response = movement(
        app.clone(),
        &cookie,
        json!({
            "product_id": product_id,
            "warehouse_id": warehouse_id,
            "kind": "EXIT",
            "quantity": 4,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Stock is untouched and no movement was logged.
    let movements = body_json(get_auth(app, "/api/v1/inventory/movements", &cookie).await).await;
    assert_eq!(movements["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn low_stock_raises_one_alert_until_processed(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;
    let (product_id, warehouse_id) = product_and_warehouse(app.clone(), &cookie).await;

    movement(
        app.clone(),
        &cookie,
        json!({
            "product_id": product_id,
            "warehouse_id": warehouse_id,
            "kind": "ENTRY",
            "quantity": 10,
        }),
    )
    .await;

    let exit = json!({
        "product_id": product_id,
        "warehouse_id": warehouse_id,
        "kind": "EXIT",
        "quantity": 6,
    });
    let json = body_json(movement(app.clone(), &cookie, exit.clone()).await).await;
    assert_eq!(json["data"]["item"]["quantity"], 4);
    let alert_id = json["data"]["alert"]["id"].as_i64().unwrap();

    // Still low, but an open alert already exists.
    let exit_one = json!({
        "product_id": product_id,
        "warehouse_id": warehouse_id,
        "kind": "EXIT",
        "quantity": 1,
    });
    let json = body_json(movement(app.clone(), &cookie, exit_one).await).await;
    assert!(json["data"]["alert"].is_null());

    let open = body_json(get_auth(app.clone(), "/api/v1/inventory/alerts", &cookie).await).await;
    assert_eq!(open["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/v1/inventory/alerts/{alert_id}/process");
    let response = post_auth(app.clone(), &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_processed"], true);

    let response = post_auth(app.clone(), &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(app.clone(), "/api/v1/inventory/alerts/9999/process", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let open = body_json(get_auth(app, "/api/v1/inventory/alerts", &cookie).await).await;
    assert!(open["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transfer_moves_stock_between_warehouses(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;
    let (product_id, central) = product_and_warehouse(app.clone(), &cookie).await;
    let north = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/warehouses",
            json!({ "name": "Norte" }),
            &cookie,
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    movement(
        app.clone(),
        &cookie,
        json!({ "product_id": product_id, "warehouse_id": central, "kind": "ENTRY", "quantity": 20 }),
    )
    .await;

    let response = movement(
        app,
        &cookie,
        json!({
            "product_id": product_id,
            "warehouse_id": central,
            "destination_warehouse_id": north,
            "kind": "TRANSFER",
            "quantity": 8,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["item"]["quantity"], 12);
    assert_eq!(json["data"]["destination"]["quantity"], 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_adjustment_is_a_validation_error(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;
    let (product_id, warehouse_id) = product_and_warehouse(app.clone(), &cookie).await;

    movement(
        app.clone(),
        &cookie,
        json!({ "product_id": product_id, "warehouse_id": warehouse_id, "kind": "ENTRY", "quantity": 10 }),
    )
    .await;

    for quantity in [i32::MIN, i32::MAX] {
        let response = movement(
            app.clone(),
            &cookie,
            json!({
                "product_id": product_id,
                "warehouse_id": warehouse_id,
                "kind": "ADJUSTMENT",
                "quantity": quantity,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}
