//! HTTP-level tests for communication authoring, sending and delivery views.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, delete_auth, get_auth, login, post_auth, post_json_auth, put_json_auth,
    RecordingChannel, ALAJUELA, PASSWORD, SAN_JOSE,
};
use ingetech_db::repositories::CommunicationRepo;
use serde_json::json;
use sqlx::PgPool;

fn in_minutes(minutes: i64) -> String {
    (Utc::now() + Duration::minutes(minutes)).to_rfc3339()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schedule_must_be_a_minute_ahead(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let body = json!({
        "title": "Aviso",
        "body": "<p>Hola</p>",
        "scheduled_at": (Utc::now() + Duration::seconds(20)).to_rfc3339(),
    });
    let response = post_json_auth(app, "/api/v1/communications", body, &cookie).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_stores_segments_and_status(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let body = json!({
        "title": "Feria",
        "body": "<p>Feria de descuentos</p>",
        "scheduled_at": in_minutes(30),
        "province_ids": [ALAJUELA, ALAJUELA, SAN_JOSE],
    });
    let response = post_json_auth(app.clone(), "/api/v1/communications", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "scheduled");
    assert_eq!(json["data"]["segments"].as_array().unwrap().len(), 2);
    assert!(json["data"].get("dispatch").is_none());

    let scheduled =
        body_json(get_auth(app.clone(), "/api/v1/communications?status=scheduled", &cookie).await)
            .await;
    assert_eq!(scheduled["data"].as_array().unwrap().len(), 1);

    let sent =
        body_json(get_auth(app, "/api/v1/communications?status=sent", &cookie).await).await;
    assert!(sent["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_now_delivers_to_default_customers(pool: PgPool) {
    let admin = common::create_admin(&pool, "admin").await;
    let client_a = common::create_client(&pool, "cli-a", SAN_JOSE).await;
    let client_b = common::create_client(&pool, "cli-b", ALAJUELA).await;
    let channel = RecordingChannel::new();
    let app = common::build_test_app_with_channels(pool, common::channels(&channel));
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let body = json!({ "title": "Hoy", "body": "<p>Ya</p>", "send_now": true });
    let response = post_json_auth(app, "/api/v1/communications", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    assert_eq!(json["data"]["status"], "sent");
    assert_eq!(json["data"]["recently_sent"], true);
    assert_eq!(json["data"]["dispatch"]["dispatched"], 2);
    assert_eq!(json["data"]["dispatch_count"], 2);

    let mut recipients = channel.recipients();
    recipients.sort_unstable();
    assert_eq!(recipients, vec![client_a.id, client_b.id]);
    assert!(!recipients.contains(&admin.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_send_respects_channel_selection_and_happens_once(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    common::create_client(&pool, "cli", SAN_JOSE).await;
    let channel = RecordingChannel::new();
    let app = common::build_test_app_with_channels(pool, common::channels(&channel));
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Borrador", "body": "<p>x</p>" }),
            &cookie,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "draft");
    let send_uri = format!("/api/v1/communications/{id}/send");

    // The recording channel is named "email"; switching email off skips it.
    let response =
        post_json_auth(app.clone(), &send_uri, json!({ "email": false }), &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dispatched"], 1);
    assert!(channel.recipients().is_empty());

    let again = post_json_auth(app, &send_uri, json!({}), &cookie).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_send_without_body_uses_every_channel(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let client = common::create_client(&pool, "cli", SAN_JOSE).await;
    let channel = RecordingChannel::new();
    let app = common::build_test_app_with_channels(pool, common::channels(&channel));
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Aviso", "body": "<p>x</p>" }),
            &cookie,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/communications/{id}/send");
    let response = post_auth(app, &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dispatched"], 1);
    assert_eq!(channel.recipients(), vec![client.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sent_communication_is_locked(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Ya salió", "body": "<p>x</p>", "send_now": true }),
            &cookie,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/communications/{id}");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Otro", "body": "<p>y</p>" }),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(app, &format!("{uri}/cancel-schedule"), &cookie).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_schedule_turns_item_into_draft(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool.clone());
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Luego", "body": "<p>x</p>", "scheduled_at": in_minutes(10) }),
            &cookie,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/communications/{id}/cancel-schedule");

    let response = post_auth(app.clone(), &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "draft");

    let stored = CommunicationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(stored.scheduled_at.is_none());

    // Nothing left to cancel.
    let response = post_auth(app, &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn process_due_sends_only_due_items(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let client = common::create_client(&pool, "cli", SAN_JOSE).await;
    let channel = RecordingChannel::new();
    let app = common::build_test_app_with_channels(pool.clone(), common::channels(&channel));
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let future = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Futuro", "body": "<p>f</p>", "scheduled_at": in_minutes(60) }),
            &cookie,
        )
        .await,
    )
    .await;
    let future_id = future["data"]["id"].as_i64().unwrap();

    // Make a second item due by moving its schedule into the past.
    let due = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Vencido", "body": "<p>v</p>", "scheduled_at": in_minutes(5) }),
            &cookie,
        )
        .await,
    )
    .await;
    let due_id = due["data"]["id"].as_i64().unwrap();
    sqlx::query("UPDATE communications SET scheduled_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(due_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_auth(app.clone(), "/api/v1/communications/process-due", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["processed"], 1);
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(channel.recipients(), vec![client.id]);

    // A second run finds nothing.
    let json = body_json(post_auth(app, "/api/v1/communications/process-due", &cookie).await).await;
    assert_eq!(json["data"]["total"], 0);

    let future = CommunicationRepo::find_by_id(&pool, future_id).await.unwrap().unwrap();
    assert!(future.sent_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recipients_see_their_inbox_and_nothing_else(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    common::create_client(&pool, "sj", SAN_JOSE).await;
    common::create_client(&pool, "al", ALAJUELA).await;
    let channel = RecordingChannel::new();
    let app = common::build_test_app_with_channels(pool, common::channels(&channel));
    let admin_cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({
                "title": "Solo Alajuela",
                "body": "<p>x</p>",
                "send_now": true,
                "province_ids": [ALAJUELA],
            }),
            &admin_cookie,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let view_uri = format!("/api/v1/communications/{id}/view");

    let al_cookie = login(app.clone(), "al@example.com", PASSWORD).await;
    let inbox = body_json(get_auth(app.clone(), "/api/v1/communications/inbox", &al_cookie).await)
        .await;
    assert_eq!(inbox["data"].as_array().unwrap().len(), 1);
    assert_eq!(inbox["data"][0]["title"], "Solo Alajuela");
    let response = get_auth(app.clone(), &view_uri, &al_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let sj_cookie = login(app.clone(), "sj@example.com", PASSWORD).await;
    let inbox = body_json(get_auth(app.clone(), "/api/v1/communications/inbox", &sj_cookie).await)
        .await;
    assert!(inbox["data"].as_array().unwrap().is_empty());
    let response = get_auth(app.clone(), &view_uri, &sj_cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Administrators can view everything.
    let response = get_auth(app, &view_uri, &admin_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_communication(pool: PgPool) {
    common::create_admin(&pool, "admin").await;
    let app = common::build_test_app(pool);
    let cookie = login(app.clone(), "admin@example.com", PASSWORD).await;

    let created = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/communications",
            json!({ "title": "Borrar", "body": "<p>x</p>" }),
            &cookie,
        )
        .await,
    )
    .await;
    let uri = format!(
        "/api/v1/communications/{}",
        created["data"]["id"].as_i64().unwrap()
    );

    assert_eq!(
        delete_auth(app.clone(), &uri, &cookie).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        get_auth(app, &uri, &cookie).await.status(),
        StatusCode::NOT_FOUND
    );
}

