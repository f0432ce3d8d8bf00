//! Integration tests for the payment callback.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL or use the default local test database.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{
    acquire_db_lock, cleanup_all_test_data, create_test_app, create_test_pool, insert_offer,
    insert_profile, json_request, json_request_as, parse_response_body, run_migrations,
    test_config,
};
use inuma_api::config::Config;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

/// Drives the cart + quote flow and returns the quote id.
async fn create_quote(pool: &sqlx::PgPool, client_id: Uuid, agent_id: Uuid) -> String {
    let offer_id = insert_offer(pool, "Offre Standard", "internet", 19.99, 0.0).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());
    app.oneshot(json_request_as(
        Method::POST,
        "/api/v1/cart/items",
        client_id,
        json!({"offer_id": offer_id, "quantity": 1}),
    ))
    .await
    .unwrap();

    let app = create_test_app(config.clone(), pool.clone());
    let response = app
        .oneshot(json_request_as(
            Method::POST,
            "/api/v1/cart/finalize",
            client_id,
            json!({"name": "Plaquette paiement"}),
        ))
        .await
        .unwrap();
    let plate = parse_response_body(response).await;
    let plate_id = plate["id"].as_str().unwrap().to_string();

    let app = create_test_app(config, pool.clone());
    let response = app
        .oneshot(json_request_as(
            Method::POST,
            "/api/v1/quotes",
            agent_id,
            json!({"offer_plate_id": plate_id}),
        ))
        .await
        .unwrap();
    let quote = parse_response_body(response).await;
    quote["id"].as_str().unwrap().to_string()
}

async fn payment_status(pool: &sqlx::PgPool, quote_id: &str) -> String {
    sqlx::query_scalar("SELECT payment_status::text FROM quotes WHERE id = $1::uuid")
        .bind(quote_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_paid_callback_marks_quote_paid() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let client_id = insert_profile(&pool, "client", "Nirina").await;
    let agent_id = insert_profile(&pool, "agent", "Hery").await;
    let quote_id = create_quote(&pool, client_id, agent_id).await;

    let app = create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/payments/callback?quote_id={}", quote_id),
            json!({"status": "PAID"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);

    assert_eq!(payment_status(&pool, &quote_id).await, "paid");

    // Both parties were notified of the payment
    let notified: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE title = 'Paiement reçu'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(notified, 2);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_duplicate_paid_callback_is_harmless() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let client_id = insert_profile(&pool, "client", "Nirina").await;
    let agent_id = insert_profile(&pool, "agent", "Hery").await;
    let quote_id = create_quote(&pool, client_id, agent_id).await;

    let config = test_config();
    for _ in 0..2 {
        let app = create_test_app(config.clone(), pool.clone());
        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/payments/callback?quote_id={}", quote_id),
                json!({"status": "SUCCESS"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(payment_status(&pool, &quote_id).await, "paid");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_unsuccessful_status_leaves_quote_unchanged() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let client_id = insert_profile(&pool, "client", "Nirina").await;
    let agent_id = insert_profile(&pool, "agent", "Hery").await;
    let quote_id = create_quote(&pool, client_id, agent_id).await;

    let config = test_config();
    for status in ["FAILED", "CANCELLED", "paid"] {
        let app = create_test_app(config.clone(), pool.clone());
        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/payments/callback?quote_id={}", quote_id),
                json!({"status": status}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;
        assert_eq!(body["success"], false, "status {} must not succeed", status);
    }

    assert_eq!(payment_status(&pool, &quote_id).await, "unpaid");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_callback_requires_quote_id() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/payments/callback",
            json!({"status": "PAID"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_unknown_quote_is_not_found() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/payments/callback?quote_id={}", Uuid::new_v4()),
            json!({"status": "PAID"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_callback_signature_enforced_when_secret_configured() {
    let _guard = acquire_db_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let client_id = insert_profile(&pool, "client", "Nirina").await;
    let agent_id = insert_profile(&pool, "agent", "Hery").await;
    let quote_id = create_quote(&pool, client_id, agent_id).await;

    let secret = "callback-secret";
    let signed_config = Config::load_for_test(&[
        ("security.rate_limit_per_minute", "0"),
        ("payment.callback_secret", secret),
    ])
    .unwrap();

    let uri = format!("/api/v1/payments/callback?quote_id={}", quote_id);
    let body = json!({"status": "PAID"}).to_string();

    // Missing signature
    let app = create_test_app(signed_config.clone(), pool.clone());
    let response = app
        .oneshot(json_request(Method::POST, &uri, json!({"status": "PAID"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong signature
    let app = create_test_app(signed_config.clone(), pool.clone());
    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Signature", "deadbeef")
        .body(Body::from(body.clone()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(payment_status(&pool, &quote_id).await, "unpaid");

    // Valid signature over the raw body
    let signature = shared::crypto::sign_payload(secret, body.as_bytes());
    let app = create_test_app(signed_config, pool.clone());
    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Signature", signature)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(payment_status(&pool, &quote_id).await, "paid");

    cleanup_all_test_data(&pool).await;
}
