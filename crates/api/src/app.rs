use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    cart, clients, folders, health, notifications, offer_plates, offers, payments, quotes,
};
use crate::services::PaymentLinkClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub payment: Arc<PaymentLinkClient>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let payment = Arc::new(PaymentLinkClient::new(&config.payment));
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        payment,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Actor routes: identity resolved per request by the Actor extractor;
    // rate limiting keys on the same header and runs before the handlers.
    let actor_routes = Router::new()
        // Catalog (v1)
        .route("/api/v1/offers", get(offers::list_offers))
        .route("/api/v1/offers", post(offers::create_offer))
        .route("/api/v1/offers/categories", get(offers::list_categories))
        .route("/api/v1/offers/:offer_id", put(offers::update_offer))
        .route("/api/v1/offers/:offer_id", delete(offers::delete_offer))
        .route(
            "/api/v1/offers/:offer_id/extras",
            get(offers::list_offer_extras),
        )
        // Cart (v1)
        .route("/api/v1/cart", get(cart::get_cart))
        .route("/api/v1/cart/items", post(cart::add_item))
        .route("/api/v1/cart/items/:item_id", patch(cart::update_item))
        .route("/api/v1/cart/items/:item_id", delete(cart::remove_item))
        .route(
            "/api/v1/cart/items/:item_id/extras",
            put(cart::set_item_extras),
        )
        .route("/api/v1/cart/finalize", post(cart::finalize))
        // Offer plates (v1)
        .route("/api/v1/offer-plates", get(offer_plates::list_plates))
        .route(
            "/api/v1/offer-plates/without-quotes",
            get(offer_plates::list_plates_without_quotes),
        )
        .route("/api/v1/offer-plates/:plate_id", get(offer_plates::get_plate))
        .route(
            "/api/v1/offer-plates/:plate_id/status",
            patch(offer_plates::update_plate_status),
        )
        // Quotes (v1)
        .route("/api/v1/quotes", post(quotes::create_quote))
        .route("/api/v1/quotes", get(quotes::list_quotes))
        .route("/api/v1/quotes/:quote_id", get(quotes::get_quote))
        .route(
            "/api/v1/quotes/:quote_id/status",
            patch(quotes::update_quote_status),
        )
        .route(
            "/api/v1/quotes/:quote_id/payment-info",
            get(quotes::get_payment_info),
        )
        .route(
            "/api/v1/quotes/:quote_id/payment-info",
            put(quotes::put_payment_info),
        )
        // Folders (v1)
        .route("/api/v1/folders", post(folders::create_folder))
        .route("/api/v1/folders", get(folders::list_folders))
        .route("/api/v1/folders/:folder_id", get(folders::get_folder))
        // Client directory (v1)
        .route("/api/v1/clients", get(clients::list_clients))
        .route("/api/v1/clients/:client_id", get(clients::get_client))
        // Notifications (v1)
        .route(
            "/api/v1/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(notifications::mark_read),
        )
        // Payment link (v1)
        .route("/api/v1/payments/link", post(payments::create_payment_link))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Public routes (no actor header required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        // The payment provider calls this; integrity comes from the
        // optional HMAC signature, not from an actor header.
        .route(
            "/api/v1/payments/callback",
            post(payments::payment_callback),
        );

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(actor_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
