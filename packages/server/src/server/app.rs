//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use stripe::{StripeOptions, StripeService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::staff_auth_middleware;
use crate::server::routes::{
    checkout_handler, health_handler, member_transition_handler, onboarding_handler,
    refund_order_handler, register_handler, stripe_webhook_handler,
};
use crate::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub stripe_webhook_secret: String,
    pub staff_api_token: Option<String>,
}

/// Build the Axum application router.
///
/// Public routes: health, checkout, free registration and the Stripe
/// webhook. Staff routes sit behind bearer token auth.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let stripe = Arc::new(StripeService::new(StripeOptions {
        secret_key: config.stripe_secret_key.clone(),
    }));
    let deps = Arc::new(ServerDeps::postgres(pool.clone(), stripe));

    let state = AppState {
        db_pool: pool,
        deps,
        stripe_webhook_secret: config.stripe_webhook_secret.clone(),
        staff_api_token: config.staff_api_token.clone(),
    };

    build_router(state)
}

/// Router construction, separated from production wiring so tests can pass
/// their own state.
pub fn build_router(state: AppState) -> Router {
    let staff_routes = Router::new()
        .route("/api/staff/onboarding", post(onboarding_handler))
        .route("/api/staff/orders/:id/refund", post(refund_order_handler))
        .route(
            "/api/staff/members/:id/transition",
            post(member_transition_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            staff_auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/checkout", post(checkout_handler))
        .route("/api/register", post(register_handler))
        .route("/api/webhooks/stripe", post(stripe_webhook_handler))
        .merge(staff_routes)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
