//! LiqPay Checkout host server
//!
//! Mounts the gateway callback route and a checkout redirect endpoint on an
//! axum application.

use axum::{routing::get, Router};
use liqpay_checkout::{handlers as liqpay_handlers, LiqPay};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod handlers;
mod models;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "liqpay_server=debug,liqpay_checkout=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting LiqPay Checkout server");
    tracing::info!("Public key: {}", config.liqpay.public_key);
    if config.liqpay.debug {
        tracing::info!("Sandbox mode enabled");
    }

    // Payment results are only recorded in the log here; a shop would
    // update its order instead.
    let liqpay = LiqPay::new(config.liqpay.clone())?.with_handler(|response| {
        tracing::info!(
            status = %response.status,
            order_id = response.order_id.as_deref().unwrap_or_default(),
            amount = ?response.amount,
            "Payment notification"
        );
    });
    let liqpay = Arc::new(liqpay);
    let state = handlers::AppState::new(liqpay.clone());

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health))

        // Shop front
        .route("/pay", get(handlers::pay))

        // State
        .with_state(state)

        // Gateway callbacks (no CSRF: LiqPay posts from its own servers)
        .nest(&config.liqpay_mount, liqpay_handlers::router(liqpay))

        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("Callback URL path: {}/callback", config.liqpay_mount);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
