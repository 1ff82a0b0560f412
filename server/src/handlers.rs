//! HTTP handlers for the shop front

use axum::{
    extract::{Query, State},
    Json,
};
use liqpay_checkout::{LiqPayError, RedirectForm};

use crate::models::*;

pub use liqpay_checkout::handlers::AppState;

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        sandbox: state.liqpay.is_sandbox(),
        public_key: state.liqpay.config().public_key.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Sends the payer to the LiqPay checkout page
pub async fn pay(
    State(state): State<AppState>,
    Query(query): Query<PayQuery>,
) -> Result<RedirectForm, LiqPayError> {
    let mut request = state
        .liqpay
        .checkout_request()
        .order_id(&query.order_id)
        .amount(query.amount)
        .description(query.description);

    if let Some(currency) = query.currency {
        request = request.currency(currency);
    }
    if let Some(language) = query.language {
        request = request.language(language);
    }

    let form = request.build_redirect()?;
    tracing::info!(order_id = %query.order_id, "Redirecting payer to LiqPay");
    Ok(form)
}
