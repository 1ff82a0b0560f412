//! HTTP handlers for gateway callbacks
//!
//! The gateway posts `data` and `signature` as a urlencoded form. The route
//! carries no CSRF protection since the sender is a third party.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::any,
    Router,
};
use std::sync::Arc;

use crate::client::LiqPay;
use crate::error::LiqPayError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub liqpay: Arc<LiqPay>,
}

impl AppState {
    pub fn new(liqpay: Arc<LiqPay>) -> Self {
        Self { liqpay }
    }
}

/// Routes to nest under the host application's prefix, e.g. `/liqpay`
pub fn router(liqpay: Arc<LiqPay>) -> Router {
    Router::new()
        .route("/callback", any(callback))
        .with_state(AppState::new(liqpay))
}

#[derive(Debug, Default)]
struct CallbackForm {
    data: Option<String>,
    signature: Option<String>,
}

impl CallbackForm {
    fn parse(body: &[u8]) -> Self {
        let mut form = CallbackForm::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "data" if form.data.is_none() => form.data = Some(value.into_owned()),
                "signature" if form.signature.is_none() => {
                    form.signature = Some(value.into_owned())
                }
                _ => {}
            }
        }
        form
    }
}

/// Payment status notification from LiqPay
pub async fn callback(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<StatusCode, LiqPayError> {
    if method != Method::POST {
        return Err(LiqPayError::BadRequest("post".into()));
    }

    tracing::debug!("Callback: {}", String::from_utf8_lossy(&body));

    let form = CallbackForm::parse(&body);
    let response = state
        .liqpay
        .process_callback(form.data.as_deref(), form.signature.as_deref())?;

    tracing::debug!(status = %response.status, order_id = ?response.order_id, "Callback accepted");
    Ok(StatusCode::OK)
}
