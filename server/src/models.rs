//! Data models for API requests/responses

use serde::{Deserialize, Serialize};

/// Checkout started from the shop front
#[derive(Debug, Clone, Deserialize)]
pub struct PayQuery {
    pub order_id: String,
    pub amount: f64,
    pub description: String,
    pub currency: Option<String>,
    pub language: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sandbox: bool,
    pub public_key: String,
    pub version: String,
}
