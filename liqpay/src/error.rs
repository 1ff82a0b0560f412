//! Error types for the LiqPay integration

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// A single rule violation on a request field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every violation found by one validation pass, in field order
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", join_errors(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum LiqPayError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Protocol error: {reason}: {body:?}")]
    Protocol { reason: String, body: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl LiqPayError {
    pub(crate) fn protocol(reason: impl Into<String>, body: &str) -> Self {
        LiqPayError::Protocol {
            reason: reason.into(),
            body: body.to_string(),
        }
    }

    /// Field violations, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            LiqPayError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for LiqPayError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            LiqPayError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            LiqPayError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            LiqPayError::Transport(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            LiqPayError::Protocol { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            LiqPayError::Configuration(_) | LiqPayError::Encoding(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_in_order() {
        let mut errors = ValidationErrors::default();
        errors.push("amount", "must be no less than 0.01");
        errors.push("currency", "unknown value: \"XYZ\"");

        assert_eq!(
            errors.to_string(),
            "amount: must be no less than 0.01; currency: unknown value: \"XYZ\""
        );
        assert_eq!(errors.first().unwrap().field, "amount");
        assert_eq!(
            errors.first().unwrap().to_string(),
            "amount: must be no less than 0.01"
        );
        assert!(errors.contains("currency"));
        assert!(!errors.contains("description"));
    }

    #[test]
    fn test_status_mapping() {
        let response = LiqPayError::BadRequest("signature".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = LiqPayError::protocol("empty response", "").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = LiqPayError::Configuration("public_key".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
