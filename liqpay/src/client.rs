//! The LiqPay module: validated configuration, HTTP client and callback handler

use indexmap::IndexMap;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;

use crate::codec;
use crate::config::LiqPayConfig;
use crate::error::LiqPayError;
use crate::request::PaymentRequest;
use crate::response::PaymentResponse;
use crate::signature;

/// Callback handler invoked with every verified payment notification
pub type CheckoutHandler = Arc<dyn Fn(&PaymentResponse) + Send + Sync>;

/// Entry point of the integration.
///
/// Built once at startup and shared read-only afterwards (`Arc<LiqPay>`).
pub struct LiqPay {
    config: LiqPayConfig,
    http: Client,
    handler: Option<CheckoutHandler>,
}

impl LiqPay {
    pub fn new(config: LiqPayConfig) -> Result<Self, LiqPayError> {
        let config = config.validated()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| LiqPayError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            handler: None,
        })
    }

    /// Registers the function that receives verified callbacks
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PaymentResponse) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &LiqPayConfig {
        &self.config
    }

    pub fn is_sandbox(&self) -> bool {
        self.config.debug
    }

    /// New checkout request with the module defaults applied
    pub fn checkout_request(&self) -> PaymentRequest<'_> {
        PaymentRequest::new(self)
    }

    pub fn encode_data(&self, fields: &IndexMap<String, String>) -> Result<String, LiqPayError> {
        codec::encode(fields, &self.config.public_key)
    }

    pub fn sign_data(&self, data: &str) -> String {
        signature::sign(&self.config.private_key, data)
    }

    pub fn verify_data(&self, data: &str, signature: &str) -> bool {
        signature::verify(&self.config.private_key, data, signature)
    }

    /// Signs `fields` and posts them to the API endpoint
    pub async fn api_request(
        &self,
        fields: &IndexMap<String, String>,
    ) -> Result<PaymentResponse, LiqPayError> {
        let data = self.encode_data(fields)?;
        let signature = self.sign_data(&data);

        tracing::debug!(
            url = %self.config.api_url,
            order_id = fields.get("order_id").map(String::as_str).unwrap_or_default(),
            "Sending LiqPay API request"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .form(&[("data", data.as_str()), ("signature", signature.as_str())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "LiqPay API replied with an error status");
            return Err(LiqPayError::protocol(format!("HTTP {}", status.as_u16()), &body));
        }

        parse_api_response(&body)
    }

    /// Verifies and decodes a callback posted by the gateway.
    ///
    /// The signature is checked before the payload is looked at. The
    /// registered handler runs only once everything has passed; without one
    /// the payload is logged.
    pub fn process_callback(
        &self,
        data: Option<&str>,
        signature: Option<&str>,
    ) -> Result<PaymentResponse, LiqPayError> {
        let data = data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| LiqPayError::BadRequest("data".into()))?;

        let signature = signature.unwrap_or_default();
        if !self.verify_data(data, signature) {
            tracing::warn!("Rejected LiqPay callback: signature mismatch");
            return Err(LiqPayError::BadRequest("signature".into()));
        }

        let payload = codec::decode(data)
            .ok()
            .filter(|json| !codec::is_empty_json(json))
            .ok_or_else(|| LiqPayError::BadRequest("invalid data json".into()))?;

        let response = PaymentResponse::from_json(payload.clone()).map_err(|e| {
            tracing::warn!("Rejected LiqPay callback: {}", e);
            LiqPayError::BadRequest("invalid data json".into())
        })?;

        match &self.handler {
            Some(handler) => handler(&response),
            None => tracing::info!(payload = %payload, "Unhandled LiqPay callback"),
        }

        Ok(response)
    }
}

impl fmt::Debug for LiqPay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiqPay")
            .field("config", &self.config)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

fn parse_api_response(body: &str) -> Result<PaymentResponse, LiqPayError> {
    if body.trim().is_empty() {
        return Err(LiqPayError::protocol("empty response", body));
    }

    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| LiqPayError::protocol(format!("response is not JSON: {}", e), body))?;
    if codec::is_empty_json(&json) {
        return Err(LiqPayError::protocol("empty response", body));
    }

    PaymentResponse::from_json(json)
        .map_err(|e| LiqPayError::protocol(format!("unexpected response: {}", e), body))
}
