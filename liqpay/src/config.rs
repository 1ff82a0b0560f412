//! Configuration management

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::constants::{URL_CHECKOUT_API, URL_CHECKOUT_CLIENT};
use crate::error::LiqPayError;

/// Merchant credentials and request defaults, fixed at startup
#[derive(Clone, Deserialize)]
pub struct LiqPayConfig {
    pub public_key: String,
    pub private_key: String,

    /// Sandbox mode: requests carry `sandbox=1`
    #[serde(default)]
    pub debug: bool,

    /// Defaults applied to every checkout request
    #[serde(default)]
    pub checkout: CheckoutDefaults,

    /// Where the gateway posts payment results
    #[serde(default)]
    pub callback_url: Option<String>,

    /// Where the payer returns after checkout
    #[serde(default)]
    pub return_url: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_checkout_url")]
    pub checkout_url: String,

    /// Outbound request timeout in milliseconds; unset keeps the HTTP client default
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_api_url() -> String {
    URL_CHECKOUT_API.to_string()
}

fn default_checkout_url() -> String {
    URL_CHECKOUT_CLIENT.to_string()
}

/// Request template. Each set field overrides the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutDefaults {
    pub version: Option<f64>,
    pub action: Option<String>,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub callback_url: Option<String>,
    pub return_url: Option<String>,
    pub customer_id: Option<String>,
    pub expired_date: Option<String>,
    /// A list, or one comma-separated string as read from the environment
    #[serde(default, deserialize_with = "list_or_joined")]
    pub paytypes: Option<Vec<String>>,
    pub verify_code: Option<bool>,
}

impl LiqPayConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            debug: false,
            checkout: CheckoutDefaults::default(),
            callback_url: None,
            return_url: None,
            api_url: default_api_url(),
            checkout_url: default_checkout_url(),
            timeout_ms: None,
        }
    }

    /// Loads `LIQPAY_*` environment variables. Nested defaults use a double
    /// underscore, e.g. `LIQPAY_CHECKOUT__CURRENCY=USD`.
    ///
    /// Values stay strings until deserialization, so `debug` and
    /// `timeout_ms` are converted by serde and text fields keep leading zeros.
    pub fn from_env() -> Result<Self, LiqPayError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("LIQPAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<LiqPayConfig>())
            .map_err(|e| LiqPayError::Configuration(e.to_string()))
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_checkout(mut self, checkout: CheckoutDefaults) -> Self {
        self.checkout = checkout;
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Normalizes keys and URLs, rejecting a config the module can't run with
    pub(crate) fn validated(mut self) -> Result<Self, LiqPayError> {
        self.public_key = self.public_key.trim().to_string();
        if self.public_key.is_empty() {
            return Err(LiqPayError::Configuration("public_key is required".into()));
        }

        self.private_key = self.private_key.trim().to_string();
        if self.private_key.is_empty() {
            return Err(LiqPayError::Configuration("private_key is required".into()));
        }

        if self.timeout_ms == Some(0) {
            return Err(LiqPayError::Configuration(
                "timeout_ms must be greater than zero".into(),
            ));
        }

        check_url("api_url", &self.api_url)?;
        check_url("checkout_url", &self.checkout_url)?;

        self.callback_url = non_empty(self.callback_url.take());
        self.return_url = non_empty(self.return_url.take());
        if let Some(url) = &self.callback_url {
            check_url("callback_url", url)?;
        }
        if let Some(url) = &self.return_url {
            check_url("return_url", url)?;
        }

        Ok(self)
    }
}

impl fmt::Debug for LiqPayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiqPayConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("debug", &self.debug)
            .field("checkout", &self.checkout)
            .field("callback_url", &self.callback_url)
            .field("return_url", &self.return_url)
            .field("api_url", &self.api_url)
            .field("checkout_url", &self.checkout_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn list_or_joined<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(joined)) => Ok(Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "expected string, found {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected list or comma-separated string, found {}",
            other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(name: &str, value: &str) -> Result<(), LiqPayError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| LiqPayError::Configuration(format!("{} is not a valid URL: {}", name, e)))
}
