//! Checkout requests: field rules and wire mapping
//!
//! See <https://www.liqpay.ua/documentation/api/aquiring/checkout/doc>

use chrono::{NaiveDateTime, Utc};
use indexmap::IndexMap;
use url::Url;

use crate::client::LiqPay;
use crate::config::CheckoutDefaults;
use crate::constants::{Action, Currency, Language, PayType, API_VERSION, EXPIRED_DATE_FORMAT};
use crate::error::{LiqPayError, ValidationErrors};
use crate::redirect::RedirectForm;
use crate::response::PaymentResponse;

/// A payment to be sent through Checkout.
///
/// Created by [`LiqPay::checkout_request`], which fills in the module
/// defaults. Values are kept as supplied and checked by [`validate`].
///
/// [`validate`]: PaymentRequest::validate
#[derive(Debug, Clone)]
pub struct PaymentRequest<'a> {
    liqpay: &'a LiqPay,
    pub version: f64,
    pub action: String,
    pub language: Option<String>,
    pub callback_url: Option<String>,
    pub return_url: Option<String>,
    pub amount: Option<f64>,
    pub currency: String,
    pub description: String,
    /// Unique purchase id in the shop, up to 255 characters
    pub order_id: String,
    pub customer_id: Option<String>,
    /// UTC deadline for the payer, `YYYY-MM-DD HH:mm:ss`
    pub expired_date: Option<String>,
    pub paytypes: Vec<String>,
    /// Ask the gateway for a verification code (only meaningful for `auth`)
    pub verify_code: bool,
}

impl<'a> PaymentRequest<'a> {
    pub(crate) fn new(liqpay: &'a LiqPay) -> Self {
        let config = liqpay.config();
        let request = Self {
            liqpay,
            version: f64::from(API_VERSION),
            action: Action::Pay.to_string(),
            language: Some(Language::Ru.to_string()),
            callback_url: config.callback_url.clone(),
            return_url: config.return_url.clone(),
            amount: None,
            currency: Currency::Uah.to_string(),
            description: String::new(),
            order_id: String::new(),
            customer_id: None,
            expired_date: None,
            paytypes: Vec::new(),
            verify_code: false,
        };
        request.with_defaults(&config.checkout)
    }

    fn with_defaults(mut self, defaults: &CheckoutDefaults) -> Self {
        if let Some(version) = defaults.version {
            self.version = version;
        }
        if let Some(action) = &defaults.action {
            self.action = action.clone();
        }
        if let Some(currency) = &defaults.currency {
            self.currency = currency.clone();
        }
        if defaults.language.is_some() {
            self.language = defaults.language.clone();
        }
        if let Some(description) = &defaults.description {
            self.description = description.clone();
        }
        if defaults.callback_url.is_some() {
            self.callback_url = defaults.callback_url.clone();
        }
        if defaults.return_url.is_some() {
            self.return_url = defaults.return_url.clone();
        }
        if defaults.customer_id.is_some() {
            self.customer_id = defaults.customer_id.clone();
        }
        if defaults.expired_date.is_some() {
            self.expired_date = defaults.expired_date.clone();
        }
        if let Some(paytypes) = &defaults.paytypes {
            self.paytypes = paytypes.clone();
        }
        if let Some(verify_code) = defaults.verify_code {
            self.verify_code = verify_code;
        }
        self
    }

    pub fn version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn order_id(mut self, order_id: impl ToString) -> Self {
        self.order_id = order_id.to_string();
        self
    }

    pub fn customer_id(mut self, customer_id: impl ToString) -> Self {
        self.customer_id = Some(customer_id.to_string());
        self
    }

    pub fn expired_date(mut self, expired_date: impl Into<String>) -> Self {
        self.expired_date = Some(expired_date.into());
        self
    }

    pub fn paytypes<I, S>(mut self, paytypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paytypes = paytypes.into_iter().map(Into::into).collect();
        self
    }

    pub fn verify_code(mut self, verify_code: bool) -> Self {
        self.verify_code = verify_code;
        self
    }

    /// Checks every field rule and reports all violations at once
    pub fn validate(&self) -> Result<(), LiqPayError> {
        let mut errors = ValidationErrors::default();

        if !(self.version.is_finite() && self.version >= 1.0) {
            errors.push("version", "must be a number no less than 1");
        }

        let action = self.action.trim();
        if action.is_empty() {
            errors.push("action", "is required");
        } else if let Err(e) = action.parse::<Action>() {
            errors.push("action", e.to_string());
        }

        if let Some(language) = present(&self.language) {
            if let Err(e) = language.parse::<Language>() {
                errors.push("language", e.to_string());
            }
        }

        if let Some(url) = present(&self.callback_url) {
            if !is_web_url(url) {
                errors.push("callback_url", "is not a valid URL");
            }
        }
        if let Some(url) = present(&self.return_url) {
            if !is_web_url(url) {
                errors.push("return_url", "is not a valid URL");
            }
        }

        match self.amount {
            None => errors.push("amount", "is required"),
            Some(amount) if !(amount.is_finite() && amount >= 0.01) => {
                errors.push("amount", "must be a number no less than 0.01")
            }
            Some(_) => {}
        }

        let currency = self.currency.trim();
        if currency.is_empty() {
            errors.push("currency", "is required");
        } else if let Err(e) = currency.parse::<Currency>() {
            errors.push("currency", e.to_string());
        }

        if self.description.trim().is_empty() {
            errors.push("description", "is required");
        }

        if self.order_id.trim().is_empty() {
            errors.push("order_id", "is required");
        }

        if let Some(expired_date) = present(&self.expired_date) {
            match NaiveDateTime::parse_from_str(expired_date, EXPIRED_DATE_FORMAT) {
                Err(_) => errors.push("expired_date", "must be formatted as YYYY-MM-DD HH:mm:ss"),
                Ok(deadline) if deadline.and_utc() <= Utc::now() => {
                    errors.push("expired_date", "must be in the future")
                }
                Ok(_) => {}
            }
        }

        for paytype in &self.paytypes {
            if let Err(e) = paytype.trim().parse::<PayType>() {
                errors.push("paytypes", e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LiqPayError::Validation(errors))
        }
    }

    /// Validates the request and maps it onto the gateway's field names.
    ///
    /// Optional fields that are unset come out as empty strings and are
    /// dropped by the encoder.
    pub fn to_wire_fields(&self) -> Result<IndexMap<String, String>, LiqPayError> {
        self.validate()?;

        let amount = self.amount.map(round_to_cents).unwrap_or_default();
        let paytypes: Vec<&str> = self.paytypes.iter().map(|p| p.trim()).collect();

        let mut fields = IndexMap::new();
        fields.insert("version".to_string(), self.version.to_string());
        fields.insert("action".to_string(), self.action.trim().to_string());
        fields.insert("amount".to_string(), amount.to_string());
        fields.insert("currency".to_string(), self.currency.trim().to_string());
        fields.insert("description".to_string(), self.description.trim().to_string());
        fields.insert("order_id".to_string(), self.order_id.trim().to_string());
        fields.insert("language".to_string(), trimmed(&self.language));
        fields.insert("server_url".to_string(), trimmed(&self.callback_url));
        fields.insert("result_url".to_string(), trimmed(&self.return_url));
        fields.insert("customer".to_string(), trimmed(&self.customer_id));
        fields.insert("expired_date".to_string(), trimmed(&self.expired_date));
        fields.insert("paytypes".to_string(), paytypes.join(" "));
        fields.insert(
            "verifycode".to_string(),
            if self.verify_code { "Y" } else { "" }.to_string(),
        );
        fields.insert(
            "sandbox".to_string(),
            if self.liqpay.is_sandbox() { "1" } else { "" }.to_string(),
        );

        Ok(fields)
    }

    /// Signed form for the client-redirect flow.
    /// The payment result is later posted to `callback_url`.
    pub fn build_redirect(&self) -> Result<RedirectForm, LiqPayError> {
        let data = self.liqpay.encode_data(&self.to_wire_fields()?)?;
        let signature = self.liqpay.sign_data(&data);

        Ok(RedirectForm {
            action_url: self.liqpay.config().checkout_url.clone(),
            data,
            signature,
        })
    }

    /// Sends the request server-to-server and returns the gateway's reply
    pub async fn send(&self) -> Result<PaymentResponse, LiqPayError> {
        let fields = self.to_wire_fields()?;
        self.liqpay.api_request(&fields).await
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn trimmed(value: &Option<String>) -> String {
    present(value).unwrap_or_default().to_string()
}

/// Above this magnitude an `f64` carries no fractional cents, and scaling
/// by 100 could overflow to infinity
const WHOLE_AMOUNT_LIMIT: f64 = 1e15;

fn round_to_cents(amount: f64) -> f64 {
    if amount.abs() >= WHOLE_AMOUNT_LIMIT {
        return amount;
    }
    (amount * 100.0).round() / 100.0
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::config::LiqPayConfig;
    use crate::signature;
    use serde_json::json;

    fn module() -> LiqPay {
        LiqPay::new(LiqPayConfig::new("pub1", "priv1")).unwrap()
    }

    fn valid(liqpay: &LiqPay) -> PaymentRequest<'_> {
        liqpay
            .checkout_request()
            .order_id(123)
            .amount(123.45)
            .description("Test")
            .currency("UAH")
            .action("pay")
    }

    fn failed_fields(request: &PaymentRequest<'_>) -> Vec<&'static str> {
        let err = request.validate().unwrap_err();
        err.validation_errors()
            .expect("validation error")
            .iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_wire_fields_for_basic_payment() {
        let liqpay = module();
        let fields = valid(&liqpay).to_wire_fields().unwrap();

        assert_eq!(fields["version"], "3");
        assert_eq!(fields["action"], "pay");
        assert_eq!(fields["order_id"], "123");
        assert_eq!(fields["amount"], "123.45");
        assert_eq!(fields["currency"], "UAH");
        assert_eq!(fields["language"], "ru");
        assert_eq!(fields["sandbox"], "");
        assert_eq!(fields["verifycode"], "");

        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "version", "action", "amount", "currency", "description", "order_id",
                "language", "server_url", "result_url", "customer", "expired_date",
                "paytypes", "verifycode", "sandbox"
            ]
        );
    }

    #[test]
    fn test_encoded_scenario_round_trip() {
        let liqpay = module();
        let redirect = valid(&liqpay).build_redirect().unwrap();

        let decoded = codec::decode(&redirect.data).unwrap();
        assert_eq!(
            decoded,
            json!({
                "version": "3",
                "action": "pay",
                "amount": "123.45",
                "currency": "UAH",
                "description": "Test",
                "order_id": "123",
                "language": "ru",
                "public_key": "pub1"
            })
        );

        assert_eq!(redirect.signature, "ZVhjOWrvN3TVxoBGSsC64azRtyw=");
        assert_eq!(signature::sign("priv1", &redirect.data), redirect.signature);
        assert!(liqpay.verify_data(&redirect.data, &redirect.signature));
    }

    #[test]
    fn test_sandbox_and_optional_fields() {
        let liqpay = LiqPay::new(LiqPayConfig::new("pub1", "priv1").with_debug(true)).unwrap();
        let fields = valid(&liqpay)
            .language("en")
            .callback_url("https://shop.example/liqpay/callback")
            .return_url("https://shop.example/")
            .customer_id(" c-77 ")
            .expired_date("2099-12-31 23:59:59")
            .paytypes(["card", "privat24"])
            .verify_code(true)
            .to_wire_fields()
            .unwrap();

        assert_eq!(fields["sandbox"], "1");
        assert_eq!(fields["language"], "en");
        assert_eq!(fields["server_url"], "https://shop.example/liqpay/callback");
        assert_eq!(fields["result_url"], "https://shop.example/");
        assert_eq!(fields["customer"], "c-77");
        assert_eq!(fields["expired_date"], "2099-12-31 23:59:59");
        assert_eq!(fields["paytypes"], "card privat24");
        assert_eq!(fields["verifycode"], "Y");
    }

    #[test]
    fn test_amount_is_rounded_to_cents() {
        let liqpay = module();

        let fields = valid(&liqpay).amount(10.0).to_wire_fields().unwrap();
        assert_eq!(fields["amount"], "10");

        let fields = valid(&liqpay).amount(19.999).to_wire_fields().unwrap();
        assert_eq!(fields["amount"], "20");

        let fields = valid(&liqpay).amount(0.014).to_wire_fields().unwrap();
        assert_eq!(fields["amount"], "0.01");
    }

    #[test]
    fn test_huge_amount_stays_finite() {
        let liqpay = module();

        for amount in [1e307, f64::MAX] {
            let fields = valid(&liqpay).amount(amount).to_wire_fields().unwrap();
            assert_ne!(fields["amount"], "inf");
            assert_eq!(fields["amount"].parse::<f64>().unwrap(), amount);
        }
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let liqpay = module();
        assert_eq!(failed_fields(&valid(&liqpay).amount(0.0)), vec!["amount"]);
        assert_eq!(failed_fields(&valid(&liqpay).amount(-5.0)), vec!["amount"]);
        assert_eq!(failed_fields(&valid(&liqpay).amount(f64::NAN)), vec!["amount"]);

        let mut missing = valid(&liqpay);
        missing.amount = None;
        assert_eq!(failed_fields(&missing), vec!["amount"]);
    }

    #[test]
    fn test_rejects_unsupported_currency() {
        let liqpay = module();
        assert_eq!(failed_fields(&valid(&liqpay).currency("XYZ")), vec!["currency"]);
        assert_eq!(failed_fields(&valid(&liqpay).currency("")), vec!["currency"]);
    }

    #[test]
    fn test_rejects_blank_description_and_order_id() {
        let liqpay = module();
        assert_eq!(failed_fields(&valid(&liqpay).description("   ")), vec!["description"]);
        assert_eq!(failed_fields(&valid(&liqpay).order_id("")), vec!["order_id"]);
    }

    #[test]
    fn test_rejects_unknown_paytype() {
        let liqpay = module();
        let request = valid(&liqpay).paytypes(["card", "bitcoin"]);
        assert_eq!(failed_fields(&request), vec!["paytypes"]);

        let err = request.to_wire_fields().unwrap_err();
        assert!(err.to_string().contains("bitcoin"));
    }

    #[test]
    fn test_rejects_bad_enums_urls_and_dates() {
        let liqpay = module();
        assert_eq!(failed_fields(&valid(&liqpay).action("refund")), vec!["action"]);
        assert_eq!(failed_fields(&valid(&liqpay).language("de")), vec!["language"]);
        assert_eq!(failed_fields(&valid(&liqpay).version(0.5)), vec!["version"]);
        assert_eq!(
            failed_fields(&valid(&liqpay).callback_url("ftp://shop.example/cb")),
            vec!["callback_url"]
        );
        assert_eq!(
            failed_fields(&valid(&liqpay).return_url("shop.example")),
            vec!["return_url"]
        );
        assert_eq!(
            failed_fields(&valid(&liqpay).expired_date("31.12.2099")),
            vec!["expired_date"]
        );
        assert_eq!(
            failed_fields(&valid(&liqpay).expired_date("2001-01-01 00:00:00")),
            vec!["expired_date"]
        );
    }

    #[test]
    fn test_reports_every_violation() {
        let liqpay = module();
        let request = liqpay
            .checkout_request()
            .amount(0.0)
            .currency("XYZ")
            .paytypes(["nope"]);

        assert_eq!(
            failed_fields(&request),
            vec!["amount", "currency", "description", "order_id", "paytypes"]
        );
    }

    #[test]
    fn test_blank_optionals_are_ignored() {
        let liqpay = module();
        let fields = valid(&liqpay)
            .language("")
            .callback_url("  ")
            .expired_date("")
            .to_wire_fields()
            .unwrap();

        assert_eq!(fields["language"], "");
        assert_eq!(fields["server_url"], "");
        assert_eq!(fields["expired_date"], "");
    }

    #[test]
    fn test_module_defaults_apply_before_caller_values() {
        let config = LiqPayConfig::new("pub1", "priv1")
            .with_callback_url("https://shop.example/liqpay/callback")
            .with_return_url("https://shop.example/")
            .with_checkout(CheckoutDefaults {
                currency: Some("USD".to_string()),
                language: Some("uk".to_string()),
                paytypes: Some(vec!["card".to_string()]),
                return_url: Some("https://shop.example/thanks".to_string()),
                ..CheckoutDefaults::default()
            });
        let liqpay = LiqPay::new(config).unwrap();

        let request = liqpay.checkout_request();
        assert_eq!(request.currency, "USD");
        assert_eq!(request.language.as_deref(), Some("uk"));
        assert_eq!(request.paytypes, vec!["card".to_string()]);
        assert_eq!(
            request.callback_url.as_deref(),
            Some("https://shop.example/liqpay/callback")
        );
        assert_eq!(request.return_url.as_deref(), Some("https://shop.example/thanks"));

        let request = request.currency("EUR");
        assert_eq!(request.currency, "EUR");
    }
}
