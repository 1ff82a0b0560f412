//! Gateway replies and callback payloads

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Payment status reported by the gateway.
///
/// Statuses this crate doesn't name are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Success,
    /// Payment failed: the request data was invalid
    Error,
    Failure,
    Reversed,
    /// Test payment
    Sandbox,
    Subscribed,
    Unsubscribed,
    Processing,
    Prepared,
    WaitAccept,
    WaitSecure,
    HoldWait,
    CashWait,
    InvoiceWait,
    ThreeDsVerify,
    OtpVerify,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Error => "error",
            PaymentStatus::Failure => "failure",
            PaymentStatus::Reversed => "reversed",
            PaymentStatus::Sandbox => "sandbox",
            PaymentStatus::Subscribed => "subscribed",
            PaymentStatus::Unsubscribed => "unsubscribed",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Prepared => "prepared",
            PaymentStatus::WaitAccept => "wait_accept",
            PaymentStatus::WaitSecure => "wait_secure",
            PaymentStatus::HoldWait => "hold_wait",
            PaymentStatus::CashWait => "cash_wait",
            PaymentStatus::InvoiceWait => "invoice_wait",
            PaymentStatus::ThreeDsVerify => "3ds_verify",
            PaymentStatus::OtpVerify => "otp_verify",
            PaymentStatus::Other(status) => status,
        }
    }

    /// Money was taken (or would have been, in sandbox mode)
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Success | PaymentStatus::Sandbox)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PaymentStatus::Error | PaymentStatus::Failure)
    }

    /// No further status change is expected for this payment
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Success
                | PaymentStatus::Error
                | PaymentStatus::Failure
                | PaymentStatus::Reversed
                | PaymentStatus::Sandbox
                | PaymentStatus::Subscribed
                | PaymentStatus::Unsubscribed
        )
    }
}

impl From<&str> for PaymentStatus {
    fn from(status: &str) -> Self {
        match status {
            "success" => PaymentStatus::Success,
            "error" => PaymentStatus::Error,
            "failure" => PaymentStatus::Failure,
            "reversed" => PaymentStatus::Reversed,
            "sandbox" => PaymentStatus::Sandbox,
            "subscribed" => PaymentStatus::Subscribed,
            "unsubscribed" => PaymentStatus::Unsubscribed,
            "processing" => PaymentStatus::Processing,
            "prepared" => PaymentStatus::Prepared,
            "wait_accept" => PaymentStatus::WaitAccept,
            "wait_secure" => PaymentStatus::WaitSecure,
            "hold_wait" => PaymentStatus::HoldWait,
            "cash_wait" => PaymentStatus::CashWait,
            "invoice_wait" => PaymentStatus::InvoiceWait,
            "3ds_verify" => PaymentStatus::ThreeDsVerify,
            "otp_verify" => PaymentStatus::OtpVerify,
            other => PaymentStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = String::deserialize(deserializer)?;
        Ok(PaymentStatus::from(status.as_str()))
    }
}

/// Reply to an API request, or the payload of a callback.
///
/// `status` is the only field the gateway always sends. Keys without a
/// field of their own are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub status: PaymentStatus,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub err_description: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub err_code: Option<String>,

    /// Merchant order id, echoed back
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub liqpay_order_id: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, deserialize_with = "number_or_string", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub paytype: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, deserialize_with = "number_or_string", skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub sender_phone: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl PaymentResponse {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, found {:?}", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected number or string, found {}",
            other
        ))),
    }
}
