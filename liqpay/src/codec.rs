//! Transport encoding of Checkout payloads: a flat JSON object, base64 encoded

use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::LiqPayError;

/// Key the merchant's public key is stored under
pub const PUBLIC_KEY_FIELD: &str = "public_key";

/// Encodes request fields into the `data` value.
///
/// Values are trimmed and dropped when empty, `public_key` is then set
/// (replacing a caller supplied one in place). Key order is preserved.
pub fn encode(fields: &IndexMap<String, String>, public_key: &str) -> Result<String, LiqPayError> {
    let mut payload: IndexMap<&str, &str> = fields
        .iter()
        .map(|(key, value)| (key.as_str(), value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    payload.insert(PUBLIC_KEY_FIELD, public_key);

    let json = serde_json::to_vec(&payload).map_err(|e| LiqPayError::Encoding(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Decodes a `data` value back into JSON
pub fn decode(data: &str) -> Result<Value, LiqPayError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| LiqPayError::Encoding(format!("invalid base64: {}", e)))?;

    serde_json::from_slice(&bytes).map_err(|e| LiqPayError::Encoding(format!("invalid JSON: {}", e)))
}

/// Emptiness in the gateway's sense: `null`, `false`, zero, `""`, `"0"`, `[]` and `{}`
pub(crate) fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
