use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope wrapping every table-convention response.
///
/// The payload is not a fixed field: the backend keys it by the lower-cased
/// table name (`{"success": true, "kiosks": [...]}`), so everything that is not
/// a status field lands in `payload` and is looked up by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_record_count: Option<u64>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Raw payload under `key`, treating null/false/0/"" as missing
    pub fn payload(&self, key: &str) -> Option<&Value> {
        self.payload.get(key).filter(|value| is_truthy(value))
    }

    /// Remove and decode the payload under `key`
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> serde_json::Result<Option<T>> {
        match self.payload.remove(key) {
            Some(value) if is_truthy(&value) => serde_json::from_value(value).map(Some),
            _ => Ok(None),
        }
    }

    /// Decode the list payload under `key`; missing means empty
    pub fn take_list<T: DeserializeOwned>(&mut self, key: &str) -> serde_json::Result<Vec<T>> {
        Ok(self.take::<Vec<T>>(key)?.unwrap_or_default())
    }

    /// `fileId` from an export response, rendered as text
    pub fn file_id(&self) -> Option<String> {
        match self.payload("fileId")? {
            Value::String(id) => Some(id.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Same truthiness the generated frontend applied to payloads
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Body returned by plain REST endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
