use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads `null` as the type's zero value, like an absent field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

/// One record as published by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub err_msg: Vec<String>,

    // Upstream-defined payload, usually the entity's own status document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<ValidationResult>,
}

impl DirectoryEntry {
    /// `data.space`, when the payload is an object carrying a string name.
    pub fn space(&self) -> Option<&str> {
        self.data.as_ref()?.get("space")?.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(deserialize_with = "null_as_default")]
    pub valid: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_https: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub https_forward: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub reachable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cors: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cert_valid: bool,
}

/// Entry shape served by `/v2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedEntry {
    pub url: String,
    pub valid: bool,
    pub space: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub err_msg: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<ValidationResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: String,
}
