use schemars::JsonSchema;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{DeserializeOwned, Error as _},
};
use serde_json::Value;
use tracing::warn;

use crate::error::RulesError;
use crate::value::to_display_string;

/// Schema version written into every stored blob.
pub const CURRENT_VERSION: u32 = 1;

pub(crate) fn current_version() -> u32 {
    CURRENT_VERSION
}

/// A config stored alongside its schema version, flattened into one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Versioned<T> {
    #[serde(flatten)]
    pub config: T,
    #[serde(default = "current_version")]
    pub version: u32,
}

impl<T> Versioned<T> {
    pub fn new(config: T) -> Self {
        Self {
            config,
            version: CURRENT_VERSION,
        }
    }

    pub fn into_inner(self) -> T {
        self.config
    }
}

pub(crate) fn warn_if_newer(kind: &'static str, version: u32) {
    if version > CURRENT_VERSION {
        warn!(
            kind,
            version,
            supported = CURRENT_VERSION,
            "stored blob has a newer schema version; reading known fields only"
        );
    }
}

/// Strictly decodes a stored blob.
pub(crate) fn decode<T: DeserializeOwned>(kind: &'static str, stored: &Value) -> Result<T, RulesError> {
    T::deserialize(stored).map_err(|source| RulesError::Decode { kind, source })
}

/// Decodes a stored blob, falling back to the default when it is absent or malformed.
pub(crate) fn decode_or_default<T: DeserializeOwned + Default>(kind: &'static str, stored: &Value) -> T {
    if stored.is_null() {
        return T::default();
    }
    decode(kind, stored).unwrap_or_else(|error| {
        warn!(kind, %error, "ignoring malformed stored blob");
        T::default()
    })
}

/// Decodes each element on its own; elements that do not decode are dropped with a warning.
pub(crate) fn decode_each<T: DeserializeOwned>(kind: &'static str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(kind, index, %error, "skipping malformed entry");
                None
            }
        })
        .collect()
}

/// `deserialize_with` for lists whose malformed entries must not discard their siblings.
/// `null` reads as an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(decode_each(std::any::type_name::<T>(), &items)),
        other => Err(D::Error::custom(format!("expected a list, found {other}"))),
    }
}

/// `deserialize_with` for kind tags: `null` or a value of the wrong type reads as the default.
pub(crate) fn tag_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_default())
}

/// `deserialize_with` for optional tags: `null` is `None`, a malformed tag is the default.
pub(crate) fn optional_tag<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(T::deserialize(&value).unwrap_or_default()))
}

/// `deserialize_with` for optional scalars: anything that does not decode is `None`.
pub(crate) fn optional_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).ok())
}

/// `deserialize_with` for id references: numbers and booleans keep their text, other values read as empty.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(text) => text.clone(),
        Value::Number(_) | Value::Bool(_) => to_display_string(Some(&value)),
        _ => String::new(),
    })
}
