use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One record of the backend snapshot file.
///
/// The producer side writes most fields loosely (numbers as strings, missing
/// keys), so every optional field is decoded leniently: a value that cannot be
/// interpreted becomes `None` and is later filled with a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSnapshotEntry")]
pub struct SnapshotEntry {
    pub id: String,
    #[serde(rename = "ca", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "change24h", skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_since_open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

// Wire shape; both spellings of the address and change keys may appear in
// the same record, the first listed one wins.
#[derive(Deserialize)]
struct RawSnapshotEntry {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    ca: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    channel: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    price: Option<f64>,
    #[serde(default, rename = "change24h", deserialize_with = "lenient::number")]
    change24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    change_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    mentions: Option<u32>,
    #[serde(default, deserialize_with = "lenient::series")]
    history: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient::text")]
    mcap: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    time_since_open: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    timestamp: Option<f64>,
}

impl From<RawSnapshotEntry> for SnapshotEntry {
    fn from(raw: RawSnapshotEntry) -> Self {
        Self {
            id: raw.id,
            address: raw.ca.or(raw.address),
            name: raw.name,
            channel: raw.channel,
            price: raw.price,
            change_24h: raw.change24h.or(raw.change_24h),
            mentions: raw.mentions,
            history: raw.history,
            mcap: raw.mcap,
            time_since_open: raw.time_since_open,
            timestamp: raw.timestamp,
        }
    }
}

impl SnapshotEntry {
    /// Decode a snapshot payload, skipping records that do not carry an id.
    ///
    /// Returns `None` when the payload itself is not a JSON array.
    pub fn parse_batch(value: Value) -> Option<Vec<SnapshotEntry>> {
        let Value::Array(items) = value else {
            return None;
        };

        let entries = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<SnapshotEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed snapshot entry: {}", e);
                    None
                }
            })
            .collect();

        Some(entries)
    }

    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

mod lenient {
    use super::*;

    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or numeric id, got {}",
                other
            ))),
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(value_as_f64))
    }

    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(value_as_f64)
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32))
    }

    pub fn series<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items.iter().map(value_as_f64).collect(),
            _ => None,
        })
    }
}
