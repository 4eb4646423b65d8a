// src/dexscreener/models.rs
use serde::Deserialize;

// Deserialize values that arrive either as a JSON number or as a numeric string
pub mod string_or_float {
    use serde::{self, Deserializer};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrFloat;

        impl<'de> serde::de::Visitor<'de> for StringOrFloat {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a float or a string containing a float")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.trim().parse::<f64>().map_err(serde::de::Error::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }
        }

        deserializer.deserialize_any(StringOrFloat)
    }
}

// Response of GET /dex/search
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(with = "string_or_float")]
    pub price_usd: f64,
    #[serde(default)]
    pub price_change: PriceChange,
    pub base_token: BaseToken,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceChange {
    #[serde(default)]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseToken {
    pub symbol: String,
}

impl SearchResponse {
    pub fn first_pair(self) -> Option<DexPair> {
        self.pairs.and_then(|pairs| pairs.into_iter().next())
    }
}
