//! Wire types shared between the server and its clients.
//!
//! JSON uses camelCase keys (`productId`, `stockAfter`) to match the
//! original form clients. Submission fields arrive as optional strings so
//! presence and format are judged by the engine's validator, not by serde
//! rejecting the whole body.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts a JSON string or number and yields its string form.
///
/// HTML forms post quantities as strings while API clients send numbers;
/// both end up in the same validation pipeline.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Integer(i64),
        Float(f64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Raw::String(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

pub mod movement {
    use super::*;

    /// A movement submission, untrusted as-is.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MovementNew {
        #[serde(default)]
        pub product_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        pub quantity: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
    }

    /// A ledger record enriched with catalog data.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MovementView {
        pub id: i64,
        pub product_id: String,
        pub product_name: String,
        pub unit: String,
        pub quantity: i64,
        pub date: NaiveDate,
        pub stock_after: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod stock {
    use super::*;

    /// Current balance of one catalog product.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockLevel {
        pub product_id: String,
        pub product_name: String,
        pub current_stock: i64,
        pub unit: String,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductNew {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub unit: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: String,
        pub name: String,
        pub unit: String,
    }
}
