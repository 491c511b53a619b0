//! Movement validator.
//!
//! The one place admission rules live. The HTTP layer, tests and any future
//! internal caller all submit a raw [`MovementRequest`] and get back either
//! a fully parsed movement or the first rule it broke. Rules run in a fixed
//! order so error messages are deterministic:
//!
//! 1. all fields present
//! 2. quantity is an integer
//! 3. date parses and is not in the future
//! 4. product exists (checked by the engine, which owns the catalog handle)
//! 5. resulting stock is not negative (ditto)

use chrono::NaiveDate;

use crate::{EngineError, products};

/// A raw, untrusted movement submission as it arrives from the boundary.
#[derive(Clone, Debug, Default)]
pub struct MovementRequest {
    pub product_id: Option<String>,
    pub quantity: Option<String>,
    pub effective_date: Option<String>,
}

impl MovementRequest {
    pub fn new(product_id: &str, quantity: &str, effective_date: &str) -> Self {
        Self {
            product_id: Some(product_id.to_string()),
            quantity: Some(quantity.to_string()),
            effective_date: Some(effective_date.to_string()),
        }
    }
}

/// Outcome of the structural rules (steps 1-3): normalized product id,
/// parsed quantity and parsed business date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedRequest {
    pub product_id: String,
    pub quantity: i64,
    pub effective_date: NaiveDate,
}

/// Runs the pure part of the pipeline against an injected "today" so the
/// date bound is whole-day and clock-independent.
pub(crate) fn parse_request(
    request: &MovementRequest,
    today: NaiveDate,
) -> Result<ParsedRequest, EngineError> {
    let product_id = match request.product_id.as_deref() {
        Some(id) if !id.trim().is_empty() => products::normalize_id(id),
        _ => return Err(EngineError::MissingField("productId")),
    };
    let quantity_raw = match request.quantity.as_deref() {
        Some(quantity) if !quantity.trim().is_empty() => quantity.trim(),
        _ => return Err(EngineError::MissingField("quantity")),
    };
    let date_raw = match request.effective_date.as_deref() {
        Some(date) if !date.trim().is_empty() => date.trim(),
        _ => return Err(EngineError::MissingField("date")),
    };

    let quantity: i64 = quantity_raw
        .parse()
        .map_err(|_| EngineError::InvalidQuantity(quantity_raw.to_string()))?;

    let effective_date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|_| EngineError::FutureDate(date_raw.to_string()))?;
    if effective_date > today {
        return Err(EngineError::FutureDate(format!(
            "{effective_date} is after {today}"
        )));
    }

    Ok(ParsedRequest {
        product_id,
        quantity,
        effective_date,
    })
}
