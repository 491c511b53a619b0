//! The module contains the errors the engine can throw.
//!
//! Validation errors ([`MissingField`] through [`InsufficientStock`]) are
//! expected, user-facing rejections: the movement was refused and the ledger
//! is unchanged. [`ConcurrentModification`] is retryable and normally
//! consumed inside the engine. [`Database`] wraps store failures.
//!
//! [`MissingField`]: EngineError::MissingField
//! [`InsufficientStock`]: EngineError::InsufficientStock
//! [`ConcurrentModification`]: EngineError::ConcurrentModification
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("quantity must be an integer")]
    InvalidQuantity(String),
    #[error("invalid date: {0}")]
    FutureDate(String),
    #[error("product \"{0}\" not found")]
    UnknownProduct(String),
    #[error("insufficient stock: {available} {unit} available")]
    InsufficientStock { available: i64, unit: String },
    #[error("product \"{0}\" already registered")]
    ProductExists(String),
    #[error("movement lost a concurrent append race")]
    ConcurrentModification,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::FutureDate(a), Self::FutureDate(b)) => a == b,
            (Self::UnknownProduct(a), Self::UnknownProduct(b)) => a == b,
            (
                Self::InsufficientStock {
                    available: a,
                    unit: au,
                },
                Self::InsufficientStock {
                    available: b,
                    unit: bu,
                },
            ) => a == b && au == bu,
            (Self::ProductExists(a), Self::ProductExists(b)) => a == b,
            (Self::ConcurrentModification, Self::ConcurrentModification) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
