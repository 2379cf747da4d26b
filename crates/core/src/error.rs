//! Domain error model.

use thiserror::Error;

use crate::stock::StockKey;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is client-caused: malformed sheet input, a request that names
/// stock we do not hold, or a request that would overdraw it. Store and network
/// failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The stock grid cannot be interpreted (too few rows, orphan cells).
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    /// A size label outside the canonical order.
    #[error("unknown size label `{0}` (expected one of S, M, L, XL, XLL, XLLL)")]
    UnknownSize(String),

    /// No stock row exists for the requested triple.
    #[error("unknown stock item {0}")]
    UnknownStockItem(StockKey),

    /// The request would take the stock row below zero.
    #[error("insufficient stock for {key}: available {available}, requested {requested}")]
    InsufficientStock {
        key: StockKey,
        available: i64,
        requested: i64,
    },

    /// Quantity is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Date does not parse as `YYYY-MM-DD`.
    #[error("invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A required field is missing or blank.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An issuance batch with no lines.
    #[error("no data received")]
    EmptyBatch,
}

impl DomainError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedGrid(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }
}
