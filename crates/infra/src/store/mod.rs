//! Inventory Store boundary.
//!
//! The store is authoritative for stock, people and the report ledger between
//! reconciliations. Every mutating operation is a single transaction: it is
//! applied completely or not at all.

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use workwear_core::{ReportEntry, StockEntry, StockKey};
use workwear_inventory::IssuancePlan;

pub use in_memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The underlying database failed (connection, constraint, IO).
    #[error("database error in {operation}: {message}")]
    Database { operation: String, message: String },

    /// A replacement snapshot held the same (item, type, size) twice.
    #[error("duplicate stock row {0}")]
    DuplicateStock(StockKey),

    /// A withdrawal found less stock than the batch was validated against.
    #[error("stock row {key} changed during commit: {requested} requested, {available:?} available")]
    StockChanged {
        key: StockKey,
        requested: i64,
        available: Option<i64>,
    },
}

impl StoreError {
    pub fn database(operation: &str, message: impl Into<String>) -> Self {
        Self::Database {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Full contents written by a pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub stock: Vec<StockEntry>,
    pub workers: Vec<String>,
    pub foremen: Vec<String>,
}

/// Transactional CRUD over stock, people and the report ledger.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// All stock rows, insertion order.
    async fn stock(&self) -> Result<Vec<StockEntry>, StoreError>;

    /// `sum(quantity)` for one triple; `None` when no row exists.
    async fn available(&self, key: &StockKey) -> Result<Option<i64>, StoreError>;

    async fn workers(&self) -> Result<Vec<String>, StoreError>;

    async fn foremen(&self) -> Result<Vec<String>, StoreError>;

    /// Report ledger, insertion order.
    async fn reports(&self) -> Result<Vec<ReportEntry>, StoreError>;

    /// Replace every stock row. People and reports are untouched.
    async fn replace_stock(&self, stock: Vec<StockEntry>) -> Result<(), StoreError>;

    /// Replace stock, workers and foremen. Reports are untouched.
    async fn replace_all(&self, snapshot: StoreSnapshot) -> Result<(), StoreError>;

    /// Apply an accepted batch: upsert people, withdraw stock, append reports.
    async fn commit_issuance(&self, plan: &IssuancePlan) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn stock(&self) -> Result<Vec<StockEntry>, StoreError> {
        (**self).stock().await
    }

    async fn available(&self, key: &StockKey) -> Result<Option<i64>, StoreError> {
        (**self).available(key).await
    }

    async fn workers(&self) -> Result<Vec<String>, StoreError> {
        (**self).workers().await
    }

    async fn foremen(&self) -> Result<Vec<String>, StoreError> {
        (**self).foremen().await
    }

    async fn reports(&self) -> Result<Vec<ReportEntry>, StoreError> {
        (**self).reports().await
    }

    async fn replace_stock(&self, stock: Vec<StockEntry>) -> Result<(), StoreError> {
        (**self).replace_stock(stock).await
    }

    async fn replace_all(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        (**self).replace_all(snapshot).await
    }

    async fn commit_issuance(&self, plan: &IssuancePlan) -> Result<(), StoreError> {
        (**self).commit_issuance(plan).await
    }
}

/// Reject stock snapshots holding the same triple twice or a negative balance.
pub(crate) fn validate_stock(operation: &str, stock: &[StockEntry]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::with_capacity(stock.len());
    for entry in stock {
        let key = entry.key();
        if entry.quantity < 0 {
            return Err(StoreError::database(
                operation,
                format!("negative quantity {} for {key}", entry.quantity),
            ));
        }
        if !seen.insert(key.clone()) {
            return Err(StoreError::DuplicateStock(key));
        }
    }
    Ok(())
}
