use thiserror::Error;

use workwear_core::DomainError;

use crate::sheets::SheetError;
use crate::store::StoreError;

/// Failure of a service operation (issuance, reconciliation, lookup).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request or the spreadsheet content was rejected.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(StoreError),

    /// The spreadsheet service failed (`ExternalIOError`).
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl ServiceError {
    /// Caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Domain(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            // Lost a race against another writer: same outcome as failing
            // validation against the newer balance.
            StoreError::StockChanged {
                key,
                requested,
                available: Some(available),
            } => ServiceError::Domain(DomainError::InsufficientStock {
                key,
                available,
                requested,
            }),
            StoreError::StockChanged {
                key,
                available: None,
                ..
            } => ServiceError::Domain(DomainError::UnknownStockItem(key)),
            StoreError::DuplicateStock(key) => ServiceError::Domain(DomainError::malformed(format!(
                "stock row {key} appears more than once"
            ))),
            other => ServiceError::Store(other),
        }
    }
}
