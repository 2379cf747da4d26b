//! Infrastructure layer: store, spreadsheet, config and the services that
//! tie them together.

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod issuance;
pub mod lookup;
pub mod reconcile;
pub mod sheets;
pub mod store;


pub use config::{AppConfig, SheetNames, SheetsConfig};
pub use error::ServiceError;
pub use gate::StockGate;
pub use issuance::{IssuanceProcessor, IssuanceReceipt};
pub use lookup::{LookupService, SearchKind};
pub use reconcile::ReconciliationEngine;
