//! `workwear-core` — domain vocabulary for the garment issuance ledger.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! stock keys and canonical sizes, issuance requests, report rows and the
//! client-facing error taxonomy.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod issuance;
pub mod report;
pub mod stock;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
pub use id::BatchId;
pub use issuance::{parse_issue_date, parse_quantity, IssuanceRequest, ISSUE_DATE_FORMAT};
pub use report::ReportEntry;
pub use stock::{Size, StockEntry, StockKey};
