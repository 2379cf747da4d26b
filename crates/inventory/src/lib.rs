//! Inventory domain module.
//!
//! This crate contains the business rules for garment stock, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage):
//! - `grid`: the spreadsheet stock matrix codec
//! - `report` / `people`: the companion worksheet codecs
//! - `ledger`: batch issuance decisions
//! - `catalog`: picker catalog and name search

pub mod catalog;
pub mod grid;
pub mod ledger;
pub mod people;
pub mod report;

pub use catalog::{search_names, Catalog, CatalogItem, CatalogType, SizeQuantity};
pub use grid::{a1, decode, encode, Grid};
pub use ledger::{
    IssuanceCommand, IssuanceEvent, IssuanceLedger, IssuancePlan, StockIssued, Withdrawal,
};
pub use people::{decode_name_column, decode_people};
pub use report::{encode_reports, REPORT_HEADER};
