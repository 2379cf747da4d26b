//! Report ledger rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::issuance::IssuanceRequest;

/// One issued line, as recorded in the append-only report ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub date: NaiveDate,
    pub worker_name: String,
    pub foreman_name: String,
    pub item: String,
    pub item_type: String,
    pub size: String,
    pub quantity: i64,
}

impl From<&IssuanceRequest> for ReportEntry {
    fn from(req: &IssuanceRequest) -> Self {
        Self {
            date: req.date,
            worker_name: req.worker.clone(),
            foreman_name: req.foreman.clone(),
            item: req.item.clone(),
            item_type: req.item_type.clone(),
            size: req.size.clone(),
            quantity: req.quantity,
        }
    }
}
