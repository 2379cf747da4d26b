//! Report worksheet codec: one row per issued line, in ledger order.

use workwear_core::{ReportEntry, ISSUE_DATE_FORMAT};

use crate::grid::Grid;

/// Header row of the report worksheet.
pub const REPORT_HEADER: [&str; 7] = ["Date", "Worker", "Foreman", "Item", "Type", "Size", "Quantity"];

/// Encode the report ledger as a header row followed by one row per entry.
pub fn encode_reports(reports: &[ReportEntry]) -> Grid {
    let mut grid = Vec::with_capacity(reports.len() + 1);
    grid.push(REPORT_HEADER.iter().map(|h| h.to_string()).collect());
    for r in reports {
        grid.push(vec![
            r.date.format(ISSUE_DATE_FORMAT).to_string(),
            r.worker_name.clone(),
            r.foreman_name.clone(),
            r.item.clone(),
            r.item_type.clone(),
            r.size.clone(),
            r.quantity.to_string(),
        ]);
    }
    grid
}
