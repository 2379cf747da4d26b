//! Whole-sheet reconciliation between the spreadsheet and the store.
//!
//! Pulls replace store rows with the decoded worksheets; pushes overwrite the
//! worksheets with the encoded store. Every read and every encode happens
//! before the first write, so a malformed grid or an unknown size leaves both
//! sides untouched.

use tracing::{info, instrument, warn};

use workwear_core::StockEntry;
use workwear_inventory::{decode, decode_people, encode, encode_reports};

use crate::error::ServiceError;
use crate::gate::StockGate;
use crate::sheets::{Workbook, Worksheet};
use crate::store::{InventoryStore, StoreSnapshot};

const WORKER_COLUMN: usize = 0;
const FOREMAN_COLUMN: usize = 1;

#[derive(Debug, Clone)]
pub struct ReconciliationEngine<S, W> {
    store: S,
    workbook: Workbook<W>,
    gate: StockGate,
}

impl<S, W> ReconciliationEngine<S, W>
where
    S: InventoryStore,
    W: Worksheet,
{
    pub fn new(store: S, workbook: Workbook<W>, gate: StockGate) -> Self {
        Self {
            store,
            workbook,
            gate,
        }
    }

    /// Replace stock rows with the stock worksheet.
    #[instrument(skip(self), err)]
    pub async fn pull_stock(&self) -> Result<(), ServiceError> {
        let _guard = self.gate.exclusive().await;

        let stock = self.read_stock().await?;
        let rows = stock.len();
        self.store.replace_stock(stock).await?;

        info!(rows, "stock pulled from worksheet");
        Ok(())
    }

    /// Replace stock, workers and foremen with the stock and people worksheets.
    #[instrument(skip(self), err)]
    pub async fn pull(&self) -> Result<(), ServiceError> {
        let _guard = self.gate.exclusive().await;

        let stock = self.read_stock().await?;
        let workers = self.workbook.people.col_values(WORKER_COLUMN).await?;
        let foremen = self.workbook.people.col_values(FOREMAN_COLUMN).await?;
        let (workers, foremen) = decode_people(&workers, &foremen);

        let snapshot = StoreSnapshot {
            stock,
            workers,
            foremen,
        };
        info!(
            rows = snapshot.stock.len(),
            workers = snapshot.workers.len(),
            foremen = snapshot.foremen.len(),
            "store pulled from worksheets"
        );
        self.store.replace_all(snapshot).await?;
        Ok(())
    }

    /// Overwrite the stock worksheet with the store.
    #[instrument(skip(self), err)]
    pub async fn push_stock(&self) -> Result<(), ServiceError> {
        let _guard = self.gate.exclusive().await;

        let grid = encode(&self.store.stock().await?)?;
        let sheet = &self.workbook.stock;
        sheet.clear().await?;
        sheet.update_range("A1", grid).await?;

        info!(sheet = sheet.title(), "stock pushed to worksheet");
        Ok(())
    }

    /// Overwrite the stock and report worksheets with the store.
    #[instrument(skip(self), err)]
    pub async fn push(&self) -> Result<(), ServiceError> {
        let _guard = self.gate.exclusive().await;

        let stock_grid = encode(&self.store.stock().await?)?;
        let reports = self.store.reports().await?;
        let report_grid = encode_reports(&reports);

        let stock_sheet = &self.workbook.stock;
        stock_sheet.clear().await?;
        stock_sheet.update_range("A1", stock_grid).await?;

        let report_sheet = &self.workbook.report;
        report_sheet.clear().await?;
        report_sheet.append_rows(report_grid).await?;

        info!(reports = reports.len(), "stock and report pushed to worksheets");
        Ok(())
    }

    async fn read_stock(&self) -> Result<Vec<StockEntry>, ServiceError> {
        let grid = self.workbook.stock.get_all_values().await?;
        Ok(collapse_duplicates(decode(&grid)?))
    }
}

/// Merge entries sharing an (item, type, size) triple by summing their
/// quantities. The merged entry keeps the position of the first occurrence.
pub fn collapse_duplicates(entries: Vec<StockEntry>) -> Vec<StockEntry> {
    let mut merged: Vec<StockEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged
            .iter_mut()
            .find(|m| m.item == entry.item && m.item_type == entry.item_type && m.size == entry.size)
        {
            Some(existing) => {
                warn!(
                    key = %entry.key(),
                    first = existing.quantity,
                    again = entry.quantity,
                    "duplicate stock column; quantities summed"
                );
                existing.quantity += entry.quantity;
            }
            None => merged.push(entry),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_summed_in_first_position() {
        let merged = collapse_duplicates(vec![
            StockEntry::new("T-shirt", "Red", "M", 2),
            StockEntry::new("Cap", "", "S", 1),
            StockEntry::new("T-shirt", "Red", "M", 3),
        ]);
        assert_eq!(
            merged,
            vec![
                StockEntry::new("T-shirt", "Red", "M", 5),
                StockEntry::new("Cap", "", "S", 1),
            ]
        );
    }
}
