//! Spreadsheet boundary.
//!
//! A [`Worksheet`] is one tab of the shared spreadsheet, seen as a grid of
//! strings. [`Workbook`] groups the three tabs the service works with.

pub mod google;
pub mod in_memory;
pub mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use workwear_inventory::Grid;

pub use google::GoogleWorksheet;
pub use in_memory::InMemoryWorksheet;
pub use retry::RetryPolicy;

/// Failure talking to the spreadsheet service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("worksheet {sheet}: transport failure during {operation}: {message}")]
    Transport {
        sheet: String,
        operation: &'static str,
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("worksheet {sheet}: {operation} returned HTTP {status}: {message}")]
    Status {
        sheet: String,
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The response body could not be understood.
    #[error("worksheet {sheet}: unreadable {operation} response: {message}")]
    Decode {
        sheet: String,
        operation: &'static str,
        message: String,
    },
}

impl SheetError {
    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetError::Transport { .. } => true,
            SheetError::Status { status, .. } => *status == 429 || *status >= 500,
            SheetError::Decode { .. } => false,
        }
    }
}

/// One worksheet of the spreadsheet.
///
/// Grids are row-major and ragged: trailing empty cells may be missing.
#[async_trait]
pub trait Worksheet: Send + Sync {
    fn title(&self) -> &str;

    async fn get_all_values(&self) -> Result<Grid, SheetError>;

    async fn clear(&self) -> Result<(), SheetError>;

    /// Append rows below the last non-empty row.
    async fn append_rows(&self, rows: Grid) -> Result<(), SheetError>;

    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetError> {
        self.append_rows(vec![row]).await
    }

    /// Overwrite the block starting at A1 cell `start` with `rows`.
    async fn update_range(&self, start: &str, rows: Grid) -> Result<(), SheetError>;

    /// Cells of zero-based column `col`, top to bottom, up to the last
    /// non-empty row of the sheet.
    async fn col_values(&self, col: usize) -> Result<Vec<String>, SheetError> {
        let grid = self.get_all_values().await?;
        let mut column: Vec<String> = grid
            .into_iter()
            .map(|row| row.into_iter().nth(col).unwrap_or_default())
            .collect();
        while column.last().is_some_and(|c| c.is_empty()) {
            column.pop();
        }
        Ok(column)
    }
}

#[async_trait]
impl<W> Worksheet for Arc<W>
where
    W: Worksheet + ?Sized,
{
    fn title(&self) -> &str {
        (**self).title()
    }

    async fn get_all_values(&self) -> Result<Grid, SheetError> {
        (**self).get_all_values().await
    }

    async fn clear(&self) -> Result<(), SheetError> {
        (**self).clear().await
    }

    async fn append_rows(&self, rows: Grid) -> Result<(), SheetError> {
        (**self).append_rows(rows).await
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetError> {
        (**self).append_row(row).await
    }

    async fn update_range(&self, start: &str, rows: Grid) -> Result<(), SheetError> {
        (**self).update_range(start, rows).await
    }

    async fn col_values(&self, col: usize) -> Result<Vec<String>, SheetError> {
        (**self).col_values(col).await
    }
}

/// The stock, report and people worksheets.
#[derive(Debug, Clone)]
pub struct Workbook<W> {
    pub stock: W,
    pub report: W,
    pub people: W,
}

impl<W> Workbook<W> {
    pub fn new(stock: W, report: W, people: W) -> Self {
        Self {
            stock,
            report,
            people,
        }
    }

    /// Convert every worksheet, e.g. to erase its concrete type.
    pub fn map<U>(self, f: impl Fn(W) -> U) -> Workbook<U> {
        Workbook {
            stock: f(self.stock),
            report: f(self.report),
            people: f(self.people),
        }
    }
}

impl Workbook<Arc<InMemoryWorksheet>> {
    /// Three empty in-memory worksheets with the given titles.
    pub fn in_memory(names: &crate::config::SheetNames) -> Self {
        Self::new(
            Arc::new(InMemoryWorksheet::new(&names.stock)),
            Arc::new(InMemoryWorksheet::new(&names.report)),
            Arc::new(InMemoryWorksheet::new(&names.people)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn col_values_pads_short_rows_and_trims_tail() {
        let sheet = InMemoryWorksheet::with_values(
            "People",
            grid(&[&["Workers", "Foremen"], &["Ivan"], &["Anna", "Petro"], &["Oleh"], &[]]),
        );

        assert_eq!(sheet.col_values(0).await.unwrap(), vec!["Workers", "Ivan", "Anna", "Oleh"]);
        assert_eq!(sheet.col_values(1).await.unwrap(), vec!["Foremen", "", "Petro"]);
    }

    #[test]
    fn transient_classification() {
        let status = |status| SheetError::Status {
            sheet: "Stock".into(),
            operation: "get",
            status,
            message: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(403).is_transient());
    }
}
