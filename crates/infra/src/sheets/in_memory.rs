use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use workwear_inventory::Grid;

use super::{SheetError, Worksheet};

#[derive(Debug, Default)]
struct Inner {
    values: Grid,
    fail_next: u32,
}

/// Worksheet held in process memory.
///
/// Intended for tests/dev. [`InMemoryWorksheet::fail_next`] makes the next
/// calls fail with HTTP 503 to exercise error paths.
#[derive(Debug)]
pub struct InMemoryWorksheet {
    title: String,
    inner: Mutex<Inner>,
}

impl InMemoryWorksheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_values(title, Grid::new())
    }

    pub fn with_values(title: impl Into<String>, values: Grid) -> Self {
        Self {
            title: title.into(),
            inner: Mutex::new(Inner {
                values,
                fail_next: 0,
            }),
        }
    }

    /// Fail the next `calls` worksheet calls.
    pub fn fail_next(&self, calls: u32) {
        self.lock().fail_next = calls;
    }

    /// Current cells.
    pub fn values(&self) -> Grid {
        self.lock().values.clone()
    }

    pub fn set_values(&self, values: Grid) {
        self.lock().values = values;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn call(&self, operation: &'static str) -> Result<MutexGuard<'_, Inner>, SheetError> {
        let mut inner = self.lock();
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            return Err(SheetError::Status {
                sheet: self.title.clone(),
                operation,
                status: 503,
                message: "injected failure".to_string(),
            });
        }
        Ok(inner)
    }
}

#[async_trait]
impl Worksheet for InMemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn get_all_values(&self) -> Result<Grid, SheetError> {
        let inner = self.call("get")?;
        let mut values = inner.values.clone();
        while values.last().is_some_and(|row| row.iter().all(|c| c.is_empty())) {
            values.pop();
        }
        Ok(values)
    }

    async fn clear(&self) -> Result<(), SheetError> {
        self.call("clear")?.values.clear();
        Ok(())
    }

    async fn append_rows(&self, rows: Grid) -> Result<(), SheetError> {
        let mut inner = self.call("append")?;
        while inner
            .values
            .last()
            .is_some_and(|row| row.iter().all(|c| c.is_empty()))
        {
            inner.values.pop();
        }
        inner.values.extend(rows);
        Ok(())
    }

    async fn update_range(&self, start: &str, rows: Grid) -> Result<(), SheetError> {
        let (top, left) = parse_a1(start).ok_or_else(|| SheetError::Status {
            sheet: self.title.clone(),
            operation: "update",
            status: 400,
            message: format!("unable to parse range: {start}"),
        })?;

        let mut inner = self.call("update")?;
        for (r, row) in rows.into_iter().enumerate() {
            let target_row = top + r;
            if inner.values.len() <= target_row {
                inner.values.resize(target_row + 1, Vec::new());
            }
            let target = &mut inner.values[target_row];
            if target.len() < left + row.len() {
                target.resize(left + row.len(), String::new());
            }
            for (c, cell) in row.into_iter().enumerate() {
                target[left + c] = cell;
            }
        }
        Ok(())
    }
}

/// Zero-based (row, col) of an A1 cell reference such as `B3`.
fn parse_a1(cell: &str) -> Option<(usize, usize)> {
    let cell = cell.trim();
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1));
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}
