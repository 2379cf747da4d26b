use std::sync::RwLock;

use async_trait::async_trait;

use workwear_core::{ReportEntry, StockEntry, StockKey};
use workwear_inventory::IssuancePlan;

use super::{validate_stock, InventoryStore, StoreError, StoreSnapshot};

#[derive(Debug, Clone, Default)]
struct State {
    stock: Vec<StockEntry>,
    workers: Vec<String>,
    foremen: Vec<String>,
    reports: Vec<ReportEntry>,
}

/// In-memory inventory store.
///
/// Intended for tests/dev. Mutations run against a copy of the state, which
/// replaces the original only when the whole operation succeeded.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: RwLock<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with stock rows (no people, empty ledger).
    pub fn with_stock(stock: Vec<StockEntry>) -> Self {
        Self {
            state: RwLock::new(State {
                stock,
                ..State::default()
            }),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Result<T, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::database("read", "lock poisoned"))?;
        Ok(f(&state))
    }

    fn mutate(
        &self,
        operation: &str,
        f: impl FnOnce(&mut State) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::database(operation, "lock poisoned"))?;
        let mut next = state.clone();
        f(&mut next)?;
        *state = next;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn stock(&self) -> Result<Vec<StockEntry>, StoreError> {
        self.read(|s| s.stock.clone())
    }

    async fn available(&self, key: &StockKey) -> Result<Option<i64>, StoreError> {
        self.read(|s| {
            let mut rows = s.stock.iter().filter(|e| e.key() == *key).peekable();
            rows.peek()?;
            Some(rows.map(|e| e.quantity).sum())
        })
    }

    async fn workers(&self) -> Result<Vec<String>, StoreError> {
        self.read(|s| s.workers.clone())
    }

    async fn foremen(&self) -> Result<Vec<String>, StoreError> {
        self.read(|s| s.foremen.clone())
    }

    async fn reports(&self) -> Result<Vec<ReportEntry>, StoreError> {
        self.read(|s| s.reports.clone())
    }

    async fn replace_stock(&self, stock: Vec<StockEntry>) -> Result<(), StoreError> {
        validate_stock("replace_stock", &stock)?;
        self.mutate("replace_stock", |s| {
            s.stock = stock;
            Ok(())
        })
    }

    async fn replace_all(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        validate_stock("replace_all", &snapshot.stock)?;
        self.mutate("replace_all", |s| {
            s.stock = snapshot.stock;
            s.workers = snapshot.workers;
            s.foremen = snapshot.foremen;
            Ok(())
        })
    }

    async fn commit_issuance(&self, plan: &IssuancePlan) -> Result<(), StoreError> {
        self.mutate("commit_issuance", |s| {
            for name in &plan.workers {
                if !s.workers.contains(name) {
                    s.workers.push(name.clone());
                }
            }
            for name in &plan.foremen {
                if !s.foremen.contains(name) {
                    s.foremen.push(name.clone());
                }
            }

            for w in &plan.withdrawals {
                let row = s.stock.iter_mut().find(|e| e.key() == w.key);
                match row {
                    Some(row) if row.quantity >= w.quantity => row.quantity -= w.quantity,
                    other => {
                        return Err(StoreError::StockChanged {
                            key: w.key.clone(),
                            requested: w.quantity,
                            available: other.map(|r| r.quantity),
                        });
                    }
                }
            }

            s.reports.extend(plan.reports.iter().cloned());
            Ok(())
        })
    }
}
