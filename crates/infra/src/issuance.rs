use serde::Serialize;
use tracing::{info, instrument, Span};

use workwear_core::{Aggregate, BatchId, IssuanceRequest, StockKey};
use workwear_inventory::{IssuanceCommand, IssuanceLedger, IssuancePlan};

use crate::error::ServiceError;
use crate::gate::StockGate;
use crate::store::InventoryStore;

/// Outcome of an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceReceipt {
    pub batch_id: BatchId,
    pub lines: usize,
    pub total_quantity: i64,
}

/// Executes issuance batches against the inventory store.
///
/// ## Execution
///
/// 1. **Serialize**: takes the exclusive side of the [`StockGate`]
/// 2. **Load**: reads the balance of every row the batch touches
/// 3. **Decide**: asks [`IssuanceLedger`] for the whole batch (pure)
/// 4. **Commit**: hands the resulting [`IssuancePlan`] to the store as one
///    transaction
///
/// ## Error Semantics
///
/// Any rejected line rejects the batch; nothing is written. A withdrawal that
/// loses a race inside the store (possible only when another process shares
/// the database) is reported as `InsufficientStock` as well.
#[derive(Debug, Clone)]
pub struct IssuanceProcessor<S> {
    store: S,
    gate: StockGate,
}

impl<S> IssuanceProcessor<S> {
    pub fn new(store: S, gate: StockGate) -> Self {
        Self { store, gate }
    }
}

impl<S> IssuanceProcessor<S>
where
    S: InventoryStore,
{
    #[instrument(skip(self, batch), fields(lines = batch.len(), batch_id = tracing::field::Empty), err)]
    pub async fn process(&self, batch: Vec<IssuanceRequest>) -> Result<IssuanceReceipt, ServiceError> {
        let batch_id = BatchId::new();
        Span::current().record("batch_id", tracing::field::display(batch_id));

        let _guard = self.gate.exclusive().await;

        let mut keys: Vec<StockKey> = Vec::new();
        for request in &batch {
            let key = request.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let mut balances = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(available) = self.store.available(&key).await? {
                balances.push((key, available));
            }
        }

        let ledger = IssuanceLedger::new(balances);
        let events = ledger.handle(&IssuanceCommand::IssueBatch(batch))?;
        let plan = IssuancePlan::from_events(batch_id, &events);

        self.store.commit_issuance(&plan).await?;

        let receipt = IssuanceReceipt {
            batch_id,
            lines: plan.reports.len(),
            total_quantity: plan.total_quantity(),
        };
        info!(
            lines = receipt.lines,
            total_quantity = receipt.total_quantity,
            "issuance batch committed"
        );
        Ok(receipt)
    }
}
