use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use workwear_core::{
    Aggregate, BatchId, DomainError, IssuanceRequest, ReportEntry, StockKey,
};

/// Aggregate: stock balances for the rows a batch touches.
///
/// Loaded from the store inside the batch's critical section, asked to decide
/// on the whole batch, then discarded. Nothing is persisted unless every line
/// passes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssuanceLedger {
    balances: HashMap<StockKey, i64>,
    version: u64,
}

impl IssuanceLedger {
    pub fn new(balances: impl IntoIterator<Item = (StockKey, i64)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
            version: 0,
        }
    }

    pub fn available(&self, key: &StockKey) -> Option<i64> {
        self.balances.get(key).copied()
    }
}

/// Command: issue every line of a batch, or none of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuanceCommand {
    IssueBatch(Vec<IssuanceRequest>),
}

/// Event: one line was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIssued {
    /// Zero-based position of the line in its batch.
    pub line: usize,
    pub request: IssuanceRequest,
    /// Balance left on the row after this line.
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuanceEvent {
    StockIssued(StockIssued),
}

impl Aggregate for IssuanceLedger {
    type Command = IssuanceCommand;
    type Event = IssuanceEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            IssuanceEvent::StockIssued(e) => {
                *self.balances.entry(e.request.key()).or_insert(0) -= e.request.quantity;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            IssuanceCommand::IssueBatch(lines) => self.handle_batch(lines),
        }
    }
}

impl IssuanceLedger {
    fn handle_batch(&self, lines: &[IssuanceRequest]) -> Result<Vec<IssuanceEvent>, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::EmptyBatch);
        }

        // Earlier lines of the same batch draw from the same balance.
        let mut scratch = self.clone();
        let mut events = Vec::with_capacity(lines.len());

        for (line, request) in lines.iter().enumerate() {
            let key = request.key();
            if request.quantity <= 0 {
                return Err(DomainError::invalid_quantity(format!(
                    "{} for {key}: must be a positive integer",
                    request.quantity
                )));
            }

            let available = scratch
                .available(&key)
                .ok_or_else(|| DomainError::UnknownStockItem(key.clone()))?;
            if available < request.quantity {
                return Err(DomainError::InsufficientStock {
                    key,
                    available,
                    requested: request.quantity,
                });
            }

            let event = IssuanceEvent::StockIssued(StockIssued {
                line,
                request: request.clone(),
                remaining: available - request.quantity,
            });
            scratch.apply(&event);
            events.push(event);
        }

        Ok(events)
    }
}

/// Quantity to take off one stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub key: StockKey,
    pub quantity: i64,
}

/// Everything a store must apply, in one transaction, for an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuancePlan {
    pub batch_id: BatchId,
    /// Worker names to upsert, first-seen order.
    pub workers: Vec<String>,
    /// Foreman names to upsert, first-seen order.
    pub foremen: Vec<String>,
    /// One withdrawal per touched row (lines on the same row are summed).
    pub withdrawals: Vec<Withdrawal>,
    /// One report row per line, batch order.
    pub reports: Vec<ReportEntry>,
}

impl IssuancePlan {
    pub fn from_events(batch_id: BatchId, events: &[IssuanceEvent]) -> Self {
        let mut plan = Self {
            batch_id,
            workers: Vec::new(),
            foremen: Vec::new(),
            withdrawals: Vec::new(),
            reports: Vec::with_capacity(events.len()),
        };

        for event in events {
            let IssuanceEvent::StockIssued(issued) = event;
            let req = &issued.request;

            push_unique(&mut plan.workers, &req.worker);
            push_unique(&mut plan.foremen, &req.foreman);

            let key = req.key();
            match plan.withdrawals.iter_mut().find(|w| w.key == key) {
                Some(w) => w.quantity += req.quantity,
                None => plan.withdrawals.push(Withdrawal {
                    key,
                    quantity: req.quantity,
                }),
            }

            plan.reports.push(ReportEntry::from(req));
        }

        plan
    }

    pub fn total_quantity(&self) -> i64 {
        self.withdrawals.iter().map(|w| w.quantity).sum()
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
