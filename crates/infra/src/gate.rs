use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes everything that reads-then-writes stock or the worksheets.
///
/// Issuance, pull and push all hold the gate. Two pushes must not overlap:
/// each clears and rewrites the worksheets, and interleaved clear/append
/// calls would leave the report ledger written twice.
#[derive(Debug, Clone, Default)]
pub struct StockGate {
    lock: Arc<Mutex<()>>,
}

impl StockGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn exclusive(&self) -> OwnedMutexGuard<()> {
        self.lock.clone().lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn second_holder_waits_for_the_first() {
        let gate = StockGate::new();
        let held = gate.exclusive().await;

        let contender = gate.clone();
        let handle = tokio::spawn(async move {
            let _guard = contender.exclusive().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn clones_share_one_lock() {
        let gate = StockGate::new();
        let clone = gate.clone();

        let _held = gate.exclusive().await;
        let attempt = tokio::time::timeout(Duration::from_millis(20), clone.exclusive()).await;
        assert!(attempt.is_err());
    }
}
