//! SQLite-backed inventory store.
//!
//! ## Error Mapping
//!
//! | SQLx error | StoreError |
//! |------------|------------|
//! | Database (unique violation on `stock`) | `DuplicateStock` |
//! | Database (any other) | `Database` |
//! | PoolClosed, Io, Protocol, ... | `Database` |
//!
//! ## Concurrency
//!
//! Withdrawals are conditional updates (`quantity >= n`). If a row no longer
//! holds enough stock when the batch commits, the update touches zero rows and
//! the whole transaction is rolled back with `StockChanged`, so two batches
//! can never both spend the same units.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::instrument;

use workwear_core::{ReportEntry, StockEntry, StockKey};
use workwear_inventory::IssuancePlan;

use super::{validate_stock, InventoryStore, StoreError, StoreSnapshot};

/// SQLite inventory store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Wrap a pool whose schema has already been created
    /// (see [`crate::db::ensure_schema`]).
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn begin(&self, operation: &str) -> Result<Transaction<'static, Sqlite>, StoreError> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn stock(&self) -> Result<Vec<StockEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT item, item_type, size, quantity
            FROM stock
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("stock", e))?;

        rows.iter()
            .map(|row| {
                Ok(StockEntry {
                    item: row.try_get("item")?,
                    item_type: row.try_get("item_type")?,
                    size: row.try_get("size")?,
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| map_sqlx_error("stock", e))
    }

    async fn available(&self, key: &StockKey) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT SUM(quantity)
            FROM stock
            WHERE item = ?1 AND item_type = ?2 AND size = ?3
            "#,
        )
        .bind(&key.item)
        .bind(&key.item_type)
        .bind(&key.size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("available", e))
    }

    async fn workers(&self) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT name FROM workers ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("workers", e))
    }

    async fn foremen(&self) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT name FROM foremen ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("foremen", e))
    }

    async fn reports(&self) -> Result<Vec<ReportEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT date, worker_name, foreman_name, item, item_type, size, quantity
            FROM report
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("reports", e))?;

        rows.iter()
            .map(|row| {
                Ok(ReportEntry {
                    date: row.try_get::<NaiveDate, _>("date")?,
                    worker_name: row.try_get("worker_name")?,
                    foreman_name: row.try_get("foreman_name")?,
                    item: row.try_get("item")?,
                    item_type: row.try_get("item_type")?,
                    size: row.try_get("size")?,
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| map_sqlx_error("reports", e))
    }

    #[instrument(skip(self, stock), fields(rows = stock.len()), err)]
    async fn replace_stock(&self, stock: Vec<StockEntry>) -> Result<(), StoreError> {
        validate_stock("replace_stock", &stock)?;

        let mut tx = self.begin("replace_stock").await?;
        write_stock(&mut tx, &stock).await?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    #[instrument(
        skip(self, snapshot),
        fields(
            rows = snapshot.stock.len(),
            workers = snapshot.workers.len(),
            foremen = snapshot.foremen.len()
        ),
        err
    )]
    async fn replace_all(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        validate_stock("replace_all", &snapshot.stock)?;

        let mut tx = self.begin("replace_all").await?;
        write_stock(&mut tx, &snapshot.stock).await?;
        write_names(&mut tx, "workers", &snapshot.workers).await?;
        write_names(&mut tx, "foremen", &snapshot.foremen).await?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    #[instrument(
        skip(self, plan),
        fields(
            batch_id = %plan.batch_id,
            withdrawals = plan.withdrawals.len(),
            reports = plan.reports.len()
        ),
        err
    )]
    async fn commit_issuance(&self, plan: &IssuancePlan) -> Result<(), StoreError> {
        let mut tx = self.begin("commit_issuance").await?;

        for name in &plan.workers {
            upsert_name(&mut tx, "workers", name).await?;
        }
        for name in &plan.foremen {
            upsert_name(&mut tx, "foremen", name).await?;
        }

        for w in &plan.withdrawals {
            let updated = sqlx::query(
                r#"
                UPDATE stock
                SET quantity = quantity - ?1
                WHERE item = ?2 AND item_type = ?3 AND size = ?4 AND quantity >= ?1
                "#,
            )
            .bind(w.quantity)
            .bind(&w.key.item)
            .bind(&w.key.item_type)
            .bind(&w.key.size)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("withdraw_stock", e))?;

            if updated.rows_affected() == 0 {
                let available = sqlx::query_scalar::<_, Option<i64>>(
                    "SELECT SUM(quantity) FROM stock WHERE item = ?1 AND item_type = ?2 AND size = ?3",
                )
                .bind(&w.key.item)
                .bind(&w.key.item_type)
                .bind(&w.key.size)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("withdraw_stock", e))?;

                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::StockChanged {
                    key: w.key.clone(),
                    requested: w.quantity,
                    available,
                });
            }
        }

        for r in &plan.reports {
            sqlx::query(
                r#"
                INSERT INTO report (
                    date,
                    worker_name,
                    foreman_name,
                    item,
                    item_type,
                    size,
                    quantity
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(r.date)
            .bind(&r.worker_name)
            .bind(&r.foreman_name)
            .bind(&r.item)
            .bind(&r.item_type)
            .bind(&r.size)
            .bind(r.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("append_report", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

async fn write_stock(
    tx: &mut Transaction<'static, Sqlite>,
    stock: &[StockEntry],
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM stock")
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("clear_stock", e))?;

    for entry in stock {
        sqlx::query(
            r#"
            INSERT INTO stock (item, item_type, size, quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&entry.item)
        .bind(&entry.item_type)
        .bind(&entry.size)
        .bind(entry.quantity)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateStock(entry.key())
            } else {
                map_sqlx_error("insert_stock", e)
            }
        })?;
    }
    Ok(())
}

/// `table` is one of the fixed people tables, never user input.
async fn write_names(
    tx: &mut Transaction<'static, Sqlite>,
    table: &'static str,
    names: &[String],
) -> Result<(), StoreError> {
    sqlx::query(&format!("DELETE FROM {table}"))
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("clear_names", e))?;

    for name in names {
        upsert_name(tx, table, name).await?;
    }
    Ok(())
}

async fn upsert_name(
    tx: &mut Transaction<'static, Sqlite>,
    table: &'static str,
    name: &str,
) -> Result<(), StoreError> {
    sqlx::query(&format!(
        "INSERT INTO {table} (name) VALUES (?1) ON CONFLICT(name) DO NOTHING"
    ))
    .bind(name)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("upsert_name", e))?;
    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::database(operation, db_err.message()),
        sqlx::Error::PoolClosed => StoreError::database(operation, "connection pool closed"),
        other => StoreError::database(operation, other.to_string()),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use workwear_core::BatchId;
    use workwear_inventory::Withdrawal;

    async fn store() -> SqliteInventoryStore {
        let pool = db::create_pool("sqlite::memory:").await.unwrap();
        db::ensure_schema(&pool).await.unwrap();
        SqliteInventoryStore::new(pool)
    }

    fn report(worker: &str, quantity: i64) -> ReportEntry {
        ReportEntry {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            worker_name: worker.to_string(),
            foreman_name: "Petro".to_string(),
            item: "T-shirt".to_string(),
            item_type: "Red".to_string(),
            size: "M".to_string(),
            quantity,
        }
    }

    fn red(size: &str) -> StockKey {
        StockKey::new("T-shirt", "Red", size)
    }

    #[tokio::test]
    async fn replace_then_read_back_in_insertion_order() {
        let store = store().await;
        let stock = vec![
            StockEntry::new("T-shirt", "Red", "M", 5),
            StockEntry::new("Cap", "", "S", 2),
        ];
        store.replace_stock(stock.clone()).await.unwrap();

        assert_eq!(store.stock().await.unwrap(), stock);
        assert_eq!(store.available(&red("M")).await.unwrap(), Some(5));
        assert_eq!(store.available(&red("XL")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_triples_are_rejected_without_partial_write() {
        let store = store().await;
        store
            .replace_stock(vec![StockEntry::new("Cap", "", "S", 1)])
            .await
            .unwrap();

        let err = store
            .replace_stock(vec![
                StockEntry::new("T-shirt", "Red", "M", 5),
                StockEntry::new("T-shirt", "Red", "M", 6),
            ])
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateStock(red("M")));
        assert_eq!(store.stock().await.unwrap(), vec![StockEntry::new("Cap", "", "S", 1)]);
    }

    #[tokio::test]
    async fn commit_issuance_applies_everything() {
        let store = store().await;
        store
            .replace_stock(vec![StockEntry::new("T-shirt", "Red", "M", 5)])
            .await
            .unwrap();

        let plan = IssuancePlan {
            batch_id: BatchId::new(),
            workers: vec!["Ivan".to_string()],
            foremen: vec!["Petro".to_string()],
            withdrawals: vec![Withdrawal { key: red("M"), quantity: 2 }],
            reports: vec![report("Ivan", 2)],
        };
        store.commit_issuance(&plan).await.unwrap();
        store.commit_issuance(&plan).await.unwrap();

        assert_eq!(store.available(&red("M")).await.unwrap(), Some(1));
        assert_eq!(store.workers().await.unwrap(), vec!["Ivan"]);
        assert_eq!(store.foremen().await.unwrap(), vec!["Petro"]);
        assert_eq!(store.reports().await.unwrap(), vec![report("Ivan", 2), report("Ivan", 2)]);
    }

    #[tokio::test]
    async fn overdrawing_commit_rolls_back() {
        let store = store().await;
        store
            .replace_stock(vec![
                StockEntry::new("T-shirt", "Red", "M", 5),
                StockEntry::new("T-shirt", "Red", "L", 1),
            ])
            .await
            .unwrap();

        let plan = IssuancePlan {
            batch_id: BatchId::new(),
            workers: vec!["Ivan".to_string()],
            foremen: vec!["Petro".to_string()],
            withdrawals: vec![
                Withdrawal { key: red("M"), quantity: 3 },
                Withdrawal { key: red("L"), quantity: 4 },
            ],
            reports: vec![report("Ivan", 3), report("Ivan", 4)],
        };

        let err = store.commit_issuance(&plan).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::StockChanged {
                key: red("L"),
                requested: 4,
                available: Some(1),
            }
        );
        assert_eq!(store.available(&red("M")).await.unwrap(), Some(5));
        assert!(store.workers().await.unwrap().is_empty());
        assert!(store.reports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_all_swaps_people_and_keeps_ledger() {
        let store = store().await;
        let plan = IssuancePlan {
            batch_id: BatchId::new(),
            workers: vec!["Ivan".to_string()],
            foremen: vec!["Petro".to_string()],
            withdrawals: vec![],
            reports: vec![report("Ivan", 1)],
        };
        store.commit_issuance(&plan).await.unwrap();

        store
            .replace_all(StoreSnapshot {
                stock: vec![StockEntry::new("Cap", "", "S", 3)],
                workers: vec!["Anna".to_string(), "Oleh".to_string()],
                foremen: vec!["Maria".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(store.workers().await.unwrap(), vec!["Anna", "Oleh"]);
        assert_eq!(store.foremen().await.unwrap(), vec!["Maria"]);
        assert_eq!(store.reports().await.unwrap().len(), 1);
    }
}
