use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use workwear_infra::config::AppConfig;
use workwear_infra::db;
use workwear_infra::sheets::{google, GoogleWorksheet, Workbook, Worksheet};
use workwear_infra::store::{InventoryStore, SqliteInventoryStore};
use workwear_infra::{IssuanceProcessor, LookupService, ReconciliationEngine, StockGate};

pub type DynStore = Arc<dyn InventoryStore>;
pub type DynSheet = Arc<dyn Worksheet>;

/// Services shared by all handlers. One [`StockGate`] ties issuance and
/// reconciliation together.
pub struct AppServices {
    pub issuance: IssuanceProcessor<DynStore>,
    pub reconciliation: ReconciliationEngine<DynStore, DynSheet>,
    pub lookup: LookupService<DynStore>,
}

impl AppServices {
    pub fn new(store: DynStore, workbook: Workbook<DynSheet>) -> Self {
        let gate = StockGate::new();
        Self {
            issuance: IssuanceProcessor::new(store.clone(), gate.clone()),
            reconciliation: ReconciliationEngine::new(store.clone(), workbook, gate),
            lookup: LookupService::new(store),
        }
    }

    /// SQLite store plus the configured spreadsheet, or an in-memory workbook
    /// when no spreadsheet is configured.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let pool = db::create_pool(&config.database_url).await?;
        db::ensure_schema(&pool).await?;
        let store: DynStore = Arc::new(SqliteInventoryStore::new(pool));

        let workbook = match &config.sheets {
            Some(sheets) => {
                info!(spreadsheet_id = %sheets.spreadsheet_id, "using Google Sheets workbook");
                GoogleWorksheet::workbook(
                    reqwest_client()?,
                    google::DEFAULT_BASE_URL,
                    sheets,
                    &config.sheet_names,
                )
                .context("failed to configure spreadsheet client")?
                .map(|sheet| -> DynSheet { sheet })
            }
            None => {
                warn!("WORKWEAR_SPREADSHEET_ID not set; using an empty in-memory workbook");
                Workbook::in_memory(&config.sheet_names).map(|sheet| -> DynSheet { sheet })
            }
        };

        Ok(Self::new(store, workbook))
    }
}

fn reqwest_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")
}
