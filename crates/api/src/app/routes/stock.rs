use std::sync::Arc;

use axum::extract::Extension;

use crate::app::errors;
use crate::app::services::AppServices;

/// `GET /load_stock`: stock worksheet → store.
pub async fn load_stock(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reconciliation.pull_stock().await {
        Ok(()) => errors::success(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `GET /load_all_data`: stock and people worksheets → store.
pub async fn load_all_data(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reconciliation.pull().await {
        Ok(()) => errors::success(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `POST /download_stock`: store → stock worksheet.
pub async fn download_stock(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reconciliation.push_stock().await {
        Ok(()) => errors::success(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `POST /download_all_data`: store → stock and report worksheets.
pub async fn download_all_data(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reconciliation.push().await {
        Ok(()) => errors::success(),
        Err(e) => errors::service_error_to_response(e),
    }
}
