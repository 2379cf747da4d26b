use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use workwear_core::{DomainError, IssuanceRequest};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// `POST /submit`: issue every line of the form, or none of them.
pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SubmitRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    if body.data.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, DomainError::EmptyBatch.to_string());
    }

    let batch = match body
        .data
        .into_iter()
        .enumerate()
        .map(|(line, dto)| dto.into_request(line))
        .collect::<Result<Vec<IssuanceRequest>, _>>()
    {
        Ok(batch) => batch,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match services.issuance.process(batch).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "batch_id": receipt.batch_id.to_string(),
                "lines": receipt.lines,
                "total_quantity": receipt.total_quantity,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
