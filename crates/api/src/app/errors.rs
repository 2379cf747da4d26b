use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use workwear_infra::ServiceError;

/// Message returned for failures whose detail stays in the logs.
const INTERNAL_MESSAGE: &str = "The operation could not be completed; please retry later.";

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    if err.is_client_error() {
        return json_error(StatusCode::BAD_REQUEST, err.to_string());
    }

    error!(error = %err, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "status": "failure",
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn success() -> axum::response::Response {
    (StatusCode::OK, axum::Json(json!({ "status": "success" }))).into_response()
}
