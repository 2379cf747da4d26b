use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};

use workwear_infra::SearchKind;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn get_foremen(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.lookup.foremen().await {
        Ok(foremen) => (StatusCode::OK, Json(json!({ "foremen": foremen }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `GET /search?q=..&type=name|foreman`: matching names as a JSON array.
pub async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::SearchQuery>,
) -> axum::response::Response {
    let kind: SearchKind = match query.kind.parse() {
        Ok(kind) => kind,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match services.lookup.search(&query.q, kind).await {
        Ok(names) => (StatusCode::OK, Json(names)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `GET /get_items_and_types`: picker data for the issuance form.
pub async fn get_items_and_types(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let catalog = match services.lookup.catalog().await {
        Ok(catalog) => catalog,
        Err(e) => return errors::service_error_to_response(e),
    };

    let mut items_and_types = Map::new();
    let mut items_sizes = Map::new();
    for item in catalog.items() {
        items_and_types.insert(item.item.clone(), json!(catalog.types_of(&item.item)));

        let sizes: Map<String, Value> = item
            .types
            .iter()
            .map(|t| (t.item_type.clone(), json!(t.sizes)))
            .collect();
        items_sizes.insert(item.item.clone(), Value::Object(sizes));
    }

    (
        StatusCode::OK,
        Json(json!({
            "items_and_types": items_and_types,
            "items_sizes": items_sizes,
        })),
    )
        .into_response()
}
