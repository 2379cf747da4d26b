use axum::{
    routing::{get, post},
    Router,
};

pub mod issuance;
pub mod lookup;
pub mod stock;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/submit", post(issuance::submit))
        .route("/get_foremen", get(lookup::get_foremen))
        .route("/search", get(lookup::search))
        .route("/get_items_and_types", get(lookup::get_items_and_types))
        .route("/load_stock", get(stock::load_stock))
        .route("/load_all_data", get(stock::load_all_data))
        .route("/download_stock", post(stock::download_stock))
        .route("/download_all_data", post(stock::download_all_data))
}
