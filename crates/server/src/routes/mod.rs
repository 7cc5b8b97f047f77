pub mod download;
pub mod health;
pub mod metrics;
pub mod process;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Build the dataset routes
pub fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/process", post(process::process))
        .route("/download/{file_id}", get(download::download))
        .route("/template", get(download::template))
}
