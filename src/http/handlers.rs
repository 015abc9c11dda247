//! Route handlers over the static catalog.
//!
//! All responses are JSON; internal faults never leak detail to the client.

use axum::extract::{Path, Query};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::catalog;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "Guest".to_string()
}

/// Homepage: greeting plus the full product list.
pub async fn home(Query(query): Query<HomeQuery>) -> Json<serde_json::Value> {
    tracing::info!(name = %query.name, "Processing homepage request");
    Json(json!({
        "greeting": format!("Welcome, {}!", query.name),
        "products": catalog::all(),
    }))
}

/// Product details by id.
pub async fn product_detail(Path(id): Path<u32>) -> Response {
    tracing::info!(product_id = id, "Fetching product");
    match catalog::find(id) {
        Some(product) => Json(product).into_response(),
        None => {
            tracing::warn!(product_id = id, "Product not found");
            product_not_found()
        }
    }
}

/// Add a product to the cart. Rate limited per client.
pub async fn add_to_cart(Path(id): Path<u32>) -> Response {
    match catalog::find(id) {
        Some(product) => {
            tracing::info!(product_id = id, product = %product.name, "Product added to cart");
            Json(json!({ "message": format!("Added {} to cart!", product.name) })).into_response()
        }
        None => {
            tracing::warn!(product_id = id, "Add to cart failed: product not found");
            product_not_found()
        }
    }
}

/// Catch-all for undefined routes.
pub async fn not_found(uri: Uri) -> Response {
    tracing::warn!(path = %uri.path(), "Undefined route accessed");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}

fn product_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "product not found" })),
    )
        .into_response()
}
