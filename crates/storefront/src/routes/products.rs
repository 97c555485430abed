//! Product catalog route handlers (JSON API).
//!
//! These endpoints mutate the shared catalog and are unauthenticated.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use dendy_food_core::{Product, ProductId, ProductInput};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Turn a body that failed to decode into a 400.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// List every product.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_products().await?))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get_product(&ProductId::new(id)).await?))
}

/// Create a product. The server assigns the id.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input = json_body(payload)?;
    let product = state.catalog().create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields, keeping its id.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>> {
    let input = json_body(payload)?;
    let product = state
        .catalog()
        .update_product(&ProductId::new(id), input)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.catalog().delete_product(&ProductId::new(id)).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}
