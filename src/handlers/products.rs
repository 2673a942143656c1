use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    error::{AppError, AppResult},
    models::{CreateProduct, Product, UpdateProduct},
    AppState,
};

fn product_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    let Path(id) = path.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    if id < 1 {
        return Err(AppError::BadRequest(
            "product id must be a positive integer".to_string(),
        ));
    }
    Ok(id)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(value) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(value)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    info!("Retrieving all products");
    let products = state.products.get_all().await?;
    Ok(Json(products))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

/// Responds `200 null` when the product does not exist.
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Option<Product>>> {
    let id = product_id(path)?;
    info!(id, "Retrieving product details");
    let product = state.products.get_by_id(id).await?;
    Ok(Json(product))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    info!("Creating a new product");
    let product = state.products.add(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let id = product_id(path)?;
    let product = state
        .products
        .update(id, body(payload)?)
        .await
        .inspect_err(|err| error!(id, error = %err, "Could not update product"))?;
    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Value>> {
    let id = product_id(path)?;
    state
        .products
        .delete(id)
        .await
        .inspect_err(|err| error!(id, error = %err, "Could not delete product"))?;
    Ok(Json(json!({ "message": "Product deleted" })))
}
