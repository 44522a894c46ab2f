use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Product, ProductInput, ProductListParams, ProductListQuery, SearchQuery},
    queries::product_queries,
    utils::extractors::ValidatedJson,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let params = ProductListParams::from_query(query)?;
    let products = product_queries::list(&state.db, params).await?;

    Ok(Json(products))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let term = query
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("query parameter is required".to_string()))?;

    let products = product_queries::search(&state.db, &term).await?;

    Ok(Json(products))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<Product>>> {
    let products = product_queries::find_by_category(&state.db, category_id).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = product_queries::create(&state.db, &input).await?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = product_queries::update(&state.db, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(product))
}

// Deletion reports success whether or not a row matched.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    product_queries::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Product deleted" })))
}
