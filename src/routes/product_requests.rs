use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{DecideRequest, ProductRequest, RequestStatus, SubmitProductRequest},
    queries::product_request_queries,
    utils::extractors::ValidatedJson,
};

pub async fn submit_request(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SubmitProductRequest>,
) -> Result<Json<ProductRequest>> {
    let request = product_request_queries::create(&state.db, &input).await?;

    Ok(Json(request))
}

pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<ProductRequest>>> {
    let requests = product_request_queries::get_all(&state.db).await?;

    Ok(Json(requests))
}

pub async fn decide_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<DecideRequest>,
) -> Result<Json<Value>> {
    let decision = RequestStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(format!(
            "status must be approved or rejected, got {}",
            payload.status
        ))
    })?;

    product_request_queries::decide(&state.db, id, decision).await?;

    let message = match decision {
        RequestStatus::Approved => "Product request approved and product created",
        RequestStatus::Rejected => "Product request rejected",
    };

    Ok(Json(json!({ "message": message })))
}
