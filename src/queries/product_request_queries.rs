use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{ProductRequest, RequestStatus, STATUS_PENDING, SubmitProductRequest},
};

pub async fn create(pool: &PgPool, input: &SubmitProductRequest) -> Result<ProductRequest> {
    let request = sqlx::query_as::<_, ProductRequest>(
        "INSERT INTO product_requests
             (user_id, name, description, price, category_id, image_url, affiliate_url, address, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(input.user_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(&input.image_url)
    .bind(&input.affiliate_url)
    .bind(&input.address)
    .bind(STATUS_PENDING)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<ProductRequest>> {
    let requests = sqlx::query_as::<_, ProductRequest>("SELECT * FROM product_requests ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(requests)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductRequest>> {
    let request = sqlx::query_as::<_, ProductRequest>("SELECT * FROM product_requests WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(request)
}

/// Apply an admin decision to a pending request. The row lock, the product
/// insert on approval and the status update commit or roll back together.
pub async fn decide(pool: &PgPool, id: i32, decision: RequestStatus) -> Result<ProductRequest> {
    let mut tx = pool.begin().await?;

    let request = sqlx::query_as::<_, ProductRequest>(
        "SELECT * FROM product_requests WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product request {} not found", id)))?;

    if request.status != STATUS_PENDING {
        return Err(AppError::Conflict(format!(
            "Product request {} is already {}",
            id, request.status
        )));
    }

    if decision == RequestStatus::Approved {
        sqlx::query(
            "INSERT INTO products (name, description, price, category_id, image_url, affiliate_url, address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.category_id)
        .bind(&request.image_url)
        .bind(&request.affiliate_url)
        .bind(&request.address)
        .execute(&mut *tx)
        .await?;
    }

    let updated = sqlx::query_as::<_, ProductRequest>(
        "UPDATE product_requests SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(decision.as_str())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Product request {} {}", id, updated.status);

    Ok(updated)
}
