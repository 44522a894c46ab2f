mod categories;
mod health;
mod product_requests;
mod products;

use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/search", get(products::search_products))
        .route(
            "/products/category/{category_id}",
            get(products::products_by_category),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/categories", get(categories::list_categories))
        .route(
            "/product-requests",
            get(product_requests::list_requests).post(product_requests::submit_request),
        )
        .route(
            "/product-requests/{id}",
            put(product_requests::decide_request),
        )
}
