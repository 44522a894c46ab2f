pub mod category_queries;
pub mod product_queries;
pub mod product_request_queries;
