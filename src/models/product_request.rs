use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::validate_positive_price;

pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRequest {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub image_url: String,
    pub affiliate_url: String,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for submitting a product request. Same field set as a product,
/// plus the submitting user.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitProductRequest {
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: i32,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(custom(function = validate_positive_price))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "category_id must be a positive integer"))]
    pub category_id: i32,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: String,
    #[validate(url(message = "affiliate_url must be a valid URL"))]
    pub affiliate_url: String,
    pub address: Option<String>,
}

/// Admin disposition of a request. Only these two values are accepted;
/// `pending` is not a valid decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub status: String,
}
