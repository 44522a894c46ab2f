use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub image_url: String,
    pub affiliate_url: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a product or fully replacing an existing one.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductInput {
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

pub fn validate_positive_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("price must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// Raw listing parameters as they arrive on the query string. Price bounds
/// and sort inputs stay strings here so rejection happens in
/// [`ProductListParams::from_query`] with a message naming the field.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<i32>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Price,
    CategoryId,
    CreatedAt,
}

impl SortField {
    /// Column identifier interpolated into ORDER BY. Only these fixed
    /// strings ever reach the query text.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::CategoryId => "category_id",
            SortField::CreatedAt => "created_at",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(SortField::Id),
            "name" => Some(SortField::Name),
            "price" => Some(SortField::Price),
            "category_id" => Some(SortField::CategoryId),
            "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }
}

/// Validated listing parameters, safe to hand to the query builder.
#[derive(Debug, Clone)]
pub struct ProductListParams {
    pub page: i64,
    pub limit: i64,
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

fn parse_price_bound(field: &str, raw: &str) -> Result<Decimal> {
    let value: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative number", field)))?;

    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "{} must be a non-negative number",
            field
        )));
    }

    Ok(value)
}

impl ProductListParams {
    pub fn from_query(query: ProductListQuery) -> Result<Self> {
        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest(
                "page must be a positive integer".to_string(),
            ));
        }

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit < 1 {
            return Err(AppError::BadRequest(
                "limit must be a positive integer".to_string(),
            ));
        }
        let limit = limit.min(MAX_PAGE_SIZE);

        let min_price = match query.min_price.as_deref() {
            Some(raw) => Some(parse_price_bound("min_price", raw)?),
            None => None,
        };

        let max_price = match query.max_price.as_deref() {
            Some(raw) => Some(parse_price_bound("max_price", raw)?),
            None => None,
        };

        let sort_by = match query.sort_by.as_deref() {
            Some(raw) => SortField::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort field: {}", raw)))?,
            None => SortField::Id,
        };

        let order = match query.order.as_deref() {
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| {
                AppError::BadRequest(format!("order must be ASC or DESC, got {}", raw))
            })?,
            None => SortOrder::Asc,
        };

        Ok(Self {
            page,
            limit,
            category_id: query.category_id,
            min_price,
            max_price,
            sort_by,
            order,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let params = ProductListParams::from_query(ProductListQuery::default()).unwrap();

        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.sort_by, SortField::Id);
        assert_eq!(params.order, SortOrder::Asc);
        assert!(params.category_id.is_none());
        assert!(params.min_price.is_none());
        assert!(params.max_price.is_none());
    }

    #[test]
    fn offset_is_computed_from_page_and_limit() {
        let params = ProductListParams::from_query(ProductListQuery {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn limit_is_capped() {
        let params = ProductListParams::from_query(ProductListQuery {
            limit: Some(5000),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(params.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn non_positive_page_and_limit_are_rejected() {
        for query in [
            ProductListQuery {
                page: Some(0),
                ..Default::default()
            },
            ProductListQuery {
                limit: Some(-1),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                ProductListParams::from_query(query),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn non_numeric_price_bound_names_the_field() {
        let err = ProductListParams::from_query(ProductListQuery {
            min_price: Some("cheap".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("min_price")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn negative_price_bound_is_rejected() {
        let err = ProductListParams::from_query(ProductListQuery {
            max_price: Some("-3".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("max_price")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn valid_price_bounds_parse() {
        let params = ProductListParams::from_query(ProductListQuery {
            min_price: Some("1.50".to_string()),
            max_price: Some("99.99".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(params.min_price.unwrap(), "1.50".parse::<Decimal>().unwrap());
        assert_eq!(params.max_price.unwrap(), "99.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn sort_field_outside_allow_list_is_rejected() {
        let err = ProductListParams::from_query(ProductListQuery {
            sort_by: Some("price; DROP TABLE products".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn sort_order_is_case_insensitive() {
        for raw in ["desc", "DESC", "Desc"] {
            let params = ProductListParams::from_query(ProductListQuery {
                order: Some(raw.to_string()),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(params.order, SortOrder::Desc);
        }

        assert!(ProductListParams::from_query(ProductListQuery {
            order: Some("sideways".to_string()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn every_sort_field_maps_to_a_real_column() {
        for (raw, column) in [
            ("id", "id"),
            ("name", "name"),
            ("price", "price"),
            ("category_id", "category_id"),
            ("created_at", "created_at"),
        ] {
            let params = ProductListParams::from_query(ProductListQuery {
                sort_by: Some(raw.to_string()),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(params.sort_by.column(), column);
        }
    }

    fn valid_input() -> ProductInput {
        ProductInput {
            name: "Standing desk".to_string(),
            description: "Adjustable height desk".to_string(),
            price: "249.99".parse().unwrap(),
            category_id: 2,
            image_url: "https://cdn.example.com/desk.jpg".to_string(),
            affiliate_url: "https://shop.example.com/desk".to_string(),
            address: None,
        }
    }

    #[test]
    fn valid_product_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn product_input_rejects_bad_fields() {
        let mut input = valid_input();
        input.name = String::new();
        input.price = Decimal::ZERO;
        input.image_url = "not a url".to_string();

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("image_url"));
        assert!(!fields.contains_key("affiliate_url"));
    }

    #[test]
    fn product_input_rejects_non_positive_category() {
        let mut input = valid_input();
        input.category_id = 0;

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category_id"));
    }
}
