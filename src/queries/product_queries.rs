use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Product, ProductInput, ProductListParams},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Assemble the listing statement from validated parameters. Filter binds
/// land in clause order, then limit, then offset. The ORDER BY identifiers
/// come from the `SortField`/`SortOrder` enums, never from caller text.
pub(crate) fn build_list_query(params: &ProductListParams) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

    // category
    if let Some(category_id) = params.category_id {
        query.push(" AND category_id = ");
        query.push_bind(category_id);
    }

    // price range
    if let Some(min_price) = params.min_price {
        query.push(" AND price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND price <= ");
        query.push_bind(max_price);
    }

    // sort
    query.push(format!(
        " ORDER BY {} {}",
        params.sort_by.column(),
        params.order.keyword()
    ));

    // pagination
    query.push(" LIMIT ");
    query.push_bind(params.limit);
    query.push(" OFFSET ");
    query.push_bind(params.offset());

    query
}

pub async fn list(pool: &PgPool, params: ProductListParams) -> Result<Vec<Product>> {
    let mut query = build_list_query(&params);

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

/// Case-insensitive substring match over name and description.
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<Product>> {
    let pattern = format!("%{}%", term);

    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products
         WHERE name ILIKE $1 OR description ILIKE $1
         ORDER BY id ASC",
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_category(pool: &PgPool, category_id: i32) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE category_id = $1")
        .bind(category_id)
        .fetch_all(pool)
        .await?;

    Ok(products)
}

pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, description, price, category_id, image_url, affiliate_url, address)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(&input.image_url)
    .bind(&input.affiliate_url)
    .bind(&input.address)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Full replacement of every mutable field.
pub async fn update(pool: &PgPool, id: i32, input: &ProductInput) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $1, description = $2, price = $3, category_id = $4,
             image_url = $5, affiliate_url = $6, address = $7, updated_at = NOW()
         WHERE id = $8
         RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(&input.image_url)
    .bind(&input.affiliate_url)
    .bind(&input.address)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductListQuery;

    fn params(query: ProductListQuery) -> ProductListParams {
        ProductListParams::from_query(query).unwrap()
    }

    #[test]
    fn bare_listing_orders_and_paginates() {
        let query = build_list_query(&params(ProductListQuery::default()));

        assert_eq!(
            query.into_sql(),
            "SELECT * FROM products WHERE 1=1 ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn filters_are_appended_conjunctively_in_order() {
        let query = build_list_query(&params(ProductListQuery {
            category_id: Some(3),
            min_price: Some("1.50".to_string()),
            max_price: Some("20".to_string()),
            ..Default::default()
        }));

        assert_eq!(
            query.into_sql(),
            "SELECT * FROM products WHERE 1=1 \
             AND category_id = $1 AND price >= $2 AND price <= $3 \
             ORDER BY id ASC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn single_bound_is_applied_independently() {
        let query = build_list_query(&params(ProductListQuery {
            max_price: Some("9.99".to_string()),
            ..Default::default()
        }));

        let sql = query.into_sql();
        assert!(sql.contains("AND price <= $1"));
        assert!(!sql.contains("price >="));
        assert!(!sql.contains("category_id ="));
    }

    #[test]
    fn sort_field_and_order_are_interpolated_from_the_enums() {
        let query = build_list_query(&params(ProductListQuery {
            sort_by: Some("price".to_string()),
            order: Some("desc".to_string()),
            ..Default::default()
        }));

        assert!(query.into_sql().contains("ORDER BY price DESC"));
    }

    #[test]
    fn pagination_binds_follow_the_filter_binds() {
        let query = build_list_query(&params(ProductListQuery {
            page: Some(4),
            limit: Some(25),
            category_id: Some(1),
            ..Default::default()
        }));

        // $1 = category, $2 = limit, $3 = offset
        assert_eq!(
            query.into_sql(),
            "SELECT * FROM products WHERE 1=1 \
             AND category_id = $1 ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
    }
}
