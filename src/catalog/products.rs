//! Product store.

use chrono::Utc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::{validate_name, validate_price, validate_slug};
use crate::catalog::{integrity, slug::generate_slug};
use crate::db::{
    serialize_json, serialize_json_list, CreateProductRequest, DbPool, Product, ProductListQuery,
    UpdateProductRequest,
};

pub async fn list(pool: &DbPool, query: &ProductListQuery) -> Result<Vec<Product>, ApiError> {
    let mut sql = String::from("SELECT * FROM products WHERE 1=1");
    if query.brand.is_some() {
        sql.push_str(" AND brand = ?");
    }
    if query.color.is_some() {
        sql.push_str(" AND color = ?");
    }
    if query.model_code.is_some() {
        sql.push_str(" AND model_code = ?");
    }
    if query.scale.is_some() {
        sql.push_str(" AND scale = ?");
    }
    if query.min_price.is_some() {
        sql.push_str(" AND price >= ?");
    }
    if query.max_price.is_some() {
        sql.push_str(" AND price <= ?");
    }
    if query.out_of_stock.is_some() {
        sql.push_str(" AND out_of_stock = ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut q = sqlx::query_as::<_, Product>(&sql);
    if let Some(ref brand) = query.brand {
        q = q.bind(brand);
    }
    if let Some(ref color) = query.color {
        q = q.bind(color);
    }
    if let Some(ref model_code) = query.model_code {
        q = q.bind(model_code);
    }
    if let Some(ref scale) = query.scale {
        q = q.bind(scale);
    }
    if let Some(min) = query.min_price {
        q = q.bind(min);
    }
    if let Some(max) = query.max_price {
        q = q.bind(max);
    }
    if let Some(oos) = query.out_of_stock {
        q = q.bind(oos);
    }

    Ok(q.fetch_all(pool).await?)
}

pub async fn get(pool: &DbPool, id: &str) -> Result<Product, ApiError> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product with id {} not found", id)))?;
    Ok(product)
}

pub async fn get_by_slug(pool: &DbPool, slug: &str) -> Result<Product, ApiError> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product with slug {} not found", slug)))?;
    Ok(product)
}

pub async fn create(pool: &DbPool, req: CreateProductRequest) -> Result<Product, ApiError> {
    validate_name(&req.name).map_err(ApiError::bad_request)?;
    validate_price(req.price).map_err(ApiError::bad_request)?;

    integrity::ensure_brand_exists(pool, &req.brand).await?;

    let slug = match req.slug {
        Some(ref s) => {
            validate_slug(s).map_err(ApiError::bad_request)?;
            s.clone()
        }
        None => {
            let derived = generate_slug(&req.name);
            if derived.is_empty() {
                return Err(ApiError::bad_request(
                    "Product name is required to generate slug",
                ));
            }
            derived
        }
    };

    integrity::ensure_slug_available(pool, "products", "Product", &slug, None).await?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let media = serialize_json_list(req.media.as_deref().unwrap_or(&[]));
    let social_links = serialize_json(req.social_links.as_ref());
    let technical_specs = serialize_json_list(req.technical_specs.as_deref().unwrap_or(&[]));

    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, brand, color, model_code, scale, out_of_stock, price,
            slug, media, social_links, technical_specs, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.brand)
    .bind(&req.color)
    .bind(&req.model_code)
    .bind(&req.scale)
    .bind(req.out_of_stock.unwrap_or(false))
    .bind(req.price)
    .bind(&slug)
    .bind(&media)
    .bind(&social_links)
    .bind(&technical_specs)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get(pool, &id).await
}

pub async fn update(
    pool: &DbPool,
    id: &str,
    req: UpdateProductRequest,
) -> Result<Product, ApiError> {
    let product = get(pool, id).await?;

    if let Some(ref name) = req.name {
        validate_name(name).map_err(ApiError::bad_request)?;
    }
    if let Some(price) = req.price {
        validate_price(price).map_err(ApiError::bad_request)?;
    }
    if let Some(ref brand) = req.brand {
        if brand != &product.brand {
            integrity::ensure_brand_exists(pool, brand).await?;
        }
    }
    if let Some(ref slug) = req.slug {
        validate_slug(slug).map_err(ApiError::bad_request)?;
        if slug != &product.slug {
            integrity::ensure_slug_available(pool, "products", "Product", slug, Some(id)).await?;
        }
    }

    let now = Utc::now().to_rfc3339();
    let media = req.media.as_ref().and_then(|m| serde_json::to_string(m).ok());
    let social_links = req
        .social_links
        .as_ref()
        .and_then(|s| serde_json::to_string(s).ok());
    let technical_specs = req
        .technical_specs
        .as_ref()
        .and_then(|t| serde_json::to_string(t).ok());

    sqlx::query(
        r#"
        UPDATE products SET
            name = COALESCE(?, name),
            brand = COALESCE(?, brand),
            color = COALESCE(?, color),
            model_code = COALESCE(?, model_code),
            scale = COALESCE(?, scale),
            out_of_stock = COALESCE(?, out_of_stock),
            price = COALESCE(?, price),
            slug = COALESCE(?, slug),
            media = COALESCE(?, media),
            social_links = COALESCE(?, social_links),
            technical_specs = COALESCE(?, technical_specs),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.brand)
    .bind(&req.color)
    .bind(&req.model_code)
    .bind(&req.scale)
    .bind(req.out_of_stock)
    .bind(req.price)
    .bind(&req.slug)
    .bind(&media)
    .bind(&social_links)
    .bind(&technical_specs)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Delete a product, first detaching its id from every accessory and spare
/// part that declares compatibility with it
pub async fn delete(pool: &DbPool, id: &str) -> Result<(), ApiError> {
    let product = get(pool, id).await?;

    integrity::detach_product_references(pool, &product.id).await?;

    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(&product.id)
        .execute(pool)
        .await?;

    Ok(())
}
