//! Accessory and spare-part store, parameterized by [`PartKind`].
//!
//! The two entities share one schema and one write path; only the table
//! differs. `out_of_stock` is derived from `stock` on every write that
//! touches it and never taken from the client.

use chrono::Utc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::{
    validate_name, validate_price, validate_sku, validate_slug, validate_stock, validate_uuid,
};
use crate::catalog::{integrity, products, slug::generate_slug};
use crate::db::{
    parse_json_list, serialize_json, serialize_json_list, CreatePartRequest, DbPool, Part,
    PartKind, PartListQuery, UpdatePartRequest,
};

pub async fn list(
    pool: &DbPool,
    kind: PartKind,
    query: &PartListQuery,
) -> Result<Vec<Part>, ApiError> {
    let mut sql = format!("SELECT * FROM {} WHERE 1=1", kind.table());
    if query.brand.is_some() {
        sql.push_str(" AND brand = ?");
    }
    if query.sku.is_some() {
        sql.push_str(" AND sku = ?");
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
    if query.category.is_some() {
        sql.push_str(" AND categories LIKE ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut q = sqlx::query_as::<_, Part>(&sql);
    if let Some(ref brand) = query.brand {
        q = q.bind(brand);
    }
    if let Some(ref sku) = query.sku {
        q = q.bind(sku);
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
    if let Some(ref category) = query.category {
        q = q.bind(format!("%\"{}\"%", category));
    }

    Ok(q.fetch_all(pool).await?)
}

pub async fn get(pool: &DbPool, kind: PartKind, id: &str) -> Result<Part, ApiError> {
    if validate_uuid(id, "id").is_err() {
        return Err(ApiError::bad_request(format!(
            "Invalid {} ID: {}",
            kind.label().to_lowercase(),
            id
        )));
    }

    let part = sqlx::query_as::<_, Part>(&format!("SELECT * FROM {} WHERE id = ?", kind.table()))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("{} with ID {} not found", kind.label(), id))
        })?;
    Ok(part)
}

pub async fn get_by_slug(pool: &DbPool, kind: PartKind, slug: &str) -> Result<Part, ApiError> {
    let part = sqlx::query_as::<_, Part>(&format!("SELECT * FROM {} WHERE slug = ?", kind.table()))
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("{} with slug {} not found", kind.label(), slug))
        })?;
    Ok(part)
}

/// All parts of this kind declaring compatibility with the given product.
/// Fails with `NotFound` when the product itself is absent.
pub async fn find_for_product(
    pool: &DbPool,
    kind: PartKind,
    product_id: &str,
) -> Result<Vec<Part>, ApiError> {
    if validate_uuid(product_id, "product id").is_err() {
        return Err(ApiError::bad_request(format!(
            "Invalid product ID: {}",
            product_id
        )));
    }

    products::get(pool, product_id).await?;

    let candidates = sqlx::query_as::<_, Part>(&format!(
        "SELECT * FROM {} WHERE compatible_product_ids LIKE ? ORDER BY created_at DESC",
        kind.table()
    ))
    .bind(format!("%{}%", product_id))
    .fetch_all(pool)
    .await?;

    // LIKE narrows the scan; exact membership is decided on the parsed list
    Ok(candidates
        .into_iter()
        .filter(|part| {
            parse_json_list::<String>(part.compatible_product_ids.as_deref())
                .iter()
                .any(|id| id == product_id)
        })
        .collect())
}

pub async fn create(pool: &DbPool, kind: PartKind, req: CreatePartRequest) -> Result<Part, ApiError> {
    validate_name(&req.name).map_err(ApiError::bad_request)?;
    validate_sku(&req.sku).map_err(ApiError::bad_request)?;
    validate_price(req.price).map_err(ApiError::bad_request)?;
    let stock = req.stock.unwrap_or(0);
    validate_stock(stock).map_err(ApiError::bad_request)?;
    if req.categories.is_empty() {
        return Err(ApiError::bad_request("At least one category is required"));
    }
    if req.description.trim().is_empty() {
        return Err(ApiError::bad_request("Description is required"));
    }

    integrity::ensure_brand_exists(pool, &req.brand).await?;

    let slug = match req.slug {
        Some(ref s) => {
            validate_slug(s).map_err(ApiError::bad_request)?;
            s.clone()
        }
        None => {
            let derived = generate_slug(&req.name);
            if derived.is_empty() {
                return Err(ApiError::bad_request(format!(
                    "{} name is required to generate slug",
                    kind.label()
                )));
            }
            derived
        }
    };

    integrity::ensure_slug_available(pool, kind.table(), kind.label(), &slug, None).await?;
    integrity::ensure_sku_available(pool, kind.table(), kind.label(), &req.sku, None).await?;

    if let Some(ref ids) = req.compatible_product_ids {
        integrity::ensure_products_exist(pool, ids).await?;
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let out_of_stock = integrity::stock_status(stock);
    let categories = serde_json::to_string(&req.categories)
        .map_err(|e| ApiError::internal(format!("Failed to encode categories: {}", e)))?;
    let compatible = serialize_json_list(req.compatible_product_ids.as_deref().unwrap_or(&[]));
    let media = serialize_json_list(req.media.as_deref().unwrap_or(&[]));
    let dimensions = serialize_json(req.dimensions.as_ref());

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (
            id, name, slug, sku, price, stock, out_of_stock, categories,
            compatible_product_ids, brand, description, media, weight,
            dimensions, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        kind.table()
    ))
    .bind(&id)
    .bind(&req.name)
    .bind(&slug)
    .bind(&req.sku)
    .bind(req.price)
    .bind(stock)
    .bind(out_of_stock)
    .bind(&categories)
    .bind(&compatible)
    .bind(&req.brand)
    .bind(&req.description)
    .bind(&media)
    .bind(req.weight)
    .bind(&dimensions)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get(pool, kind, &id).await
}

pub async fn update(
    pool: &DbPool,
    kind: PartKind,
    id: &str,
    req: UpdatePartRequest,
) -> Result<Part, ApiError> {
    let part = get(pool, kind, id).await?;

    if let Some(ref name) = req.name {
        validate_name(name).map_err(ApiError::bad_request)?;
    }
    if let Some(price) = req.price {
        validate_price(price).map_err(ApiError::bad_request)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock).map_err(ApiError::bad_request)?;
    }
    if let Some(ref categories) = req.categories {
        if categories.is_empty() {
            return Err(ApiError::bad_request("At least one category is required"));
        }
    }

    if let Some(ref sku) = req.sku {
        validate_sku(sku).map_err(ApiError::bad_request)?;
        if sku != &part.sku {
            integrity::ensure_sku_available(pool, kind.table(), kind.label(), sku, Some(id)).await?;
        }
    }
    if let Some(ref brand) = req.brand {
        if brand != &part.brand {
            integrity::ensure_brand_exists(pool, brand).await?;
        }
    }
    if let Some(ref slug) = req.slug {
        validate_slug(slug).map_err(ApiError::bad_request)?;
        if slug != &part.slug {
            integrity::ensure_slug_available(pool, kind.table(), kind.label(), slug, Some(id))
                .await?;
        }
    }
    if let Some(ref ids) = req.compatible_product_ids {
        integrity::ensure_products_exist(pool, ids).await?;
    }

    let now = Utc::now().to_rfc3339();
    // Stock drives the flag; an update that leaves stock alone leaves the
    // flag alone too
    let out_of_stock = req.stock.map(integrity::stock_status);
    let categories = req
        .categories
        .as_ref()
        .and_then(|c| serde_json::to_string(c).ok());
    let compatible = req
        .compatible_product_ids
        .as_ref()
        .and_then(|c| serde_json::to_string(c).ok());
    let media = req.media.as_ref().and_then(|m| serde_json::to_string(m).ok());
    let dimensions = req
        .dimensions
        .as_ref()
        .and_then(|d| serde_json::to_string(d).ok());

    sqlx::query(&format!(
        r#"
        UPDATE {} SET
            name = COALESCE(?, name),
            slug = COALESCE(?, slug),
            sku = COALESCE(?, sku),
            price = COALESCE(?, price),
            stock = COALESCE(?, stock),
            out_of_stock = COALESCE(?, out_of_stock),
            categories = COALESCE(?, categories),
            compatible_product_ids = COALESCE(?, compatible_product_ids),
            brand = COALESCE(?, brand),
            description = COALESCE(?, description),
            media = COALESCE(?, media),
            weight = COALESCE(?, weight),
            dimensions = COALESCE(?, dimensions),
            updated_at = ?
        WHERE id = ?
        "#,
        kind.table()
    ))
    .bind(&req.name)
    .bind(&req.slug)
    .bind(&req.sku)
    .bind(req.price)
    .bind(req.stock)
    .bind(out_of_stock)
    .bind(&categories)
    .bind(&compatible)
    .bind(&req.brand)
    .bind(&req.description)
    .bind(&media)
    .bind(req.weight)
    .bind(&dimensions)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, kind, id).await
}

pub async fn delete(pool: &DbPool, kind: PartKind, id: &str) -> Result<(), ApiError> {
    let part = get(pool, kind, id).await?;

    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
        .bind(&part.id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;
    use crate::catalog::brands;
    use crate::db::{test_pool, CreateBrandRequest, CreateProductRequest};

    async fn seed_brand(pool: &DbPool, name: &str) {
        brands::create(
            pool,
            CreateBrandRequest {
                name: name.to_string(),
                logo: "https://cdn.example.com/logo.png".to_string(),
            },
        )
        .await
        .unwrap();
    }

    async fn seed_product(pool: &DbPool, name: &str) -> String {
        products::create(
            pool,
            CreateProductRequest {
                name: name.to_string(),
                brand: "Acme".to_string(),
                color: "red".to_string(),
                model_code: "AR1".to_string(),
                scale: "1:18".to_string(),
                price: 25.0,
                slug: None,
                out_of_stock: None,
                media: None,
                social_links: None,
                technical_specs: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn request(name: &str, sku: &str) -> CreatePartRequest {
        CreatePartRequest {
            name: name.to_string(),
            slug: None,
            sku: sku.to_string(),
            price: 12.5,
            stock: Some(4),
            categories: vec!["cases".to_string()],
            compatible_product_ids: None,
            brand: "Acme".to_string(),
            description: "A display case".to_string(),
            media: None,
            weight: 0.4,
            dimensions: None,
        }
    }

    async fn count(pool: &DbPool, kind: PartKind) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", kind.table()))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_stock_flag() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;

        let part = create(&pool, PartKind::Accessory, request("Display Case", "AC-1"))
            .await
            .unwrap();
        assert_eq!(part.slug, "display-case");
        assert!(!part.out_of_stock);

        let mut empty = request("Empty Shelf", "AC-2");
        empty.stock = None;
        let part = create(&pool, PartKind::Accessory, empty).await.unwrap();
        assert_eq!(part.stock, 0);
        assert!(part.out_of_stock);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected_and_nothing_persisted() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        create(&pool, PartKind::SparePart, request("Wing Mirror", "SP-1"))
            .await
            .unwrap();

        let err = create(&pool, PartKind::SparePart, request("Other Mirror", "SP-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert!(err.message().contains("SKU"));
        assert_eq!(count(&pool, PartKind::SparePart).await, 1);
    }

    #[tokio::test]
    async fn test_sku_unique_per_table_not_across_tables() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        create(&pool, PartKind::Accessory, request("Display Case", "X-1"))
            .await
            .unwrap();

        // Same SKU on a spare part is a different namespace
        assert!(create(&pool, PartKind::SparePart, request("Wing Mirror", "X-1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unknown_compatible_product_aborts_create() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;

        let mut req = request("Display Case", "AC-1");
        req.compatible_product_ids = Some(vec![uuid::Uuid::new_v4().to_string()]);
        let err = create(&pool, PartKind::Accessory, req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert!(err.message().contains("not found"));
        assert_eq!(count(&pool, PartKind::Accessory).await, 0);

        let mut req = request("Display Case", "AC-1");
        req.compatible_product_ids = Some(vec!["not-a-uuid".to_string()]);
        let err = create(&pool, PartKind::Accessory, req).await.unwrap_err();
        assert!(err.message().contains("Invalid product ID"));
    }

    #[tokio::test]
    async fn test_empty_categories_rejected() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;

        let mut req = request("Display Case", "AC-1");
        req.categories = vec![];
        let err = create(&pool, PartKind::Accessory, req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_update_recomputes_stock_flag() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        let part = create(&pool, PartKind::Accessory, request("Display Case", "AC-1"))
            .await
            .unwrap();
        assert!(!part.out_of_stock);

        let updated = update(
            &pool,
            PartKind::Accessory,
            &part.id,
            UpdatePartRequest {
                stock: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(updated.out_of_stock);

        let updated = update(
            &pool,
            PartKind::Accessory,
            &part.id,
            UpdatePartRequest {
                stock: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.out_of_stock);
        // Untouched fields keep their values
        assert_eq!(updated.sku, "AC-1");
        assert_eq!(updated.description, "A display case");
    }

    #[tokio::test]
    async fn test_update_sku_uniqueness_excludes_self() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        let a = create(&pool, PartKind::Accessory, request("Display Case", "AC-1"))
            .await
            .unwrap();
        create(&pool, PartKind::Accessory, request("Stand", "AC-2"))
            .await
            .unwrap();

        // Keeping its own SKU is fine
        assert!(update(
            &pool,
            PartKind::Accessory,
            &a.id,
            UpdatePartRequest {
                sku: Some("AC-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .is_ok());

        // Taking another part's SKU is not
        let err = update(
            &pool,
            PartKind::Accessory,
            &a.id,
            UpdatePartRequest {
                sku: Some("AC-2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_find_for_product() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        let product_id = seed_product(&pool, "Acme Racer").await;
        let other_id = seed_product(&pool, "Acme Tourer").await;

        let mut fits = request("Display Case", "AC-1");
        fits.compatible_product_ids = Some(vec![product_id.clone()]);
        create(&pool, PartKind::Accessory, fits).await.unwrap();

        let mut other = request("Stand", "AC-2");
        other.compatible_product_ids = Some(vec![other_id]);
        create(&pool, PartKind::Accessory, other).await.unwrap();

        let found = find_for_product(&pool, PartKind::Accessory, &product_id)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Display Case");

        let err = find_for_product(&pool, PartKind::Accessory, &uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_category_filter() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;

        let mut cases = request("Display Case", "AC-1");
        cases.categories = vec!["cases".to_string(), "display".to_string()];
        create(&pool, PartKind::Accessory, cases).await.unwrap();

        let mut tools = request("Polish Kit", "AC-2");
        tools.categories = vec!["care".to_string()];
        create(&pool, PartKind::Accessory, tools).await.unwrap();

        let found = list(
            &pool,
            PartKind::Accessory,
            &PartListQuery {
                category: Some("display".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Display Case");

        let out = list(
            &pool,
            PartKind::Accessory,
            &PartListQuery {
                out_of_stock: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        seed_brand(&pool, "Acme").await;
        let part = create(&pool, PartKind::SparePart, request("Wing Mirror", "SP-1"))
            .await
            .unwrap();

        delete(&pool, PartKind::SparePart, &part.id).await.unwrap();
        let err = get(&pool, PartKind::SparePart, &part.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
