//! Referential-integrity and uniqueness checks shared by the product,
//! accessory and spare-part stores.
//!
//! References are validated at write time only: a brand rename or delete
//! does not cascade into the rows naming it. Deleting a product does
//! cascade, as a best-effort sweep that detaches its id from the
//! compatibility lists of both part tables before the row is removed.

use chrono::Utc;

use crate::api::error::ApiError;
use crate::api::validation::validate_uuid;
use crate::db::{parse_json_list, DbPool};

/// Fail with `BadRequest` unless a brand with the given name exists
pub async fn ensure_brand_exists(pool: &DbPool, name: &str) -> Result<(), ApiError> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM brands WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if existing.is_none() {
        return Err(ApiError::bad_request(format!(
            "Brand {} does not exist",
            name
        )));
    }

    Ok(())
}

/// Fail with `BadRequest` when another record in `table` already carries
/// this slug. `exclude_id` skips the record being updated.
pub async fn ensure_slug_available(
    pool: &DbPool,
    table: &'static str,
    label: &str,
    slug: &str,
    exclude_id: Option<&str>,
) -> Result<(), ApiError> {
    let existing: Option<(String,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE slug = ?", table))
            .bind(slug)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((id,)) if Some(id.as_str()) != exclude_id => Err(ApiError::bad_request(format!(
            "{} with slug {} already exists",
            label, slug
        ))),
        _ => Ok(()),
    }
}

/// Fail with `BadRequest` when another record in `table` already carries
/// this SKU. Independent of the slug check.
pub async fn ensure_sku_available(
    pool: &DbPool,
    table: &'static str,
    label: &str,
    sku: &str,
    exclude_id: Option<&str>,
) -> Result<(), ApiError> {
    let existing: Option<(String,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE sku = ?", table))
            .bind(sku)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((id,)) if Some(id.as_str()) != exclude_id => Err(ApiError::bad_request(format!(
            "{} with SKU {} already exists",
            label, sku
        ))),
        _ => Ok(()),
    }
}

/// Validate every compatible-product id: format first, then a point lookup.
/// Ids are checked in list order and the first failure aborts the whole
/// write.
pub async fn ensure_products_exist(pool: &DbPool, ids: &[String]) -> Result<(), ApiError> {
    for product_id in ids {
        if validate_uuid(product_id, "product id").is_err() {
            return Err(ApiError::bad_request(format!(
                "Invalid product ID: {}",
                product_id
            )));
        }

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(pool)
            .await?;

        if existing.is_none() {
            return Err(ApiError::bad_request(format!(
                "Product with ID {} not found",
                product_id
            )));
        }
    }

    Ok(())
}

/// Derived stock flag: a part is out of stock exactly when stock <= 0
pub fn stock_status(stock: i64) -> bool {
    stock <= 0
}

/// Remove a deleted product's id from every accessory's and spare part's
/// compatibility list. Sequential and non-transactional: an interruption
/// can leave a dangling reference for the next sweep to miss.
pub async fn detach_product_references(pool: &DbPool, product_id: &str) -> Result<(), ApiError> {
    for table in ["accessories", "spare_parts"] {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(&format!(
            "SELECT id, compatible_product_ids FROM {} WHERE compatible_product_ids LIKE ?",
            table
        ))
        .bind(format!("%{}%", product_id))
        .fetch_all(pool)
        .await?;

        for (id, raw) in rows {
            let mut ids: Vec<String> = parse_json_list(raw.as_deref());
            let before = ids.len();
            ids.retain(|p| p != product_id);
            if ids.len() == before {
                continue;
            }

            let updated = serde_json::to_string(&ids)
                .map_err(|e| ApiError::internal(format!("Failed to encode id list: {}", e)))?;

            sqlx::query(&format!(
                "UPDATE {} SET compatible_product_ids = ?, updated_at = ? WHERE id = ?",
                table
            ))
            .bind(&updated)
            .bind(Utc::now().to_rfc3339())
            .bind(&id)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}
