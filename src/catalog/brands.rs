//! Brand store.

use chrono::Utc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::{validate_name, validate_url};
use crate::db::{Brand, CreateBrandRequest, DbPool, UpdateBrandRequest};

pub async fn list(pool: &DbPool) -> Result<Vec<Brand>, ApiError> {
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(brands)
}

pub async fn get(pool: &DbPool, id: &str) -> Result<Brand, ApiError> {
    let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Brand with id {} not found", id)))?;
    Ok(brand)
}

pub async fn find_by_name(pool: &DbPool, name: &str) -> Result<Option<Brand>, ApiError> {
    let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(brand)
}

pub async fn create(pool: &DbPool, req: CreateBrandRequest) -> Result<Brand, ApiError> {
    let name = req.name.trim().to_string();
    validate_name(&name).map_err(ApiError::bad_request)?;
    validate_url(&req.logo, "logo").map_err(ApiError::bad_request)?;

    if find_by_name(pool, &name).await?.is_some() {
        return Err(ApiError::bad_request(format!(
            "Brand with name {} already exists",
            name
        )));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO brands (id, name, logo, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&name)
    .bind(&req.logo)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get(pool, &id).await
}

pub async fn update(pool: &DbPool, id: &str, req: UpdateBrandRequest) -> Result<Brand, ApiError> {
    let brand = get(pool, id).await?;

    let name = req.name.map(|n| n.trim().to_string());
    if let Some(ref name) = name {
        validate_name(name).map_err(ApiError::bad_request)?;
        if name != &brand.name && find_by_name(pool, name).await?.is_some() {
            return Err(ApiError::bad_request(format!(
                "Brand with name {} already exists",
                name
            )));
        }
    }
    if let Some(ref logo) = req.logo {
        validate_url(logo, "logo").map_err(ApiError::bad_request)?;
    }

    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE brands SET
            name = COALESCE(?, name),
            logo = COALESCE(?, logo),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&req.logo)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Deleting a brand is unguarded: catalog rows naming it keep their brand
/// string (references are validated at write time only)
pub async fn delete(pool: &DbPool, id: &str) -> Result<(), ApiError> {
    let brand = get(pool, id).await?;

    sqlx::query("DELETE FROM brands WHERE id = ?")
        .bind(&brand.id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;
    use crate::db::test_pool;

    fn brand_request(name: &str) -> CreateBrandRequest {
        CreateBrandRequest {
            name: name.to_string(),
            logo: "https://cdn.example.com/logo.png".to_string(),
        }
    }

    async fn count(pool: &DbPool) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM brands")
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let pool = test_pool().await;
        let brand = create(&pool, brand_request("  Acme  ")).await.unwrap();
        assert_eq!(brand.name, "Acme");
        assert!(!brand.id.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_and_nothing_persisted() {
        let pool = test_pool().await;
        create(&pool, brand_request("Acme")).await.unwrap();

        let err = create(&pool, brand_request("Acme")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let pool = test_pool().await;
        create(&pool, brand_request("Zephyr")).await.unwrap();
        create(&pool, brand_request("Acme")).await.unwrap();

        let brands = list(&pool).await.unwrap();
        let names: Vec<_> = brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Zephyr"]);
    }

    #[tokio::test]
    async fn test_update_merges_provided_fields() {
        let pool = test_pool().await;
        let brand = create(&pool, brand_request("Acme")).await.unwrap();

        let updated = update(
            &pool,
            &brand.id,
            UpdateBrandRequest {
                name: None,
                logo: Some("https://cdn.example.com/new.png".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.logo, "https://cdn.example.com/new.png");
    }

    #[tokio::test]
    async fn test_update_rejects_taken_name() {
        let pool = test_pool().await;
        create(&pool, brand_request("Acme")).await.unwrap();
        let other = create(&pool, brand_request("Zephyr")).await.unwrap();

        let err = update(
            &pool,
            &other.id,
            UpdateBrandRequest {
                name: Some("Acme".to_string()),
                logo: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = test_pool().await;
        let err = delete(&pool, &uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
