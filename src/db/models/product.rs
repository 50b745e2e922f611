//! Product models and DTOs.
//!
//! List-valued fields (media, technical specs) and the social links object
//! are stored as JSON TEXT columns and parsed into structured types on the
//! way out.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{parse_json, parse_json_list, Media, SocialLinks};
use super::part::PartResponse;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Brand.name reference, validated at write time
    pub brand: String,
    pub color: String,
    pub model_code: String,
    pub scale: String,
    pub out_of_stock: bool,
    pub price: f64,
    pub slug: String,
    /// JSON array of Media objects
    pub media: Option<String>,
    /// JSON object with optional instagram/facebook/youtube links
    pub social_links: Option<String>,
    /// JSON array of strings
    pub technical_specs: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response DTO with JSON columns parsed into structured values
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub color: String,
    pub model_code: String,
    pub scale: String,
    pub out_of_stock: bool,
    pub price: f64,
    pub slug: String,
    pub media: Vec<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub technical_specs: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            media: parse_json_list(product.media.as_deref()),
            social_links: parse_json(product.social_links.as_deref()),
            technical_specs: parse_json_list(product.technical_specs.as_deref()),
            id: product.id,
            name: product.name,
            brand: product.brand,
            color: product.color,
            model_code: product.model_code,
            scale: product.scale,
            out_of_stock: product.out_of_stock,
            price: product.price,
            slug: product.slug,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Product plus the accessories and/or spare parts declared compatible
/// with it
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatible_spare_parts: Option<Vec<PartResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatible_accessories: Option<Vec<PartResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    pub color: String,
    pub model_code: String,
    pub scale: String,
    pub price: f64,
    pub slug: Option<String>,
    pub out_of_stock: Option<bool>,
    pub media: Option<Vec<Media>>,
    pub social_links: Option<SocialLinks>,
    pub technical_specs: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub model_code: Option<String>,
    pub scale: Option<String>,
    pub price: Option<f64>,
    pub slug: Option<String>,
    pub out_of_stock: Option<bool>,
    pub media: Option<Vec<Media>>,
    pub social_links: Option<SocialLinks>,
    pub technical_specs: Option<Vec<String>>,
}

/// Query-string filters for product listing: exact match on stored fields,
/// price bounds, stock flag
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub brand: Option<String>,
    pub color: Option<String>,
    pub model_code: Option<String>,
    pub scale: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub out_of_stock: Option<bool>,
}
