//! Accessory and spare-part models.
//!
//! The two entities are structurally identical and live in separate tables;
//! one model parameterized by [`PartKind`] serves both.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{parse_json, parse_json_list, Dimensions, Media};

/// Selects which part table an operation runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Accessory,
    SparePart,
}

impl PartKind {
    pub fn table(self) -> &'static str {
        match self {
            PartKind::Accessory => "accessories",
            PartKind::SparePart => "spare_parts",
        }
    }

    /// Display name used in error messages
    pub fn label(self) -> &'static str {
        match self {
            PartKind::Accessory => "Accessory",
            PartKind::SparePart => "Spare part",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
    /// Derived: stock <= 0, recomputed on every write that touches stock
    pub out_of_stock: bool,
    /// JSON array of category tags, non-empty
    pub categories: String,
    /// JSON array of product ids, each validated to exist at write time
    pub compatible_product_ids: Option<String>,
    pub brand: String,
    pub description: String,
    /// JSON array of Media objects
    pub media: Option<String>,
    pub weight: f64,
    /// JSON object {length, width, height, unit}
    pub dimensions: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response DTO with JSON columns parsed into structured values
#[derive(Debug, Clone, Serialize)]
pub struct PartResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
    pub out_of_stock: bool,
    pub categories: Vec<String>,
    pub compatible_product_ids: Vec<String>,
    pub brand: String,
    pub description: String,
    pub media: Vec<Media>,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Part> for PartResponse {
    fn from(part: Part) -> Self {
        Self {
            categories: parse_json_list(Some(part.categories.as_str())),
            compatible_product_ids: parse_json_list(part.compatible_product_ids.as_deref()),
            media: parse_json_list(part.media.as_deref()),
            dimensions: parse_json(part.dimensions.as_deref()),
            id: part.id,
            name: part.name,
            slug: part.slug,
            sku: part.sku,
            price: part.price,
            stock: part.stock,
            out_of_stock: part.out_of_stock,
            brand: part.brand,
            description: part.description,
            weight: part.weight,
            created_at: part.created_at,
            updated_at: part.updated_at,
        }
    }
}

/// Create payload. `out_of_stock` is absent on purpose: it is derived from
/// `stock` and never accepted from clients.
#[derive(Debug, Deserialize)]
pub struct CreatePartRequest {
    pub name: String,
    pub slug: Option<String>,
    pub sku: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub categories: Vec<String>,
    pub compatible_product_ids: Option<Vec<String>>,
    pub brand: String,
    pub description: String,
    pub media: Option<Vec<Media>>,
    pub weight: f64,
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePartRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub categories: Option<Vec<String>>,
    pub compatible_product_ids: Option<Vec<String>>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub media: Option<Vec<Media>>,
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
}

/// Query-string filters for accessory/spare-part listing: exact match on
/// stored fields, price bounds, stock flag, category membership
#[derive(Debug, Default, Deserialize)]
pub struct PartListQuery {
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub out_of_stock: Option<bool>,
    pub category: Option<String>,
}
