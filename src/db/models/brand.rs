//! Brand models. Products and parts reference brands by name, validated at
//! write time only.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    pub logo: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    pub logo: Option<String>,
}
