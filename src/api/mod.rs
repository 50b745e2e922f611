pub mod auth;
mod brands;
pub mod error;
mod parts;
mod products;
pub mod response;
mod users;
pub mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // register/login public, /me requires a valid token
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    // All user routes require a token; per-handler guards decide the rest
    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/:id", get(users::get_user))
        .route("/:id", put(users::update_user))
        .route("/:id/password", put(users::update_user_password))
        .route("/:id", delete(users::delete_user));

    let brand_routes = Router::new()
        .route("/", get(brands::list_brands))
        .route("/", post(brands::create_brand))
        .route("/:id", get(brands::get_brand))
        .route("/:id", put(brands::update_brand))
        .route("/:id", delete(brands::delete_brand));

    let product_routes = Router::new()
        .route("/", get(products::list_products))
        .route("/", post(products::create_product))
        .route("/slug/:slug", get(products::get_product_by_slug))
        .route("/:id", get(products::get_product))
        .route("/:id", put(products::update_product))
        .route("/:id", delete(products::delete_product))
        .route("/:id/spare-parts", get(products::get_product_with_spare_parts))
        .route("/:id/accessories", get(products::get_product_with_accessories))
        .route("/:id/complete", get(products::get_complete_product));

    let accessory_routes = Router::new()
        .route("/", get(parts::list_accessories))
        .route("/", post(parts::create_accessory))
        .route("/slug/:slug", get(parts::get_accessory_by_slug))
        .route("/product/:product_id", get(parts::accessories_for_product))
        .route("/:id", get(parts::get_accessory))
        .route("/:id", put(parts::update_accessory))
        .route("/:id", delete(parts::delete_accessory));

    let spare_part_routes = Router::new()
        .route("/", get(parts::list_spare_parts))
        .route("/", post(parts::create_spare_part))
        .route("/slug/:slug", get(parts::get_spare_part_by_slug))
        .route("/product/:product_id", get(parts::spare_parts_for_product))
        .route("/:id", get(parts::get_spare_part))
        .route("/:id", put(parts::update_spare_part))
        .route("/:id", delete(parts::delete_spare_part));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/brands", brand_routes)
        .nest("/api/products", product_routes)
        .nest("/api/accessories", accessory_routes)
        .nest("/api/spare-parts", spare_part_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
