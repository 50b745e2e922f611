//! Input validation for API requests.
//!
//! Validators return `Result<(), String>`; callers surface failures as
//! `ApiError::bad_request`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)+$"
    ).unwrap();

    /// Regex for URL-safe slugs (lowercase alphanumeric, hyphen-separated)
    static ref SLUG_REGEX: Regex = Regex::new(
        r"^[a-z0-9_]+(-[a-z0-9_]+)*$"
    ).unwrap();

    /// Regex for SKU codes
    static ref SKU_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9_-]*$"
    ).unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a display name (user, brand, product, part)
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 200 {
        return Err("Name is too long (max 200 characters)".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a UUID string
pub fn validate_uuid(id: &str, field_name: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(format!("Invalid {} format", field_name));
    }

    Ok(())
}

/// Validate a price value
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() {
        return Err("Price must be a number".to_string());
    }

    if price < 0.0 {
        return Err("Price cannot be negative".to_string());
    }

    Ok(())
}

/// Validate a stock quantity
pub fn validate_stock(stock: i64) -> Result<(), String> {
    if stock < 0 {
        return Err("Stock cannot be negative".to_string());
    }

    Ok(())
}

/// Validate a client-supplied slug
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug is required".to_string());
    }

    if slug.len() > 200 {
        return Err("Slug is too long (max 200 characters)".to_string());
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(
            "Slug must be lowercase alphanumeric with single hyphen separators".to_string(),
        );
    }

    Ok(())
}

/// Validate a SKU code
pub fn validate_sku(sku: &str) -> Result<(), String> {
    if sku.is_empty() {
        return Err("SKU is required".to_string());
    }

    if sku.len() > 64 {
        return Err("SKU is too long (max 64 characters)".to_string());
    }

    if !SKU_REGEX.is_match(sku) {
        return Err("SKU must be alphanumeric with dashes or underscores".to_string());
    }

    Ok(())
}

/// Validate an http(s) URL (logo, media)
pub fn validate_url(url: &str, field_name: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if url.len() > 2048 {
        return Err(format!("{} is too long (max 2048 characters)", field_name));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("{} must be an http(s) URL", field_name));
    }

    Ok(())
}
