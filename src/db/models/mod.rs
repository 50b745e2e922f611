//! Database models split into domain-specific modules.

pub mod brand;
pub mod common;
pub mod part;
pub mod product;
pub mod user;

pub use brand::*;
pub use common::*;
pub use part::*;
pub use product::*;
pub use user::*;
