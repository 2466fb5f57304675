//! Domain entities and value objects shared by every layer.

pub mod category;
pub mod identity;
pub mod types;
