pub mod categories;
pub mod errors;

pub use errors::{ServiceError, ServiceResult};
