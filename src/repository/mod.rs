//! Access to the remote category store.
//!
//! Services depend on the reader/writer traits only, so they can be exercised
//! against the in-memory [`test::TestRepository`] as well as the HTTP
//! implementation.

use crate::domain::category::{Category, CategoryMutation, NewCategory};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::CategoryId;

pub mod errors;
pub mod http;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};
pub use http::HttpRepository;

/// Read-only operations for category entities.
#[allow(async_fn_in_trait)]
pub trait CategoryReader {
    /// Fetch the full, unpaginated list of live categories.
    async fn list_categories(&self, identity: &ClientIdentity) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities.
#[allow(async_fn_in_trait)]
pub trait CategoryWriter {
    /// Create a category and return the id issued by the backend.
    async fn create_category(
        &self,
        identity: &ClientIdentity,
        category: &NewCategory,
    ) -> RepositoryResult<CategoryId>;
    /// Send a rename or soft-delete through the shared update endpoint.
    async fn update_category(
        &self,
        identity: &ClientIdentity,
        mutation: &CategoryMutation,
    ) -> RepositoryResult<()>;
}
