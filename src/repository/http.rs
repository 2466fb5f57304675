use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::category::{Category, CategoryMutation, NewCategory};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::{BackendUrl, CategoryId};
use crate::models::category::{
    CategoryRow, IdentityBody, InsertCategoryBody, InsertCategoryResponse, ListCategoriesResponse,
    RUN_INSERT, RUN_LIST, RUN_UPDATE, UpdateCategoryBody, UpdateCategoryResponse,
};
use crate::repository::{CategoryReader, CategoryWriter, RepositoryError, RepositoryResult};

/// Repository backed by the remote category endpoint.
///
/// `reqwest::Client` pools connections internally and is cheap to clone.
#[derive(Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    endpoint: BackendUrl,
}

impl HttpRepository {
    /// Create a repository with its own client and request timeout.
    pub fn new(endpoint: BackendUrl, timeout: Duration) -> RepositoryResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// POST `body` with the given `run` selector and decode the JSON reply.
    async fn call<B, T>(&self, run: &'static str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .query(&[("run", run)])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Convert the `message` payload of a list response into domain records.
///
/// Missing or `null` means an empty list. Rows that fail validation are
/// skipped so one bad record does not hide the rest.
fn categories_from_message(message: Option<Value>) -> RepositoryResult<Vec<Category>> {
    let rows = match message {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            return Err(RepositoryError::UnexpectedResponse(format!(
                "expected a list of categories, got {other}"
            )));
        }
    };

    let mut categories = Vec::with_capacity(rows.len());
    for row in rows {
        let parsed = serde_json::from_value::<CategoryRow>(row)
            .map_err(|e| e.to_string())
            .and_then(|row| Category::try_from(row).map_err(|e| e.to_string()));
        match parsed {
            Ok(category) => categories.push(category),
            Err(e) => log::warn!("Skipping malformed category row: {e}"),
        }
    }
    Ok(categories)
}

impl CategoryReader for HttpRepository {
    async fn list_categories(&self, identity: &ClientIdentity) -> RepositoryResult<Vec<Category>> {
        let response: ListCategoriesResponse =
            self.call(RUN_LIST, &IdentityBody::from(identity)).await?;
        categories_from_message(response.message)
    }
}

impl CategoryWriter for HttpRepository {
    async fn create_category(
        &self,
        identity: &ClientIdentity,
        category: &NewCategory,
    ) -> RepositoryResult<CategoryId> {
        let body = InsertCategoryBody {
            identity: identity.into(),
            cat_name: category.name.as_str(),
        };
        let response: InsertCategoryResponse = self.call(RUN_INSERT, &body).await?;
        if !response.success {
            return Err(RepositoryError::Rejected(RUN_INSERT));
        }

        let raw_id = response.new_category_id.ok_or_else(|| {
            RepositoryError::UnexpectedResponse("newCategoryId missing".to_string())
        })?;
        CategoryId::try_from(raw_id).map_err(|e| RepositoryError::UnexpectedResponse(e.to_string()))
    }

    async fn update_category(
        &self,
        identity: &ClientIdentity,
        mutation: &CategoryMutation,
    ) -> RepositoryResult<()> {
        let body = UpdateCategoryBody::new(identity, mutation);
        let response: UpdateCategoryResponse = self.call(RUN_UPDATE, &body).await?;
        if response.success {
            Ok(())
        } else {
            Err(RepositoryError::Rejected(RUN_UPDATE))
        }
    }
}
