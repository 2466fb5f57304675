use std::sync::MutexGuard;

use chrono::Utc;

use crate::domain::category::{Category, CategoryMutation};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoriesView, CategoryDto};
use crate::forms::categories::{
    AddCategoryFormPayload, DeleteCategoryFormPayload, UpdateCategoryFormPayload,
};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::state::form::{FormController, FormTarget};
use crate::state::page::{CategoryPage, LoadStatus, SharedPage};
use crate::state::tokens::OperationToken;

use super::{ServiceError, ServiceResult};

pub const FETCH_FAILED: &str = "Failed to fetch categories.";
pub const ADD_FAILED: &str = "Failed to add category.";
pub const UPDATE_FAILED: &str = "Failed to update category.";
pub const DELETE_FAILED: &str = "Failed to delete category.";
pub const SUPERSEDED: &str = "Category was changed by a newer request.";

/// How a rename or delete ended locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationStatus {
    Applied,
    /// The backend accepted it, but a newer request for the same id owns the
    /// record now.
    Superseded,
    Failed,
}

fn lock_page(page: &SharedPage) -> ServiceResult<MutexGuard<'_, CategoryPage>> {
    page.lock().map_err(|e| {
        log::error!("Category page state is poisoned: {e}");
        ServiceError::Internal
    })
}

/// Marks the fetch as failed if the request is dropped before completing,
/// so the page does not stay in the loading state forever.
struct FetchGuard<'a> {
    page: &'a SharedPage,
    token: Option<OperationToken>,
}

impl FetchGuard<'_> {
    fn complete(mut self, result: Result<Vec<Category>, String>) -> ServiceResult<()> {
        if let Some(token) = self.token.take() {
            lock_page(self.page)?.finish_fetch(token, result);
        }
        Ok(())
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            if let Ok(mut page) = self.page.lock() {
                log::warn!("Category fetch {token} abandoned before completion");
                page.finish_fetch(token, Err(FETCH_FAILED.to_string()));
            }
        }
    }
}

/// Render state of the categories page, fetching the list on first use.
///
/// A fetch runs when the page was never loaded or the previous attempt
/// failed; afterwards the local store is served without re-fetching.
pub async fn show_categories<R>(
    identity: &ClientIdentity,
    page: &SharedPage,
    form: &mut FormController,
    repo: &R,
) -> ServiceResult<CategoriesView>
where
    R: CategoryReader,
{
    let token = lock_page(page)?.begin_fetch();

    if let Some(token) = token {
        let guard = FetchGuard {
            page,
            token: Some(token),
        };
        let result = match repo.list_categories(identity).await {
            Ok(categories) => {
                log::info!("Fetched {} categories", categories.len());
                Ok(categories)
            }
            Err(e) => {
                log::error!("Failed to fetch categories: {e}");
                Err(FETCH_FAILED.to_string())
            }
        };
        guard.complete(result)?;
    }

    let page = lock_page(page)?;
    let view = match page.status() {
        LoadStatus::Idle | LoadStatus::Loading => CategoriesView::Loading,
        LoadStatus::Failed(message) => CategoriesView::Failed(message.clone()),
        LoadStatus::Ready => {
            form.reconcile(page.store());
            CategoriesView::Ready(page.store().list().iter().map(CategoryDto::from).collect())
        }
    };
    Ok(view)
}

pub async fn add_category<R>(
    payload: AddCategoryFormPayload,
    identity: &ClientIdentity,
    page: &SharedPage,
    form: &mut FormController,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
{
    let new_category = payload.into_new_category(identity);

    match repo.create_category(identity, &new_category).await {
        Ok(id) => {
            log::info!("Created category {id} ({})", new_category.name);
            lock_page(page)?.insert_created(new_category.into_category(id));
            form.create_succeeded();
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            form.fail(FormTarget::Create, ADD_FAILED);
            Ok(false)
        }
    }
}

/// Put the category into the session's edit form.
pub fn select_category(
    category_id: String,
    page: &SharedPage,
    form: &mut FormController,
) -> ServiceResult<()> {
    let category_id = CategoryId::new(category_id)?;
    let page = lock_page(page)?;
    match page.store().get(&category_id) {
        Some(category) => {
            form.select(category);
            Ok(())
        }
        None => Err(ServiceError::NotFound),
    }
}

/// Category shown on the delete confirmation page.
pub fn category_for_delete(category_id: String, page: &SharedPage) -> ServiceResult<CategoryDto> {
    let category_id = CategoryId::new(category_id)?;
    let page = lock_page(page)?;
    page.store()
        .get(&category_id)
        .map(CategoryDto::from)
        .ok_or(ServiceError::NotFound)
}

/// Send a rename or delete and apply its local effect if still current.
async fn apply_mutation<R>(
    mutation: CategoryMutation,
    identity: &ClientIdentity,
    page: &SharedPage,
    repo: &R,
) -> ServiceResult<MutationStatus>
where
    R: CategoryWriter,
{
    let token = {
        let mut page = lock_page(page)?;
        if page.store().get(mutation.id()).is_none() {
            return Err(ServiceError::NotFound);
        }
        page.begin_mutation(mutation.id())
    };

    match repo.update_category(identity, &mutation).await {
        Ok(()) => {
            log::info!(
                "Backend accepted {} for category {} ({token})",
                mutation.deleted_flag(),
                mutation.id()
            );
            let mut page = lock_page(page)?;
            if !page.is_current(mutation.id(), token) {
                log::warn!(
                    "Completion {token} for category {} superseded by a newer request",
                    mutation.id()
                );
                return Ok(MutationStatus::Superseded);
            }
            let outcome = mutation.into_outcome(identity.username.clone(), Utc::now().naive_utc());
            page.finish_mutation(token, outcome);
            Ok(MutationStatus::Applied)
        }
        Err(e) => {
            log::error!(
                "Failed to apply {} to category {}: {e}",
                mutation.deleted_flag(),
                mutation.id()
            );
            lock_page(page)?.abandon_mutation(mutation.id(), token);
            Ok(MutationStatus::Failed)
        }
    }
}

pub async fn update_category<R>(
    payload: UpdateCategoryFormPayload,
    identity: &ClientIdentity,
    page: &SharedPage,
    form: &mut FormController,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
{
    match apply_mutation(payload.into_mutation(), identity, page, repo).await? {
        MutationStatus::Applied => {
            form.rename_succeeded();
            Ok(true)
        }
        MutationStatus::Superseded => {
            form.fail(FormTarget::Edit, SUPERSEDED);
            Ok(false)
        }
        MutationStatus::Failed => {
            form.fail(FormTarget::Edit, UPDATE_FAILED);
            Ok(false)
        }
    }
}

pub async fn delete_category<R>(
    payload: DeleteCategoryFormPayload,
    identity: &ClientIdentity,
    page: &SharedPage,
    form: &mut FormController,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
{
    let name = {
        let page = lock_page(page)?;
        match page.store().get(&payload.category_id) {
            Some(category) => category.name.clone(),
            None => return Err(ServiceError::NotFound),
        }
    };

    let mutation = CategoryMutation::SoftDelete {
        id: payload.category_id,
        name,
    };
    match apply_mutation(mutation, identity, page, repo).await? {
        MutationStatus::Applied => {
            form.delete_succeeded();
            Ok(true)
        }
        MutationStatus::Superseded => {
            form.fail(FormTarget::Delete, SUPERSEDED);
            Ok(false)
        }
        MutationStatus::Failed => {
            form.fail(FormTarget::Delete, DELETE_FAILED);
            Ok(false)
        }
    }
}
