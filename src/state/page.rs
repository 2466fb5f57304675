use crate::domain::category::{Category, MutationOutcome};
use crate::domain::types::CategoryId;
use crate::state::store::CategoryStore;
use crate::state::tokens::{OperationToken, OperationTokens};

/// Page state shared between request handlers.
pub type SharedPage = std::sync::Mutex<CategoryPage>;

/// Top-level render state of the categories page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing fetched yet.
    Idle,
    Loading,
    Failed(String),
    Ready,
}

/// Shared page state: load status, the store and the tokens guarding it.
///
/// Every transition is synchronous; callers release the surrounding lock
/// while the backend request is in flight and come back with the token they
/// were issued.
#[derive(Debug)]
pub struct CategoryPage {
    status: LoadStatus,
    store: CategoryStore,
    tokens: OperationTokens,
    /// Records created while the list fetch was in flight.
    created_while_loading: Vec<Category>,
}

impl Default for CategoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryPage {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Idle,
            store: CategoryStore::new(),
            tokens: OperationTokens::new(),
            created_while_loading: Vec::new(),
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn in_flight(&self) -> usize {
        self.tokens.in_flight()
    }

    /// Start the list fetch if the page was never loaded or the last attempt
    /// failed. Returns `None` while another fetch is running or once loaded.
    pub fn begin_fetch(&mut self) -> Option<OperationToken> {
        match self.status {
            LoadStatus::Idle | LoadStatus::Failed(_) => {
                self.status = LoadStatus::Loading;
                Some(self.tokens.issue_fetch())
            }
            LoadStatus::Loading | LoadStatus::Ready => None,
        }
    }

    /// Apply the fetch result. A failure leaves the store empty.
    ///
    /// Records created during the fetch are put back in front of the fetched
    /// list.
    pub fn finish_fetch(
        &mut self,
        token: OperationToken,
        result: Result<Vec<Category>, String>,
    ) -> bool {
        if !self.tokens.settle_fetch(token) {
            log::warn!("Ignoring stale category fetch {token}");
            return false;
        }

        let created = std::mem::take(&mut self.created_while_loading);
        match result {
            Ok(records) => {
                self.store.replace_all(records);
                for category in created {
                    self.store.prepend(category);
                }
                self.status = LoadStatus::Ready;
            }
            Err(message) => {
                self.store.replace_all(Vec::new());
                self.status = LoadStatus::Failed(message);
            }
        }
        true
    }

    pub fn insert_created(&mut self, category: Category) {
        if self.status == LoadStatus::Loading {
            self.created_while_loading.push(category.clone());
        }
        self.store.prepend(category);
    }

    /// Issue a token for a rename or delete of `id`.
    pub fn begin_mutation(&mut self, id: &CategoryId) -> OperationToken {
        self.tokens.issue(id)
    }

    /// Whether `token` is still the latest one issued for `id`.
    pub fn is_current(&self, id: &CategoryId, token: OperationToken) -> bool {
        self.tokens.is_latest(id, token)
    }

    /// Apply a confirmed mutation if `token` is still the latest for its id.
    pub fn finish_mutation(&mut self, token: OperationToken, outcome: MutationOutcome) -> bool {
        if !self.tokens.settle(outcome.id(), token) {
            log::warn!(
                "Ignoring stale completion {token} for category {}",
                outcome.id()
            );
            return false;
        }

        match outcome {
            MutationOutcome::Renamed {
                id,
                name,
                updated_by,
                updated_at,
            } => {
                self.store.update_name(&id, name) && self.store.touch(&id, updated_by, updated_at)
            }
            MutationOutcome::Removed { id } => self.store.remove(&id),
        }
    }

    /// Release a token whose request failed. The store is left untouched.
    pub fn abandon_mutation(&mut self, id: &CategoryId, token: OperationToken) {
        self.tokens.settle(id, token);
    }
}
