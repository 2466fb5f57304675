use std::sync::Mutex;

use crate::domain::category::{Category, CategoryMutation, NewCategory};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::{CategoryId, DeletedFlag};
use crate::repository::{CategoryReader, CategoryWriter, RepositoryError, RepositoryResult};

/// Call recorded by [`TestRepository`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List,
    Create(String),
    Update {
        id: String,
        name: String,
        flag: DeletedFlag,
    },
}

type UpdateHook = Box<dyn FnOnce() + Send>;

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    categories: Mutex<Vec<Category>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: Mutex<u32>,
    fail: bool,
    before_update: Mutex<Option<UpdateHook>>,
}

impl TestRepository {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: Mutex::new(categories),
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    /// Every call answers with a rejection.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Run `hook` while the next update is in flight, before it answers.
    pub fn on_update(self, hook: impl FnOnce() + Send + 'static) -> Self {
        *self.before_update.lock().unwrap() = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> RepositoryResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(RepositoryError::Rejected("test"))
        } else {
            Ok(())
        }
    }
}

impl CategoryReader for TestRepository {
    async fn list_categories(&self, _identity: &ClientIdentity) -> RepositoryResult<Vec<Category>> {
        self.record(RecordedCall::List)?;
        Ok(self.categories.lock().unwrap().clone())
    }
}

impl CategoryWriter for TestRepository {
    async fn create_category(
        &self,
        _identity: &ClientIdentity,
        category: &NewCategory,
    ) -> RepositoryResult<CategoryId> {
        self.record(RecordedCall::Create(category.name.as_str().to_string()))?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = CategoryId::new(next_id.to_string()).unwrap();
        self.categories
            .lock()
            .unwrap()
            .insert(0, category.clone().into_category(id.clone()));
        Ok(id)
    }

    async fn update_category(
        &self,
        _identity: &ClientIdentity,
        mutation: &CategoryMutation,
    ) -> RepositoryResult<()> {
        let hook = self.before_update.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.record(RecordedCall::Update {
            id: mutation.id().as_str().to_string(),
            name: mutation.name().as_str().to_string(),
            flag: mutation.deleted_flag(),
        })
    }
}
