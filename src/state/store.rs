use chrono::NaiveDateTime;

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, CategoryName, UserName};

/// Ordered list of live categories, the single source of truth for rendering.
///
/// Order is the order the backend returned on the initial fetch, with
/// categories created afterwards prepended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStore {
    records: Vec<Category>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Category] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.records.iter().find(|c| &c.id == id)
    }

    /// Replace the whole list, keeping the first occurrence of duplicate ids.
    pub fn replace_all(&mut self, records: Vec<Category>) {
        let mut unique: Vec<Category> = Vec::with_capacity(records.len());
        for record in records {
            if unique.iter().any(|c| c.id == record.id) {
                log::warn!("Dropping duplicate category id {}", record.id);
                continue;
            }
            unique.push(record);
        }
        self.records = unique;
    }

    /// Insert a record at the front. An existing entry with the same id is
    /// replaced.
    pub fn prepend(&mut self, record: Category) {
        self.records.retain(|c| c.id != record.id);
        self.records.insert(0, record);
    }

    /// Returns `false` when no record with `id` exists.
    pub fn update_name(&mut self, id: &CategoryId, name: CategoryName) -> bool {
        match self.records.iter_mut().find(|c| &c.id == id) {
            Some(record) => {
                record.name = name;
                true
            }
            None => false,
        }
    }

    /// Overwrite the updater stamp of a record.
    pub fn touch(
        &mut self,
        id: &CategoryId,
        updated_by: UserName,
        updated_at: NaiveDateTime,
    ) -> bool {
        match self.records.iter_mut().find(|c| &c.id == id) {
            Some(record) => {
                record.updated_by = Some(updated_by);
                record.updated_at = Some(updated_at);
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no record with `id` exists.
    pub fn remove(&mut self, id: &CategoryId) -> bool {
        let before = self.records.len();
        self.records.retain(|c| &c.id != id);
        self.records.len() != before
    }
}
