//! Transient form state for one browser session.
//!
//! Holds the create-form draft, the edit selection and the last inline error.
//! The whole struct is serialisable so it can travel in the session cookie.

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::state::store::CategoryStore;

/// Longest draft kept in the session, in characters, so the session cookie
/// stays under its 4 KB limit.
pub const MAX_DRAFT_CHARS: usize = 200;

fn capped(mut value: String) -> String {
    if let Some((end, _)) = value.char_indices().nth(MAX_DRAFT_CHARS) {
        value.truncate(end);
    }
    value
}

/// Form an inline error is rendered beneath.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormTarget {
    Create,
    Edit,
    Delete,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormError {
    pub target: FormTarget,
    pub message: String,
}

/// Edit form state machine.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditState {
    #[default]
    NoSelection,
    Editing { id: CategoryId, draft: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormController {
    new_name: String,
    edit: EditState,
    error: Option<FormError>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// Inline error for `target`, if the last failure belongs to it.
    pub fn error_for(&self, target: FormTarget) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.target == target)
            .map(|e| e.message.as_str())
    }

    pub fn selected_id(&self) -> Option<&CategoryId> {
        match &self.edit {
            EditState::Editing { id, .. } => Some(id),
            EditState::NoSelection => None,
        }
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.new_name = capped(name.into());
    }

    /// Enter editing for `category`, pre-filling the draft with its name.
    pub fn select(&mut self, category: &Category) {
        self.edit = EditState::Editing {
            id: category.id.clone(),
            draft: capped(category.name.as_str().to_string()),
        };
        self.error = None;
    }

    /// Replace the edit draft. Ignored when nothing is selected.
    pub fn set_draft(&mut self, name: impl Into<String>) {
        if let EditState::Editing { draft, .. } = &mut self.edit {
            *draft = capped(name.into());
        }
    }

    pub fn fail(&mut self, target: FormTarget, message: impl Into<String>) {
        self.error = Some(FormError {
            target,
            message: message.into(),
        });
    }

    pub fn create_succeeded(&mut self) {
        self.new_name.clear();
        self.error = None;
    }

    pub fn rename_succeeded(&mut self) {
        self.edit = EditState::NoSelection;
        self.error = None;
    }

    pub fn delete_succeeded(&mut self) {
        if matches!(self.error, Some(FormError { target: FormTarget::Delete, .. })) {
            self.error = None;
        }
    }

    /// Drop the selection if its category is no longer in `store`.
    pub fn reconcile(&mut self, store: &CategoryStore) {
        let stale = match &self.edit {
            EditState::Editing { id, .. } => store.get(id).is_none(),
            EditState::NoSelection => false,
        };
        if stale {
            self.edit = EditState::NoSelection;
            if matches!(self.error, Some(FormError { target: FormTarget::Edit, .. })) {
                self.error = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CategoryName;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn select_prefills_draft_with_current_name() {
        let mut form = FormController::new();
        form.select(&category("5", "Herbal tea"));
        assert_eq!(
            form.edit(),
            &EditState::Editing {
                id: CategoryId::new("5").unwrap(),
                draft: "Herbal tea".into()
            }
        );
    }

    #[test]
    fn failed_rename_keeps_editing_with_error() {
        let mut form = FormController::new();
        form.select(&category("5", "Tea"));
        form.set_draft("Black tea");
        form.fail(FormTarget::Edit, "Failed to update category.");

        assert_eq!(form.selected_id().unwrap(), &"5");
        assert_eq!(form.error_for(FormTarget::Edit), Some("Failed to update category."));
        assert_eq!(form.error_for(FormTarget::Create), None);
        assert!(matches!(form.edit(), EditState::Editing { draft, .. } if draft == "Black tea"));
    }

    #[test]
    fn rename_success_returns_to_no_selection() {
        let mut form = FormController::new();
        form.select(&category("5", "Tea"));
        form.rename_succeeded();
        assert_eq!(form.edit(), &EditState::NoSelection);
        assert!(form.error().is_none());
    }

    #[test]
    fn create_success_clears_draft_and_error() {
        let mut form = FormController::new();
        form.set_new_name("Coffee");
        form.fail(FormTarget::Create, "Failed to add category.");
        form.create_succeeded();
        assert_eq!(form.new_name(), "");
        assert!(form.error().is_none());
    }

    #[test]
    fn reconcile_drops_selection_of_removed_category() {
        let mut store = CategoryStore::new();
        store.replace_all(vec![category("1", "Tea")]);

        let mut form = FormController::new();
        form.select(&category("2", "Coffee"));
        form.reconcile(&store);
        assert_eq!(form.edit(), &EditState::NoSelection);

        form.select(&category("1", "Tea"));
        form.reconcile(&store);
        assert_eq!(form.selected_id().unwrap(), &"1");
    }

    #[test]
    fn drafts_are_capped_on_char_boundaries() {
        let mut form = FormController::new();
        form.set_new_name("ж".repeat(5000));
        assert_eq!(form.new_name().chars().count(), MAX_DRAFT_CHARS);

        form.select(&category("1", "Tea"));
        form.set_draft("x".repeat(MAX_DRAFT_CHARS + 1));
        match form.edit() {
            EditState::Editing { draft, .. } => assert_eq!(draft.len(), MAX_DRAFT_CHARS),
            EditState::NoSelection => panic!("expected an edit selection"),
        }

        form.set_new_name("Tea");
        assert_eq!(form.new_name(), "Tea");
    }

    #[test]
    fn survives_session_round_trip() {
        let mut form = FormController::new();
        form.select(&category("5", "Tea"));
        form.fail(FormTarget::Edit, "Failed to update category.");

        let json = serde_json::to_string(&form).unwrap();
        let restored: FormController = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, form);
    }
}
