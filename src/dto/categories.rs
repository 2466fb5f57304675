use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::state::form::{EditState, FormController, FormTarget};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MISSING: &str = "-";

/// One card of the category grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_on: String,
    pub last_updated: String,
}

fn format_date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|v| v.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.as_str().to_string(),
            name: value.name.as_str().to_string(),
            created_by: value
                .created_by
                .as_ref()
                .map(|u| u.as_str().to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            created_on: format_date(value.created_at),
            last_updated: format_date(value.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditFormDto {
    pub id: String,
    pub draft: String,
}

/// Template-facing snapshot of a [`FormController`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDto {
    pub new_name: String,
    pub editing: Option<EditFormDto>,
    pub create_error: Option<String>,
    pub edit_error: Option<String>,
    pub delete_error: Option<String>,
}

impl From<&FormController> for FormDto {
    fn from(value: &FormController) -> Self {
        let editing = match value.edit() {
            EditState::Editing { id, draft } => Some(EditFormDto {
                id: id.as_str().to_string(),
                draft: draft.clone(),
            }),
            EditState::NoSelection => None,
        };
        Self {
            new_name: value.new_name().to_string(),
            editing,
            create_error: value.error_for(FormTarget::Create).map(str::to_string),
            edit_error: value.error_for(FormTarget::Edit).map(str::to_string),
            delete_error: value.error_for(FormTarget::Delete).map(str::to_string),
        }
    }
}

/// The three mutually exclusive renders of the categories page.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoriesView {
    Loading,
    Failed(String),
    Ready(Vec<CategoryDto>),
}
