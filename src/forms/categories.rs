use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryMutation, NewCategory};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::{CategoryId, CategoryName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self, identity: &ClientIdentity) -> NewCategory {
        NewCategory {
            name: self.name,
            created_by: identity.username.clone(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddCategoryFormError {
    #[error("Category name cannot be empty.")]
    EmptyName,
    #[error("Category name is too long.")]
    TooLong,
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(_: ValidationErrors) -> Self {
        Self::TooLong
    }
}

impl From<TypeConstraintError> for AddCategoryFormError {
    fn from(_: TypeConstraintError) -> Self {
        Self::EmptyName
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}

/// Rename submission. The target id comes from the session's edit selection,
/// not from the request.
#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    #[validate(length(max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub category_id: CategoryId,
    pub name: CategoryName,
}

impl UpdateCategoryFormPayload {
    pub fn into_mutation(self) -> CategoryMutation {
        CategoryMutation::Rename {
            id: self.category_id,
            name: self.name,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateCategoryFormError {
    #[error("Category name cannot be empty and no category selected.")]
    Incomplete,
    #[error("Category name is too long.")]
    TooLong,
}

impl From<ValidationErrors> for UpdateCategoryFormError {
    fn from(_: ValidationErrors) -> Self {
        Self::TooLong
    }
}

impl From<TypeConstraintError> for UpdateCategoryFormError {
    fn from(_: TypeConstraintError) -> Self {
        Self::Incomplete
    }
}

impl UpdateCategoryForm {
    /// Validate the draft against the current selection.
    pub fn into_payload(
        self,
        selected: Option<&CategoryId>,
    ) -> Result<UpdateCategoryFormPayload, UpdateCategoryFormError> {
        let category_id = selected.cloned().ok_or(UpdateCategoryFormError::Incomplete)?;
        self.validate()?;
        Ok(UpdateCategoryFormPayload {
            category_id,
            name: CategoryName::new(self.name)?,
        })
    }
}

/// Delete submission coming from the confirmation page.
#[derive(Deserialize)]
pub struct DeleteCategoryForm {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeleteCategoryFormError {
    #[error("Deletion was not confirmed.")]
    NotConfirmed,
    #[error("Category not found.")]
    InvalidId,
}

impl From<TypeConstraintError> for DeleteCategoryFormError {
    fn from(_: TypeConstraintError) -> Self {
        Self::InvalidId
    }
}

impl DeleteCategoryForm {
    pub fn into_payload(
        self,
        category_id: String,
    ) -> Result<DeleteCategoryFormPayload, DeleteCategoryFormError> {
        if !self.confirmed {
            return Err(DeleteCategoryFormError::NotConfirmed);
        }
        Ok(DeleteCategoryFormPayload {
            category_id: CategoryId::new(category_id)?,
        })
    }
}
