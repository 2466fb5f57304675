use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, DeletedFlag, UserName};

/// Live category record as held by the local store.
///
/// Audit fields are optional because the backend does not guarantee them on
/// every row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub created_by: Option<UserName>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_by: Option<UserName>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub created_by: UserName,
    pub created_at: NaiveDateTime,
}

impl NewCategory {
    /// Builds the local copy of a record once the backend issued its id.
    ///
    /// Timestamps come from the local clock and may differ from what the
    /// backend stored.
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            created_by: Some(self.created_by.clone()),
            created_at: Some(self.created_at),
            updated_by: Some(self.created_by),
            updated_at: Some(self.created_at),
        }
    }
}

/// Change sent through the shared `update_main_catagory` endpoint.
///
/// Both variants travel as "full record + flag"; they differ only in the
/// flag and in what happens locally once the backend confirms.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryMutation {
    Rename { id: CategoryId, name: CategoryName },
    SoftDelete { id: CategoryId, name: CategoryName },
}

impl CategoryMutation {
    pub fn id(&self) -> &CategoryId {
        match self {
            Self::Rename { id, .. } | Self::SoftDelete { id, .. } => id,
        }
    }

    /// Name sent as `cat_name`; for deletes this is the current name.
    pub fn name(&self) -> &CategoryName {
        match self {
            Self::Rename { name, .. } | Self::SoftDelete { name, .. } => name,
        }
    }

    pub fn deleted_flag(&self) -> DeletedFlag {
        match self {
            Self::Rename { .. } => DeletedFlag::Update,
            Self::SoftDelete { .. } => DeletedFlag::Delete,
        }
    }

    /// Local effect to apply after the backend accepted the mutation.
    pub fn into_outcome(self, updated_by: UserName, updated_at: NaiveDateTime) -> MutationOutcome {
        match self {
            Self::Rename { id, name } => MutationOutcome::Renamed {
                id,
                name,
                updated_by,
                updated_at,
            },
            Self::SoftDelete { id, .. } => MutationOutcome::Removed { id },
        }
    }
}

/// Typed local effect of a confirmed [`CategoryMutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Renamed {
        id: CategoryId,
        name: CategoryName,
        updated_by: UserName,
        updated_at: NaiveDateTime,
    },
    Removed {
        id: CategoryId,
    },
}

impl MutationOutcome {
    pub fn id(&self) -> &CategoryId {
        match self {
            Self::Renamed { id, .. } | Self::Removed { id } => id,
        }
    }
}
