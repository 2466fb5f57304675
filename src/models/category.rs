//! Wire representation of the remote category endpoint.
//!
//! Field names follow the backend verbatim; conversion into domain types
//! happens through [`TryFrom`] so the rest of the crate never sees raw rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::category::{Category, CategoryMutation};
use crate::domain::identity::ClientIdentity;
use crate::domain::types::{CategoryId, CategoryName, DeletedFlag, TypeConstraintError, UserName};

/// `run` selector values understood by the backend.
pub const RUN_LIST: &str = "get_all_main_cat";
pub const RUN_INSERT: &str = "insert_main_catagory";
pub const RUN_UPDATE: &str = "update_main_catagory";

/// Identifier as sent by the backend, which may use numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl TryFrom<RawId> for CategoryId {
    type Error = TypeConstraintError;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Number(n) => CategoryId::new(n.to_string()),
            RawId::Text(s) => CategoryId::new(s),
        }
    }
}

/// Row of the `get_all_main_cat` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    #[serde(rename = "MAIN_CAT_ID")]
    pub main_cat_id: RawId,
    #[serde(rename = "MAIN_CAT_NAME")]
    pub main_cat_name: String,
    #[serde(rename = "CREATED_USER", default)]
    pub created_user: Option<String>,
    #[serde(rename = "CREATED_TIME", default)]
    pub created_time: Option<String>,
    #[serde(rename = "LAST_UPD_USER", default)]
    pub last_upd_user: Option<String>,
    #[serde(rename = "LAST_UPD_TIME", default)]
    pub last_upd_time: Option<String>,
}

/// Parse the timestamp formats the backend and older clients produce.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn optional_user(value: Option<String>) -> Option<UserName> {
    value.and_then(|v| UserName::new(v).ok())
}

fn optional_timestamp(value: Option<String>, field: &str) -> Option<NaiveDateTime> {
    let raw = value?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        log::warn!("Unparsable {field} timestamp from backend: {raw}");
    }
    parsed
}

impl TryFrom<CategoryRow> for Category {
    type Error = TypeConstraintError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.main_cat_id.try_into()?,
            name: CategoryName::new(row.main_cat_name)?,
            created_by: optional_user(row.created_user),
            created_at: optional_timestamp(row.created_time, "CREATED_TIME"),
            updated_by: optional_user(row.last_upd_user),
            updated_at: optional_timestamp(row.last_upd_time, "LAST_UPD_TIME"),
        })
    }
}

/// Identity pair carried by every request body.
#[derive(Debug, Serialize)]
pub struct IdentityBody<'a> {
    #[serde(rename = "deviceType")]
    pub device_type: &'a str,
    pub username: &'a str,
}

impl<'a> From<&'a ClientIdentity> for IdentityBody<'a> {
    fn from(value: &'a ClientIdentity) -> Self {
        Self {
            device_type: value.device_type.as_str(),
            username: value.username.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InsertCategoryBody<'a> {
    #[serde(flatten)]
    pub identity: IdentityBody<'a>,
    pub cat_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateCategoryBody<'a> {
    #[serde(flatten)]
    pub identity: IdentityBody<'a>,
    pub cat_name: &'a str,
    pub main_cat_id: &'a str,
    pub deleted_flg: DeletedFlag,
}

impl<'a> UpdateCategoryBody<'a> {
    pub fn new(identity: &'a ClientIdentity, mutation: &'a CategoryMutation) -> Self {
        Self {
            identity: identity.into(),
            cat_name: mutation.name().as_str(),
            main_cat_id: mutation.id().as_str(),
            deleted_flg: mutation.deleted_flag(),
        }
    }
}

/// Accepts `true`, non-zero numbers and `"true"`/`"1"`; everything else,
/// including `null`, counts as failure.
fn success_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListCategoriesResponse {
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct InsertCategoryResponse {
    #[serde(default, deserialize_with = "success_flag")]
    pub success: bool,
    #[serde(rename = "newCategoryId", default)]
    pub new_category_id: Option<RawId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryResponse {
    #[serde(default, deserialize_with = "success_flag")]
    pub success: bool,
}
