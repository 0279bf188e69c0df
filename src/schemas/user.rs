use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::types::Role;

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) user_id: String,
    pub(crate) role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct AdminUserCreate {
    #[serde(rename = "firstName", alias = "first_name", default)]
    #[validate(length(min = 1, max = 100, message = "firstName must not be empty"))]
    pub(crate) first_name: String,
    #[serde(rename = "lastName", alias = "last_name", default)]
    #[validate(length(max = 100, message = "lastName is too long"))]
    pub(crate) last_name: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
    #[serde(default = "default_role")]
    pub(crate) role: Role,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct AdminUserUpdate {
    #[serde(
        rename = "firstName",
        alias = "first_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 1, max = 100, message = "firstName must not be empty"))]
    pub(crate) first_name: Option<String>,
    #[serde(
        rename = "lastName",
        alias = "last_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 100, message = "lastName is too long"))]
    pub(crate) last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: Option<String>,
    // Blank passwords from the edit form mean "keep the current one".
    #[serde(default, skip_serializing_if = "blank_password")]
    pub(crate) password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<Role>,
}

fn default_role() -> Role {
    Role::Student
}

fn blank_password(password: &Option<String>) -> bool {
    password.as_deref().map_or(true, |value| value.trim().is_empty())
}
