use serde::Deserialize;

use super::{Extra, UpdateOutcome};
use crate::validation::{present, strip_reserved};
use crate::{CoreError, CoreResult};

/// Role given to plain tourist accounts; counted as "clients" on the dashboard.
pub const CLIENT_ROLE: &str = "user";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub role: String,
    pub extra: Extra,
}

impl TryFrom<UserRequest> for NewUser {
    type Error = CoreError;

    fn try_from(req: UserRequest) -> CoreResult<Self> {
        let UserRequest { email, role, mut extra } = req;
        let email = present(email).ok_or_else(|| CoreError::Validation("Email is required".to_string()))?;
        strip_reserved(&mut extra, &["stories"]);
        Ok(Self {
            email,
            role: present(role).unwrap_or_else(|| CLIENT_ROLE.to_string()),
            extra,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Existing(String),
    Created(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct UserProfileRequest {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Only used when the user record is created; never overwrites.
    pub role: String,
}

impl From<UserProfileRequest> for UserProfileUpdate {
    fn from(req: UserProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            photo_url: req.photo_url,
            role: present(req.role).unwrap_or_else(|| CLIENT_ROLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfileSave {
    Inserted(String),
    Updated(UpdateOutcome),
}
