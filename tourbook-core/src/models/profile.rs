use serde::{Deserialize, Serialize};

use super::Extra;
use crate::validation::{present, strip_reserved};
use crate::{CoreError, CoreResult};

/// Loosely-typed profile document (tourist profile info, admin profile, or a
/// guide seen through the user directory). Only the fields the directory
/// sorts and filters on are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ProfileRecord {
    /// Name, else email, else empty.
    pub fn sort_key(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdminProfile {
    pub email: String,
    pub name: Option<String>,
    pub extra: Extra,
}

impl TryFrom<AdminProfileRequest> for NewAdminProfile {
    type Error = CoreError;

    fn try_from(req: AdminProfileRequest) -> CoreResult<Self> {
        let AdminProfileRequest { email, name, mut extra } = req;
        let email = present(email).ok_or_else(|| CoreError::Validation("Email is required".to_string()))?;
        strip_reserved(&mut extra, &[]);
        Ok(Self {
            email,
            name: present(name),
            extra,
        })
    }
}

impl NewAdminProfile {
    pub fn into_record(self, id: String) -> ProfileRecord {
        ProfileRecord {
            id,
            email: Some(self.email),
            name: self.name,
            role: None,
            extra: self.extra,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminProfileUpdateRequest {
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl TryFrom<AdminProfileUpdateRequest> for AdminProfileUpdate {
    type Error = CoreError;

    fn try_from(req: AdminProfileUpdateRequest) -> CoreResult<Self> {
        let update = Self {
            name: present(req.name),
            photo_url: present(req.photo_url),
        };
        if update.name.is_none() && update.photo_url.is_none() {
            return Err(CoreError::Validation("Nothing to update".to_string()));
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_round_trip() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "_id": "64b7f0c2a1b2c3d4e5f60718",
            "email": "admin@example.com",
            "photoURL": "https://img/a.png",
            "phone": "+8801"
        }))
        .unwrap();
        assert_eq!(record.sort_key(), "admin@example.com");
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["photoURL"], json!("https://img/a.png"));
        assert_eq!(back["phone"], json!("+8801"));
        assert!(back.get("name").is_none());
    }
}
