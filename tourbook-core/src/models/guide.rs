use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Extra, GuideApplication, Story};
use crate::validation::present;
use crate::{CoreError, CoreResult};

pub const GUIDE_ROLE: &str = "tour guide";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourGuide {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A guide record spawned from an accepted application.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGuide {
    pub name: String,
    pub email: String,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

impl From<&GuideApplication> for NewGuide {
    fn from(app: &GuideApplication) -> Self {
        Self {
            name: app.name.clone(),
            email: app.email.clone(),
            photo: app.photo.clone(),
            created_at: Utc::now(),
        }
    }
}

impl NewGuide {
    pub fn into_guide(self, id: String) -> TourGuide {
        TourGuide {
            id,
            name: self.name,
            email: self.email,
            photo: self.photo,
            role: GUIDE_ROLE.to_string(),
            created_at: Some(self.created_at),
            stories: Vec::new(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GuideProfileRequest {
    pub name: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideProfileUpdate {
    pub name: Option<String>,
    pub photo: Option<String>,
}

impl TryFrom<GuideProfileRequest> for GuideProfileUpdate {
    type Error = CoreError;

    fn try_from(req: GuideProfileRequest) -> CoreResult<Self> {
        let update = Self {
            name: present(req.name),
            photo: present(req.photo),
        };
        if update.name.is_none() && update.photo.is_none() {
            return Err(CoreError::Validation("Nothing to update".to_string()));
        }
        Ok(update)
    }
}

impl GuideProfileUpdate {
    /// Applies the update in place; returns whether anything changed.
    pub fn apply(&self, guide: &mut TourGuide) -> bool {
        let mut changed = false;
        if let Some(name) = &self.name {
            changed |= guide.name != *name;
            guide.name = name.clone();
        }
        if let Some(photo) = &self.photo {
            changed |= guide.photo != *photo;
            guide.photo = photo.clone();
        }
        changed
    }
}
