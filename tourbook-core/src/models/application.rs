use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{missing_fields, present};
use crate::{CoreError, CoreResult};

pub const APPLICANT_ROLE: &str = "tourist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideApplication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub cv: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
    pub photo: Option<String>,
    pub cv: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub name: String,
    pub email: String,
    pub title: String,
    pub reason: String,
    pub photo: String,
    pub cv: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRequest> for NewApplication {
    type Error = CoreError;

    fn try_from(req: ApplicationRequest) -> CoreResult<Self> {
        match (
            present(req.name),
            present(req.email),
            present(req.title),
            present(req.reason),
            present(req.photo),
            present(req.cv),
        ) {
            (Some(name), Some(email), Some(title), Some(reason), Some(photo), Some(cv)) => Ok(Self {
                name,
                email,
                title,
                reason,
                photo,
                cv,
                created_at: Utc::now(),
            }),
            _ => Err(missing_fields()),
        }
    }
}

impl NewApplication {
    pub fn into_application(self, id: String) -> GuideApplication {
        GuideApplication {
            id,
            name: self.name,
            email: self.email,
            photo: self.photo,
            title: self.title,
            reason: self.reason,
            cv: self.cv,
            status: ApplicationStatus::Pending,
            role: APPLICANT_ROLE.to_string(),
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedApplication {
    /// False when the application was already accepted.
    pub updated: bool,
    pub guide_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MISSING_FIELDS;
    use serde_json::json;

    fn full() -> serde_json::Value {
        json!({
            "name": "Nadia",
            "email": "nadia@example.com",
            "title": "Hill tracts specialist",
            "reason": "I grew up in Bandarban",
            "photo": "https://img/nadia.jpg",
            "cv": "https://docs/nadia.pdf"
        })
    }

    #[test]
    fn test_complete_application_is_accepted() {
        let req: ApplicationRequest = serde_json::from_value(full()).unwrap();
        let app = NewApplication::try_from(req).unwrap().into_application("abc".into());
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.role, APPLICANT_ROLE);
    }

    #[test]
    fn test_every_field_is_required() {
        for field in ["name", "email", "title", "reason", "photo", "cv"] {
            let mut body = full();
            body.as_object_mut().unwrap().remove(field);
            let req: ApplicationRequest = serde_json::from_value(body).unwrap();
            match NewApplication::try_from(req) {
                Err(CoreError::Validation(msg)) => assert_eq!(msg, MISSING_FIELDS),
                other => panic!("{field}: expected validation error, got {other:?}"),
            }
        }
    }
}
