use serde::{Deserialize, Serialize};

use super::Extra;
use crate::validation::{missing_fields, present, strip_reserved};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssignedTourStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "Accepted")]
    Accepted,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "in-review")]
    InReview,
}

impl AssignedTourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignedTourStatus::Pending => "pending",
            AssignedTourStatus::Accepted => "Accepted",
            AssignedTourStatus::Rejected => "Rejected",
            AssignedTourStatus::InReview => "in-review",
        }
    }
}

/// Value-equality match between a Booking and its AssignedTour. There is no
/// foreign key; all three fields must be equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentKey {
    pub user_email: String,
    pub package_name: String,
    pub tour_guide_email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentKeyRequest {
    pub user_email: Option<String>,
    pub package_name: Option<String>,
    pub tour_guide_email: Option<String>,
}

impl TryFrom<AssignmentKeyRequest> for AssignmentKey {
    type Error = CoreError;

    fn try_from(req: AssignmentKeyRequest) -> CoreResult<Self> {
        match (
            present(req.user_email),
            present(req.package_name),
            present(req.tour_guide_email),
        ) {
            (Some(user_email), Some(package_name), Some(tour_guide_email)) => Ok(Self {
                user_email,
                package_name,
                tour_guide_email,
            }),
            _ => Err(missing_fields()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTour {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_email: String,
    pub package_name: String,
    pub tour_guide_email: String,
    #[serde(default)]
    pub status: AssignedTourStatus,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AssignedTour {
    pub fn matches(&self, key: &AssignmentKey) -> bool {
        self.user_email == key.user_email
            && self.package_name == key.package_name
            && self.tour_guide_email == key.tour_guide_email
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTourRequest {
    pub user_email: Option<String>,
    pub package_name: Option<String>,
    pub tour_guide_email: Option<String>,
    pub status: Option<AssignedTourStatus>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignedTour {
    pub key: AssignmentKey,
    pub status: AssignedTourStatus,
    pub extra: Extra,
}

impl TryFrom<AssignedTourRequest> for NewAssignedTour {
    type Error = CoreError;

    fn try_from(req: AssignedTourRequest) -> CoreResult<Self> {
        let AssignedTourRequest {
            user_email,
            package_name,
            tour_guide_email,
            status,
            mut extra,
        } = req;
        let key = AssignmentKey::try_from(AssignmentKeyRequest {
            user_email,
            package_name,
            tour_guide_email,
        })?;
        strip_reserved(&mut extra, &[]);
        Ok(Self {
            key,
            status: status.unwrap_or_default(),
            extra,
        })
    }
}

impl NewAssignedTour {
    pub fn into_assigned_tour(self, id: String) -> AssignedTour {
        AssignedTour {
            id,
            user_email: self.key.user_email,
            package_name: self.key.package_name,
            tour_guide_email: self.key.tour_guide_email,
            status: self.status,
            extra: self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_defaults_to_pending() {
        let req: AssignedTourRequest = serde_json::from_value(json!({
            "userEmail": "tourist@example.com",
            "packageName": "Cox's Bazar Getaway",
            "tourGuideEmail": "guide@example.com",
            "tourDate": "2025-12-01"
        }))
        .unwrap();
        let tour = NewAssignedTour::try_from(req).unwrap();
        assert_eq!(tour.status, AssignedTourStatus::Pending);
        assert_eq!(tour.extra.get("tourDate"), Some(&json!("2025-12-01")));
    }

    #[test]
    fn test_match_needs_all_three_fields() {
        let tour = NewAssignedTour {
            key: AssignmentKey {
                user_email: "a@x.com".into(),
                package_name: "P".into(),
                tour_guide_email: "g@x.com".into(),
            },
            status: AssignedTourStatus::Accepted,
            extra: Extra::new(),
        }
        .into_assigned_tour("1".into());

        let mut key = tour_key();
        assert!(tour.matches(&key));
        key.package_name = "Q".into();
        assert!(!tour.matches(&key));
    }

    fn tour_key() -> AssignmentKey {
        AssignmentKey {
            user_email: "a@x.com".into(),
            package_name: "P".into(),
            tour_guide_email: "g@x.com".into(),
        }
    }
}
