use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AssignmentKey, Extra};
use crate::validation::{coerce_number, missing_fields, parse_date, present, strip_reserved};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "pending")]
    Pending,
    /// Set once a payment has been recorded against the booking.
    #[serde(rename = "in review")]
    InReview,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::InReview => "in review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub package_id: String,
    pub guide_id: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub tour_guide_email: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub tour_date: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Booking {
    /// The triple an AssignedTour is matched on.
    pub fn assignment_key(&self) -> AssignmentKey {
        AssignmentKey {
            user_email: self.user_email.clone(),
            package_name: self.package_name.clone(),
            tour_guide_email: self.tour_guide_email.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub package_id: Option<String>,
    pub guide_id: Option<String>,
    pub package_name: Option<String>,
    pub tour_guide_email: Option<String>,
    pub user_email: Option<String>,
    pub price: Option<Value>,
    pub tour_date: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub package_id: String,
    pub guide_id: String,
    pub package_name: String,
    pub tour_guide_email: String,
    pub user_email: String,
    pub price: f64,
    pub tour_date: DateTime<Utc>,
    pub extra: Extra,
}

impl TryFrom<BookingRequest> for NewBooking {
    type Error = CoreError;

    fn try_from(req: BookingRequest) -> CoreResult<Self> {
        let BookingRequest {
            package_id,
            guide_id,
            package_name,
            tour_guide_email,
            user_email,
            price,
            tour_date,
            mut extra,
        } = req;

        let price = price.as_ref().and_then(coerce_number);
        let (
            Some(package_id),
            Some(guide_id),
            Some(package_name),
            Some(tour_guide_email),
            Some(user_email),
            Some(price),
            Some(tour_date),
        ) = (
            present(package_id),
            present(guide_id),
            present(package_name),
            present(tour_guide_email),
            present(user_email),
            price,
            present(tour_date),
        )
        else {
            return Err(missing_fields());
        };

        strip_reserved(&mut extra, &["status"]);

        Ok(Self {
            package_id,
            guide_id,
            package_name,
            tour_guide_email,
            user_email,
            price,
            tour_date: parse_date(&tour_date)?,
            extra,
        })
    }
}

impl NewBooking {
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            package_id: self.package_id,
            guide_id: self.guide_id,
            package_name: self.package_name,
            tour_guide_email: self.tour_guide_email,
            user_email: self.user_email,
            price: self.price,
            tour_date: Some(self.tour_date),
            status: BookingStatus::Pending,
            extra: self.extra,
        }
    }
}

/// Result of a cancellation: the removed booking's id and triple, and
/// whether a matching AssignedTour was removed alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelledBooking {
    pub booking_id: String,
    pub key: AssignmentKey,
    pub assignment_removed: bool,
}
