use async_trait::async_trait;
use mongodb::bson::doc;
use tourbook_core::models::{Booking, BookingStatus, CancelledBooking, NewBooking};
use tourbook_core::repository::BookingRepository;
use tourbook_core::CoreResult;
use tourbook_shared::Masked;
use tracing::info;

use crate::convert::{
    assignment_key_of, bson_datetime, decode, decode_all, extra_document, inserted_id,
    parse_object_id, store_err,
};
use crate::database::DbClient;

pub struct MongoBookingRepository {
    db: DbClient,
}

impl MongoBookingRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<String> {
        let package_id = parse_object_id(&booking.package_id)?;
        let guide_id = parse_object_id(&booking.guide_id)?;

        let mut doc = extra_document(&booking.extra)?;
        doc.insert("packageId", package_id);
        doc.insert("guideId", guide_id);
        doc.insert("packageName", booking.package_name);
        doc.insert("tourGuideEmail", booking.tour_guide_email);
        doc.insert("userEmail", booking.user_email);
        doc.insert("price", booking.price);
        doc.insert("tourDate", bson_datetime(booking.tour_date));
        doc.insert("status", BookingStatus::Pending.as_str());

        let result = self.db.bookings().insert_one(doc).await.map_err(store_err)?;
        inserted_id(&result.inserted_id)
    }

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        let cursor = self.db.bookings().find(doc! {}).await.map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn list_bookings_for_user(&self, email: &str) -> CoreResult<Vec<Booking>> {
        let cursor = self
            .db
            .bookings()
            .find(doc! { "userEmail": email })
            .await
            .map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn get_booking(&self, id: &str) -> CoreResult<Option<Booking>> {
        let oid = parse_object_id(id)?;
        self.db
            .bookings()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    async fn cancel_booking(&self, id: &str) -> CoreResult<Option<CancelledBooking>> {
        let oid = parse_object_id(id)?;
        let mut session = self.db.begin().await?;

        let Some(removed) = self
            .db
            .bookings()
            .find_one_and_delete(doc! { "_id": oid })
            .session(&mut session)
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };
        let booking_id = oid.to_hex();
        let key = assignment_key_of(&removed);

        let result = self
            .db
            .assigned_tours()
            .delete_one(doc! {
                "userEmail": key.user_email.as_str(),
                "packageName": key.package_name.as_str(),
                "tourGuideEmail": key.tour_guide_email.as_str(),
            })
            .session(&mut session)
            .await
            .map_err(store_err)?;

        self.db.commit(session).await?;

        let assignment_removed = result.deleted_count > 0;
        info!(
            %booking_id,
            user = %Masked(&key.user_email),
            assignment_removed,
            "Booking cancelled"
        );
        Ok(Some(CancelledBooking {
            booking_id,
            key,
            assignment_removed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_key_survives_loose_booking() {
        let stored = doc! {
            "userEmail": "karim@example.com",
            "packageName": "Sundarbans Safari",
            "tourGuideEmail": "rahim@example.com",
            "price": "250",
            "status": "confirmed",
        };
        let key = assignment_key_of(&stored);
        assert_eq!(key.user_email, "karim@example.com");
        assert_eq!(key.package_name, "Sundarbans Safari");
        assert_eq!(key.tour_guide_email, "rahim@example.com");
    }

    #[test]
    fn test_assignment_key_missing_fields_are_empty() {
        let key = assignment_key_of(&doc! { "userEmail": 42 });
        assert_eq!(key.user_email, "");
        assert_eq!(key.package_name, "");
    }
}
