use async_trait::async_trait;
use mongodb::bson::doc;
use serde::Deserialize;
use tourbook_core::models::{AssignedTourStatus, BookingStatus, NewPayment};
use tourbook_core::repository::PaymentRepository;
use tourbook_core::CoreResult;
use tracing::info;

use crate::convert::{assignment_key_of, bson_datetime, decode_all, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoPaymentRepository {
    db: DbClient,
}

impl MongoPaymentRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[derive(Deserialize)]
struct PaymentTotal {
    total: f64,
}

#[async_trait]
impl PaymentRepository for MongoPaymentRepository {
    async fn record_payment(&self, payment: NewPayment) -> CoreResult<bool> {
        let booking_oid = parse_object_id(&payment.booking_id)?;
        let mut session = self.db.begin().await?;

        let Some(found) = self
            .db
            .bookings()
            .find_one(doc! { "_id": booking_oid })
            .session(&mut session)
            .await
            .map_err(store_err)?
        else {
            return Ok(false);
        };
        let key = assignment_key_of(&found);

        self.db
            .payments()
            .insert_one(doc! {
                "transactionId": payment.transaction_id.as_str(),
                "bookingId": booking_oid,
                "amount": payment.amount,
                "date": bson_datetime(payment.date),
            })
            .session(&mut session)
            .await
            .map_err(store_err)?;

        self.db
            .bookings()
            .update_one(
                doc! { "_id": booking_oid },
                doc! { "$set": { "status": BookingStatus::InReview.as_str() } },
            )
            .session(&mut session)
            .await
            .map_err(store_err)?;

        let assignment = self
            .db
            .assigned_tours()
            .update_one(
                doc! {
                    "userEmail": key.user_email.as_str(),
                    "packageName": key.package_name.as_str(),
                    "tourGuideEmail": key.tour_guide_email.as_str(),
                },
                doc! { "$set": { "status": AssignedTourStatus::InReview.as_str() } },
            )
            .session(&mut session)
            .await
            .map_err(store_err)?;

        self.db.commit(session).await?;

        info!(
            booking_id = %payment.booking_id,
            transaction_id = %payment.transaction_id,
            assignment_updated = assignment.matched_count > 0,
            "Payment recorded"
        );
        Ok(true)
    }

    async fn total_payments(&self) -> CoreResult<f64> {
        let cursor = self
            .db
            .payments()
            .aggregate(vec![
                doc! { "$group": { "_id": null, "total": { "$sum": "$amount" } } },
            ])
            .await
            .map_err(store_err)?;
        let totals: Vec<PaymentTotal> = decode_all(cursor).await?;
        Ok(totals.first().map(|t| t.total).unwrap_or(0.0))
    }
}
