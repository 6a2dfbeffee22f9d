use async_trait::async_trait;
use mongodb::bson::doc;
use tourbook_core::models::{
    AssignedTour, AssignedTourStatus, AssignmentKey, NewAssignedTour, UpdateOutcome,
};
use tourbook_core::repository::AssignedTourRepository;
use tourbook_core::CoreResult;

use crate::convert::{decode_all, extra_document, inserted_id, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoAssignedTourRepository {
    db: DbClient,
}

impl MongoAssignedTourRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignedTourRepository for MongoAssignedTourRepository {
    async fn assign_tour(&self, tour: NewAssignedTour) -> CoreResult<String> {
        let mut doc = extra_document(&tour.extra)?;
        doc.insert("userEmail", tour.key.user_email);
        doc.insert("packageName", tour.key.package_name);
        doc.insert("tourGuideEmail", tour.key.tour_guide_email);
        doc.insert("status", tour.status.as_str());
        let result = self
            .db
            .assigned_tours()
            .insert_one(doc)
            .await
            .map_err(store_err)?;
        inserted_id(&result.inserted_id)
    }

    async fn list_assigned_tours(&self) -> CoreResult<Vec<AssignedTour>> {
        let cursor = self
            .db
            .assigned_tours()
            .find(doc! {})
            .await
            .map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn assigned_tours_for_guide(&self, email: &str) -> CoreResult<Vec<AssignedTour>> {
        let cursor = self
            .db
            .assigned_tours()
            .find(doc! { "tourGuideEmail": email })
            .await
            .map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn set_assigned_tour_status(
        &self,
        id: &str,
        status: AssignedTourStatus,
    ) -> CoreResult<UpdateOutcome> {
        let oid = parse_object_id(id)?;
        let result = self
            .db
            .assigned_tours()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await
            .map_err(store_err)?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn cancel_assigned_tour(&self, key: &AssignmentKey) -> CoreResult<bool> {
        let result = self
            .db
            .assigned_tours()
            .delete_one(doc! {
                "userEmail": key.user_email.as_str(),
                "packageName": key.package_name.as_str(),
                "tourGuideEmail": key.tour_guide_email.as_str(),
            })
            .await
            .map_err(store_err)?;
        Ok(result.deleted_count > 0)
    }
}
