use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use tourbook_core::models::application::APPLICANT_ROLE;
use tourbook_core::models::{
    AcceptedApplication, ApplicationStatus, GuideApplication, NewApplication, NewGuide, GUIDE_ROLE,
};
use tourbook_core::repository::ApplicationRepository;
use tourbook_core::CoreResult;
use tourbook_shared::{Masked, Pagination};
use tracing::info;

use crate::convert::{bson_datetime, decode, decode_all, inserted_id, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoApplicationRepository {
    db: DbClient,
}

impl MongoApplicationRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

fn guide_document(guide: NewGuide) -> Document {
    doc! {
        "name": guide.name,
        "email": guide.email,
        "photo": guide.photo,
        "role": GUIDE_ROLE,
        "createdAt": bson_datetime(guide.created_at),
        "stories": [],
    }
}

#[async_trait]
impl ApplicationRepository for MongoApplicationRepository {
    async fn submit_application(&self, application: NewApplication) -> CoreResult<String> {
        let doc = doc! {
            "name": application.name,
            "email": application.email,
            "photo": application.photo,
            "title": application.title,
            "reason": application.reason,
            "cv": application.cv,
            "status": "pending",
            "role": APPLICANT_ROLE,
            "createdAt": bson_datetime(application.created_at),
        };
        let result = self
            .db
            .applications()
            .insert_one(doc)
            .await
            .map_err(store_err)?;
        inserted_id(&result.inserted_id)
    }

    async fn list_applications(
        &self,
        pagination: Pagination,
    ) -> CoreResult<(Vec<GuideApplication>, u64)> {
        let collection = self.db.applications();
        let cursor = collection
            .find(doc! {})
            .skip(pagination.skip())
            .limit(i64::try_from(pagination.limit).unwrap_or(i64::MAX))
            .await
            .map_err(store_err)?;
        let page = decode_all(cursor).await?;
        let total = collection
            .count_documents(doc! {})
            .await
            .map_err(store_err)?;
        Ok((page, total))
    }

    async fn accept_application(&self, id: &str) -> CoreResult<Option<AcceptedApplication>> {
        let oid = parse_object_id(id)?;
        let mut session = self.db.begin().await?;

        let Some(found) = self
            .db
            .applications()
            .find_one(doc! { "_id": oid })
            .session(&mut session)
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };
        let application: GuideApplication = decode(found)?;

        let update = self
            .db
            .applications()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "status": "accepted", "role": GUIDE_ROLE } },
            )
            .session(&mut session)
            .await
            .map_err(store_err)?;

        let guide = guide_document(NewGuide::from(&application));
        let inserted = self
            .db
            .guides()
            .insert_one(guide)
            .session(&mut session)
            .await
            .map_err(store_err)?;
        let guide_id = inserted_id(&inserted.inserted_id)?;

        self.db.commit(session).await?;

        if application.status == ApplicationStatus::Accepted {
            info!(application_id = %id, "Application accepted again, another guide record created");
        }
        info!(
            application_id = %id,
            guide = %Masked(&application.email),
            %guide_id,
            "Application accepted"
        );
        Ok(Some(AcceptedApplication {
            updated: update.modified_count > 0,
            guide_id,
        }))
    }

    async fn reject_application(&self, id: &str) -> CoreResult<u64> {
        let oid = parse_object_id(id)?;
        let result = self
            .db
            .applications()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(store_err)?;
        Ok(result.deleted_count)
    }
}
