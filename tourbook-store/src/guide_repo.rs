use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use tourbook_core::models::{GuideProfileUpdate, TourGuide, UpdateOutcome};
use tourbook_core::repository::GuideRepository;
use tourbook_core::CoreResult;

use crate::convert::{decode, decode_all, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoGuideRepository {
    db: DbClient,
}

impl MongoGuideRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuideRepository for MongoGuideRepository {
    async fn list_guides(&self) -> CoreResult<Vec<TourGuide>> {
        let cursor = self.db.guides().find(doc! {}).await.map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn sample_guides(&self, size: usize) -> CoreResult<Vec<TourGuide>> {
        let size = i64::try_from(size).unwrap_or(i64::MAX);
        let cursor = self
            .db
            .guides()
            .aggregate(vec![doc! { "$sample": { "size": size } }])
            .await
            .map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn get_guide(&self, id: &str) -> CoreResult<Option<TourGuide>> {
        let oid = parse_object_id(id)?;
        self.db
            .guides()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    async fn find_guide_by_email(&self, email: &str) -> CoreResult<Option<TourGuide>> {
        self.db
            .guides()
            .find_one(doc! { "email": email })
            .await
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    async fn update_guide_profile(
        &self,
        id: &str,
        update: GuideProfileUpdate,
    ) -> CoreResult<UpdateOutcome> {
        let oid = parse_object_id(id)?;
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(photo) = update.photo {
            set.insert("photo", photo);
        }
        let result = self
            .db
            .guides()
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await
            .map_err(store_err)?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn count_guides_with_role(&self, role: &str) -> CoreResult<u64> {
        self.db
            .guides()
            .count_documents(doc! { "role": role })
            .await
            .map_err(store_err)
    }
}
