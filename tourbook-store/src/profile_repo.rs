use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Collection;
use tourbook_core::directory::DirectoryFilter;
use tourbook_core::models::{
    AdminProfileUpdate, Extra, NewAdminProfile, ProfileRecord, UpdateOutcome,
};
use tourbook_core::repository::ProfileRepository;
use tourbook_core::CoreResult;

use crate::convert::{decode, decode_all, extra_document, inserted_id, regex_escape, store_err};
use crate::database::DbClient;

pub struct MongoProfileRepository {
    db: DbClient,
}

impl MongoProfileRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

/// The directory filter pushed down as a MongoDB query.
fn directory_query(filter: &DirectoryFilter) -> Document {
    let mut query = Document::new();
    if let Some(search) = &filter.search {
        let pattern = doc! { "$regex": regex_escape(search), "$options": "i" };
        query.insert(
            "$or",
            vec![
                Bson::Document(doc! { "name": pattern.clone() }),
                Bson::Document(doc! { "email": pattern }),
            ],
        );
    }
    if let Some(role) = &filter.role {
        query.insert("role", role.as_str());
    }
    query
}

async fn matching(
    collection: Collection<Document>,
    query: Document,
) -> CoreResult<Vec<ProfileRecord>> {
    let cursor = collection
        .find(query)
        .projection(doc! { "stories": 0 })
        .await
        .map_err(store_err)?;
    decode_all(cursor).await
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn save_tourist_profile(&self, email: &str, fields: Extra) -> CoreResult<UpdateOutcome> {
        let mut set = extra_document(&fields)?;
        set.insert("email", email);
        let result = self
            .db
            .tourist_profiles()
            .update_one(doc! { "email": email }, doc! { "$set": set })
            .upsert(true)
            .await
            .map_err(store_err)?;
        match result.upserted_id {
            Some(id) => Ok(UpdateOutcome::upserted(inserted_id(&id)?)),
            None => Ok(UpdateOutcome::new(result.matched_count, result.modified_count)),
        }
    }

    async fn find_admin_profile(&self, email: &str) -> CoreResult<Option<ProfileRecord>> {
        self.db
            .admins()
            .find_one(doc! { "email": email })
            .await
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    async fn create_admin_profile(&self, profile: NewAdminProfile) -> CoreResult<Option<String>> {
        let admins = self.db.admins();
        let exists = admins
            .count_documents(doc! { "email": profile.email.as_str() })
            .await
            .map_err(store_err)?;
        if exists > 0 {
            return Ok(None);
        }
        let mut doc = extra_document(&profile.extra)?;
        doc.insert("email", profile.email);
        if let Some(name) = profile.name {
            doc.insert("name", name);
        }
        let result = admins.insert_one(doc).await.map_err(store_err)?;
        Ok(Some(inserted_id(&result.inserted_id)?))
    }

    async fn update_admin_profile(
        &self,
        email: &str,
        update: AdminProfileUpdate,
    ) -> CoreResult<UpdateOutcome> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(photo) = update.photo_url {
            set.insert("photoURL", photo);
        }
        let result = self
            .db
            .admins()
            .update_one(doc! { "email": email }, doc! { "$set": set })
            .await
            .map_err(store_err)?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn directory_candidates(
        &self,
        filter: &DirectoryFilter,
    ) -> CoreResult<Vec<Vec<ProfileRecord>>> {
        let query = directory_query(filter);
        let (tourists, admins, guides) = tokio::try_join!(
            matching(self.db.tourist_profiles(), query.clone()),
            matching(self.db.admins(), query.clone()),
            matching(self.db.guides(), query),
        )?;
        Ok(vec![tourists, admins, guides])
    }
}
