use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use tourbook_core::models::{NewUser, Registration, UpdateOutcome, UserProfileSave, UserProfileUpdate};
use tourbook_core::repository::UserRepository;
use tourbook_core::{CoreError, CoreResult};

use crate::convert::{extra_document, inserted_id, store_err};
use crate::database::DbClient;

pub struct MongoUserRepository {
    db: DbClient,
}

impl MongoUserRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    async fn existing_id(&self, email: &str) -> CoreResult<Option<String>> {
        let found = self
            .db
            .users()
            .find_one(doc! { "email": email })
            .projection(doc! { "_id": 1 })
            .await
            .map_err(store_err)?;
        found
            .map(|doc| {
                doc.get_object_id("_id")
                    .map(|oid| oid.to_hex())
                    .map_err(|e| CoreError::Store(e.to_string()))
            })
            .transpose()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn register_user(&self, user: NewUser) -> CoreResult<Registration> {
        if let Some(id) = self.existing_id(&user.email).await? {
            return Ok(Registration::Existing(id));
        }
        let mut doc = extra_document(&user.extra)?;
        doc.insert("email", user.email);
        doc.insert("role", user.role);
        let result = self.db.users().insert_one(doc).await.map_err(store_err)?;
        Ok(Registration::Created(inserted_id(&result.inserted_id)?))
    }

    async fn save_user_profile(
        &self,
        email: &str,
        update: UserProfileUpdate,
    ) -> CoreResult<UserProfileSave> {
        if self.existing_id(email).await?.is_none() {
            let doc = doc! {
                "email": email,
                "displayName": update.display_name,
                "photoURL": update.photo_url,
                "role": update.role,
            };
            let result = self.db.users().insert_one(doc).await.map_err(store_err)?;
            return Ok(UserProfileSave::Inserted(inserted_id(&result.inserted_id)?));
        }

        let mut set = Document::new();
        if let Some(name) = update.display_name {
            set.insert("displayName", name);
        }
        if let Some(photo) = update.photo_url {
            set.insert("photoURL", photo);
        }
        if set.is_empty() {
            return Ok(UserProfileSave::Updated(UpdateOutcome::new(1, 0)));
        }
        let result = self
            .db
            .users()
            .update_one(doc! { "email": email }, doc! { "$set": set })
            .await
            .map_err(store_err)?;
        Ok(UserProfileSave::Updated(UpdateOutcome::new(
            result.matched_count,
            result.modified_count,
        )))
    }

    async fn count_users_with_role(&self, role: &str) -> CoreResult<u64> {
        self.db
            .users()
            .count_documents(doc! { "role": role })
            .await
            .map_err(store_err)
    }
}
