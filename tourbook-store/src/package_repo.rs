use async_trait::async_trait;
use mongodb::bson::doc;
use tourbook_core::models::{NewPackage, TourPackage};
use tourbook_core::repository::PackageRepository;
use tourbook_core::CoreResult;

use crate::convert::{decode, decode_all, inserted_id, json_to_bson, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoPackageRepository {
    db: DbClient,
}

impl MongoPackageRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PackageRepository for MongoPackageRepository {
    async fn create_package(&self, package: NewPackage) -> CoreResult<String> {
        let doc = doc! {
            "tourType": package.tour_type,
            "price": package.price,
            "info": json_to_bson(&package.info)?,
            "email": package.email,
            "tourPlan": json_to_bson(&package.tour_plan)?,
            "photos": package.photos,
        };
        let result = self.db.packages().insert_one(doc).await.map_err(store_err)?;
        inserted_id(&result.inserted_id)
    }

    async fn list_packages(&self) -> CoreResult<Vec<TourPackage>> {
        let cursor = self.db.packages().find(doc! {}).await.map_err(store_err)?;
        decode_all(cursor).await
    }

    async fn get_package(&self, id: &str) -> CoreResult<Option<TourPackage>> {
        let oid = parse_object_id(id)?;
        self.db
            .packages()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(store_err)?
            .map(decode)
            .transpose()
    }

    async fn count_packages(&self) -> CoreResult<u64> {
        self.db
            .packages()
            .count_documents(doc! {})
            .await
            .map_err(store_err)
    }
}
