pub mod app_config;
pub mod application_repo;
pub mod assigned_tour_repo;
pub mod booking_repo;
pub mod convert;
pub mod database;
pub mod guide_repo;
pub mod identity_provider;
pub mod memory;
pub mod package_repo;
pub mod payment_repo;
pub mod profile_repo;
pub mod story_repo;
pub mod stripe_gateway;
pub mod user_repo;

use std::sync::Arc;

use tourbook_core::repository::{
    ApplicationRepository, AssignedTourRepository, BookingRepository, GuideRepository,
    PackageRepository, PaymentRepository, ProfileRepository, StoryRepository, UserRepository,
};

pub use app_config::Config;
pub use database::DbClient;
pub use identity_provider::verifier_from_config;
pub use memory::InMemoryStore;
pub use stripe_gateway::StripeGateway;

/// One handle per repository trait, shared by every handler.
#[derive(Clone)]
pub struct Repositories {
    pub packages: Arc<dyn PackageRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub guides: Arc<dyn GuideRepository>,
    pub stories: Arc<dyn StoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub assigned_tours: Arc<dyn AssignedTourRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

impl Repositories {
    pub fn mongo(db: &DbClient) -> Self {
        Self {
            packages: Arc::new(package_repo::MongoPackageRepository::new(db.clone())),
            bookings: Arc::new(booking_repo::MongoBookingRepository::new(db.clone())),
            applications: Arc::new(application_repo::MongoApplicationRepository::new(db.clone())),
            guides: Arc::new(guide_repo::MongoGuideRepository::new(db.clone())),
            stories: Arc::new(story_repo::MongoStoryRepository::new(db.clone())),
            users: Arc::new(user_repo::MongoUserRepository::new(db.clone())),
            profiles: Arc::new(profile_repo::MongoProfileRepository::new(db.clone())),
            assigned_tours: Arc::new(assigned_tour_repo::MongoAssignedTourRepository::new(
                db.clone(),
            )),
            payments: Arc::new(payment_repo::MongoPaymentRepository::new(db.clone())),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            packages: store.clone(),
            bookings: store.clone(),
            applications: store.clone(),
            guides: store.clone(),
            stories: store.clone(),
            users: store.clone(),
            profiles: store.clone(),
            assigned_tours: store.clone(),
            payments: store,
        }
    }
}
