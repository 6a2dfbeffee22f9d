use async_trait::async_trait;
use tourbook_shared::Pagination;

use crate::directory::DirectoryFilter;
use crate::models::{
    AcceptedApplication, AdminProfileUpdate, AssignedTour, AssignedTourStatus, AssignmentKey,
    Booking, CancelledBooking, Extra, GuideApplication, GuideProfileUpdate, NewAdminProfile,
    NewApplication, NewAssignedTour, NewBooking, NewPackage, NewPayment, NewStory, NewUser,
    ProfileRecord, Registration, Story, StoryCard, StoryEdit, StoryOwner, TourGuide, TourPackage,
    UpdateOutcome, UserProfileSave, UserProfileUpdate,
};
use crate::CoreResult;

/// Identifiers are passed as strings. Implementations reject malformed ones
/// with [`crate::CoreError::InvalidId`].
#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create_package(&self, package: NewPackage) -> CoreResult<String>;

    async fn list_packages(&self) -> CoreResult<Vec<TourPackage>>;

    async fn get_package(&self, id: &str) -> CoreResult<Option<TourPackage>>;

    async fn count_packages(&self) -> CoreResult<u64>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<String>;

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>>;

    async fn list_bookings_for_user(&self, email: &str) -> CoreResult<Vec<Booking>>;

    async fn get_booking(&self, id: &str) -> CoreResult<Option<Booking>>;

    /// Delete the booking and the AssignedTour matching its triple as one
    /// unit. `None` when the booking does not exist.
    async fn cancel_booking(&self, id: &str) -> CoreResult<Option<CancelledBooking>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn submit_application(&self, application: NewApplication) -> CoreResult<String>;

    /// One page plus the total number of applications.
    async fn list_applications(
        &self,
        pagination: Pagination,
    ) -> CoreResult<(Vec<GuideApplication>, u64)>;

    /// Mark accepted and insert a TourGuide built from the application.
    /// Every call inserts a new guide, even for an already accepted
    /// application.
    async fn accept_application(&self, id: &str) -> CoreResult<Option<AcceptedApplication>>;

    /// Returns the number of deleted applications (0 or 1).
    async fn reject_application(&self, id: &str) -> CoreResult<u64>;
}

#[async_trait]
pub trait GuideRepository: Send + Sync {
    async fn list_guides(&self) -> CoreResult<Vec<TourGuide>>;

    async fn sample_guides(&self, size: usize) -> CoreResult<Vec<TourGuide>>;

    async fn get_guide(&self, id: &str) -> CoreResult<Option<TourGuide>>;

    async fn find_guide_by_email(&self, email: &str) -> CoreResult<Option<TourGuide>>;

    async fn update_guide_profile(
        &self,
        id: &str,
        update: GuideProfileUpdate,
    ) -> CoreResult<UpdateOutcome>;

    async fn count_guides_with_role(&self, role: &str) -> CoreResult<u64>;
}

/// Stories embedded in guide and user documents. The owner selects the
/// parent collection; story ids are unique across both.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Append to the parent found by `story.email`. `None` when no such parent.
    async fn push_story(&self, owner: StoryOwner, story: NewStory) -> CoreResult<Option<Story>>;

    /// Remove a story from the parent with `email`. False when nothing was removed.
    async fn pull_story(&self, owner: StoryOwner, email: &str, story_id: &str) -> CoreResult<bool>;

    async fn find_story(&self, owner: StoryOwner, story_id: &str) -> CoreResult<Option<Story>>;

    /// Stories of one parent. `None` when the parent does not exist.
    async fn stories_of(&self, owner: StoryOwner, email: &str) -> CoreResult<Option<Vec<Story>>>;

    /// Every story of every parent, with the parent's email stamped on each.
    async fn all_stories(&self, owner: StoryOwner) -> CoreResult<Vec<Story>>;

    async fn sample_stories(&self, owner: StoryOwner, size: usize) -> CoreResult<Vec<StoryCard>>;

    /// Newest first.
    async fn recent_stories(&self, owner: StoryOwner) -> CoreResult<Vec<StoryCard>>;

    async fn add_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome>;

    async fn remove_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome>;

    async fn edit_story(
        &self,
        owner: StoryOwner,
        story_id: &str,
        edit: StoryEdit,
    ) -> CoreResult<UpdateOutcome>;

    async fn count_stories(&self, owner: StoryOwner) -> CoreResult<u64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert unless a user with the same email exists.
    async fn register_user(&self, user: NewUser) -> CoreResult<Registration>;

    /// Insert with the given role when absent, else update display name and
    /// photo only.
    async fn save_user_profile(
        &self,
        email: &str,
        update: UserProfileUpdate,
    ) -> CoreResult<UserProfileSave>;

    async fn count_users_with_role(&self, role: &str) -> CoreResult<u64>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Upsert the tourist profile keyed by `email`, `$set`-ing every field.
    async fn save_tourist_profile(&self, email: &str, fields: Extra) -> CoreResult<UpdateOutcome>;

    async fn find_admin_profile(&self, email: &str) -> CoreResult<Option<ProfileRecord>>;

    /// `None` when an admin profile with that email already exists.
    async fn create_admin_profile(&self, profile: NewAdminProfile) -> CoreResult<Option<String>>;

    async fn update_admin_profile(
        &self,
        email: &str,
        update: AdminProfileUpdate,
    ) -> CoreResult<UpdateOutcome>;

    /// Matching records from the tourist-profile, admin and guide
    /// collections, one group per collection, unsorted.
    async fn directory_candidates(
        &self,
        filter: &DirectoryFilter,
    ) -> CoreResult<Vec<Vec<ProfileRecord>>>;
}

#[async_trait]
pub trait AssignedTourRepository: Send + Sync {
    async fn assign_tour(&self, tour: NewAssignedTour) -> CoreResult<String>;

    async fn list_assigned_tours(&self) -> CoreResult<Vec<AssignedTour>>;

    async fn assigned_tours_for_guide(&self, email: &str) -> CoreResult<Vec<AssignedTour>>;

    async fn set_assigned_tour_status(
        &self,
        id: &str,
        status: AssignedTourStatus,
    ) -> CoreResult<UpdateOutcome>;

    /// Delete one AssignedTour matching the triple.
    async fn cancel_assigned_tour(&self, key: &AssignmentKey) -> CoreResult<bool>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert the payment, mark the booking in review and the matching
    /// AssignedTour in-review as one unit. `false` (nothing written) when the
    /// booking does not exist.
    async fn record_payment(&self, payment: NewPayment) -> CoreResult<bool>;

    async fn total_payments(&self) -> CoreResult<f64>;
}
