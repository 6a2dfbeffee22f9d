//! In-process store behind the same repository traits, used by the HTTP
//! tests. One async `RwLock` guards all collections, so multi-step writes are
//! atomic here too.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use rand::seq::SliceRandom;
use serde_json::Value;
use tokio::sync::RwLock;
use tourbook_core::directory::DirectoryFilter;
use tourbook_core::models::{
    AcceptedApplication, AdminProfileUpdate, ApplicationStatus, AssignedTour, AssignedTourStatus,
    AssignmentKey, Booking, BookingStatus, CancelledBooking, Extra, GuideApplication,
    GuideProfileUpdate, NewAdminProfile, NewApplication, NewAssignedTour, NewBooking, NewGuide,
    NewPackage, NewPayment, NewStory, NewUser, PaymentRecord, ProfileRecord, Registration, Story,
    StoryCard, StoryEdit, StoryOwner, TourGuide, TourPackage, UpdateOutcome, UserProfileSave,
    UserProfileUpdate, GUIDE_ROLE,
};
use tourbook_core::repository::{
    ApplicationRepository, AssignedTourRepository, BookingRepository, GuideRepository,
    PackageRepository, PaymentRepository, ProfileRepository, StoryRepository, UserRepository,
};
use tourbook_core::{CoreError, CoreResult};
use tourbook_shared::Pagination;

use crate::convert::parse_object_id;

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    email: String,
    role: String,
    display_name: Option<String>,
    photo_url: Option<String>,
    stories: Vec<Story>,
}

#[derive(Default)]
struct Collections {
    packages: Vec<TourPackage>,
    applications: Vec<GuideApplication>,
    guides: Vec<TourGuide>,
    bookings: Vec<Booking>,
    payments: Vec<PaymentRecord>,
    users: Vec<StoredUser>,
    assigned_tours: Vec<AssignedTour>,
    tourist_profiles: Vec<ProfileRecord>,
    admins: Vec<ProfileRecord>,
}

impl Collections {
    /// `(parent email, stories)` for every parent of the given kind.
    fn story_parents(&mut self, owner: StoryOwner) -> Vec<(&str, &mut Vec<Story>)> {
        match owner {
            StoryOwner::Guide => self
                .guides
                .iter_mut()
                .map(|g| (g.email.as_str(), &mut g.stories))
                .collect(),
            StoryOwner::User => self
                .users
                .iter_mut()
                .map(|u| (u.email.as_str(), &mut u.stories))
                .collect(),
        }
    }

    fn find_story_mut(&mut self, owner: StoryOwner, id: &str) -> Option<&mut Story> {
        self.story_parents(owner)
            .into_iter()
            .flat_map(|(_, stories)| stories.into_iter())
            .find(|s| s.id == id)
    }

    fn story_cards(&mut self, owner: StoryOwner) -> Vec<StoryCard> {
        self.story_parents(owner)
            .into_iter()
            .flat_map(|(email, stories)| {
                stories
                    .iter()
                    .map(|s| StoryCard::from_story(s, email))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    ObjectId::new().to_hex()
}

/// Validates like the MongoDB adapter and normalises to lowercase hex.
fn check_id(id: &str) -> CoreResult<String> {
    Ok(parse_object_id(id)?.to_hex())
}

fn sample<T: Clone>(items: &[T], size: usize) -> Vec<T> {
    let mut rng = rand::thread_rng();
    items.choose_multiple(&mut rng, size).cloned().collect()
}

fn touched(changed: bool) -> UpdateOutcome {
    UpdateOutcome::new(1, u64::from(changed))
}

/// `$set` of `fields` over an existing profile, as a fresh record.
fn merge_profile(existing: Option<&ProfileRecord>, id: &str, fields: Extra) -> CoreResult<ProfileRecord> {
    let mut map = match existing {
        Some(record) => match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Extra::new(),
        },
        None => Extra::new(),
    };
    map.extend(fields);
    map.insert("_id".into(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(map)).map_err(|e| CoreError::Store(e.to_string()))
}

fn guide_profile(guide: &TourGuide) -> ProfileRecord {
    let mut extra = guide.extra.clone();
    extra.insert("photo".into(), Value::String(guide.photo.clone()));
    ProfileRecord {
        id: guide.id.clone(),
        email: Some(guide.email.clone()),
        name: Some(guide.name.clone()),
        role: Some(guide.role.clone()),
        extra,
    }
}

#[async_trait]
impl PackageRepository for InMemoryStore {
    async fn create_package(&self, package: NewPackage) -> CoreResult<String> {
        let id = new_id();
        self.inner
            .write()
            .await
            .packages
            .push(package.into_package(id.clone()));
        Ok(id)
    }

    async fn list_packages(&self) -> CoreResult<Vec<TourPackage>> {
        Ok(self.inner.read().await.packages.clone())
    }

    async fn get_package(&self, id: &str) -> CoreResult<Option<TourPackage>> {
        let id = check_id(id)?;
        let state = self.inner.read().await;
        Ok(state.packages.iter().find(|p| p.id == id).cloned())
    }

    async fn count_packages(&self) -> CoreResult<u64> {
        Ok(self.inner.read().await.packages.len() as u64)
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<String> {
        check_id(&booking.package_id)?;
        check_id(&booking.guide_id)?;
        let id = new_id();
        self.inner
            .write()
            .await
            .bookings
            .push(booking.into_booking(id.clone()));
        Ok(id)
    }

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        Ok(self.inner.read().await.bookings.clone())
    }

    async fn list_bookings_for_user(&self, email: &str) -> CoreResult<Vec<Booking>> {
        let state = self.inner.read().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.user_email == email)
            .cloned()
            .collect())
    }

    async fn get_booking(&self, id: &str) -> CoreResult<Option<Booking>> {
        let id = check_id(id)?;
        let state = self.inner.read().await;
        Ok(state.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn cancel_booking(&self, id: &str) -> CoreResult<Option<CancelledBooking>> {
        let id = check_id(id)?;
        let mut state = self.inner.write().await;
        let Some(pos) = state.bookings.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let booking = state.bookings.remove(pos);
        let key = booking.assignment_key();
        let assignment_removed = match state.assigned_tours.iter().position(|t| t.matches(&key)) {
            Some(pos) => {
                state.assigned_tours.remove(pos);
                true
            }
            None => false,
        };
        Ok(Some(CancelledBooking {
            booking_id: booking.id,
            key,
            assignment_removed,
        }))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn submit_application(&self, application: NewApplication) -> CoreResult<String> {
        let id = new_id();
        self.inner
            .write()
            .await
            .applications
            .push(application.into_application(id.clone()));
        Ok(id)
    }

    async fn list_applications(
        &self,
        pagination: Pagination,
    ) -> CoreResult<(Vec<GuideApplication>, u64)> {
        let state = self.inner.read().await;
        let total = state.applications.len() as u64;
        Ok((pagination.apply(state.applications.clone()), total))
    }

    async fn accept_application(&self, id: &str) -> CoreResult<Option<AcceptedApplication>> {
        let id = check_id(id)?;
        let mut state = self.inner.write().await;
        let Some(application) = state.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        let updated =
            application.status != ApplicationStatus::Accepted || application.role != GUIDE_ROLE;
        application.status = ApplicationStatus::Accepted;
        application.role = GUIDE_ROLE.to_string();

        let guide_id = new_id();
        let guide = NewGuide::from(&*application).into_guide(guide_id.clone());
        state.guides.push(guide);
        Ok(Some(AcceptedApplication { updated, guide_id }))
    }

    async fn reject_application(&self, id: &str) -> CoreResult<u64> {
        let id = check_id(id)?;
        let mut state = self.inner.write().await;
        let before = state.applications.len();
        if let Some(pos) = state.applications.iter().position(|a| a.id == id) {
            state.applications.remove(pos);
        }
        Ok((before - state.applications.len()) as u64)
    }
}

#[async_trait]
impl GuideRepository for InMemoryStore {
    async fn list_guides(&self) -> CoreResult<Vec<TourGuide>> {
        Ok(self.inner.read().await.guides.clone())
    }

    async fn sample_guides(&self, size: usize) -> CoreResult<Vec<TourGuide>> {
        let state = self.inner.read().await;
        Ok(sample(&state.guides, size))
    }

    async fn get_guide(&self, id: &str) -> CoreResult<Option<TourGuide>> {
        let id = check_id(id)?;
        let state = self.inner.read().await;
        Ok(state.guides.iter().find(|g| g.id == id).cloned())
    }

    async fn find_guide_by_email(&self, email: &str) -> CoreResult<Option<TourGuide>> {
        let state = self.inner.read().await;
        Ok(state.guides.iter().find(|g| g.email == email).cloned())
    }

    async fn update_guide_profile(
        &self,
        id: &str,
        update: GuideProfileUpdate,
    ) -> CoreResult<UpdateOutcome> {
        let id = check_id(id)?;
        let mut state = self.inner.write().await;
        Ok(match state.guides.iter_mut().find(|g| g.id == id) {
            Some(guide) => touched(update.apply(guide)),
            None => UpdateOutcome::default(),
        })
    }

    async fn count_guides_with_role(&self, role: &str) -> CoreResult<u64> {
        let state = self.inner.read().await;
        Ok(state.guides.iter().filter(|g| g.role == role).count() as u64)
    }
}

#[async_trait]
impl StoryRepository for InMemoryStore {
    async fn push_story(&self, owner: StoryOwner, story: NewStory) -> CoreResult<Option<Story>> {
        let mut state = self.inner.write().await;
        let parent = state
            .story_parents(owner)
            .into_iter()
            .find(|(email, _)| *email == story.email);
        let Some((_, stories)) = parent else {
            return Ok(None);
        };
        let story = story.into_story(new_id());
        stories.push(story.clone());
        Ok(Some(story))
    }

    async fn pull_story(&self, owner: StoryOwner, email: &str, story_id: &str) -> CoreResult<bool> {
        let story_id = check_id(story_id)?;
        let mut state = self.inner.write().await;
        let parent = state
            .story_parents(owner)
            .into_iter()
            .find(|(parent_email, _)| *parent_email == email);
        let Some((_, stories)) = parent else {
            return Ok(false);
        };
        let before = stories.len();
        stories.retain(|s| s.id != story_id);
        Ok(stories.len() < before)
    }

    async fn find_story(&self, owner: StoryOwner, story_id: &str) -> CoreResult<Option<Story>> {
        let story_id = check_id(story_id)?;
        let mut state = self.inner.write().await;
        Ok(state.find_story_mut(owner, &story_id).map(|s| s.clone()))
    }

    async fn stories_of(&self, owner: StoryOwner, email: &str) -> CoreResult<Option<Vec<Story>>> {
        let mut state = self.inner.write().await;
        Ok(state
            .story_parents(owner)
            .into_iter()
            .find(|(parent_email, _)| *parent_email == email)
            .map(|(_, stories)| stories.clone()))
    }

    async fn all_stories(&self, owner: StoryOwner) -> CoreResult<Vec<Story>> {
        let mut state = self.inner.write().await;
        Ok(state
            .story_parents(owner)
            .into_iter()
            .flat_map(|(email, stories)| {
                stories
                    .iter()
                    .map(|s| Story {
                        email: email.to_string(),
                        ..s.clone()
                    })
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    async fn sample_stories(&self, owner: StoryOwner, size: usize) -> CoreResult<Vec<StoryCard>> {
        let cards = self.inner.write().await.story_cards(owner);
        Ok(sample(&cards, size))
    }

    async fn recent_stories(&self, owner: StoryOwner) -> CoreResult<Vec<StoryCard>> {
        let mut cards = self.inner.write().await.story_cards(owner);
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cards)
    }

    async fn add_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome> {
        let story_id = check_id(story_id)?;
        let mut state = self.inner.write().await;
        Ok(match state.find_story_mut(owner, &story_id) {
            Some(story) => {
                story.images.push(url.to_string());
                touched(true)
            }
            None => UpdateOutcome::default(),
        })
    }

    async fn remove_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome> {
        let story_id = check_id(story_id)?;
        let mut state = self.inner.write().await;
        Ok(match state.find_story_mut(owner, &story_id) {
            Some(story) => {
                let before = story.images.len();
                story.images.retain(|i| i != url);
                touched(story.images.len() < before)
            }
            None => UpdateOutcome::default(),
        })
    }

    async fn edit_story(
        &self,
        owner: StoryOwner,
        story_id: &str,
        edit: StoryEdit,
    ) -> CoreResult<UpdateOutcome> {
        let story_id = check_id(story_id)?;
        let mut state = self.inner.write().await;
        Ok(match state.find_story_mut(owner, &story_id) {
            Some(story) => touched(edit.apply(story)),
            None => UpdateOutcome::default(),
        })
    }

    async fn count_stories(&self, owner: StoryOwner) -> CoreResult<u64> {
        let mut state = self.inner.write().await;
        Ok(state
            .story_parents(owner)
            .iter()
            .map(|(_, stories)| stories.len() as u64)
            .sum())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn register_user(&self, user: NewUser) -> CoreResult<Registration> {
        let mut state = self.inner.write().await;
        if let Some(existing) = state.users.iter().find(|u| u.email == user.email) {
            return Ok(Registration::Existing(existing.id.clone()));
        }
        let id = new_id();
        state.users.push(StoredUser {
            id: id.clone(),
            email: user.email,
            role: user.role,
            display_name: None,
            photo_url: None,
            stories: Vec::new(),
        });
        Ok(Registration::Created(id))
    }

    async fn save_user_profile(
        &self,
        email: &str,
        update: UserProfileUpdate,
    ) -> CoreResult<UserProfileSave> {
        let mut state = self.inner.write().await;
        let Some(pos) = state.users.iter().position(|u| u.email == email) else {
            let id = new_id();
            state.users.push(StoredUser {
                id: id.clone(),
                email: email.to_string(),
                role: update.role,
                display_name: update.display_name,
                photo_url: update.photo_url,
                stories: Vec::new(),
            });
            return Ok(UserProfileSave::Inserted(id));
        };
        let user = &mut state.users[pos];
        let mut changed = false;
        if let Some(name) = update.display_name {
            changed |= user.display_name.as_ref() != Some(&name);
            user.display_name = Some(name);
        }
        if let Some(photo) = update.photo_url {
            changed |= user.photo_url.as_ref() != Some(&photo);
            user.photo_url = Some(photo);
        }
        Ok(UserProfileSave::Updated(touched(changed)))
    }

    async fn count_users_with_role(&self, role: &str) -> CoreResult<u64> {
        let state = self.inner.read().await;
        Ok(state.users.iter().filter(|u| u.role == role).count() as u64)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn save_tourist_profile(&self, email: &str, mut fields: Extra) -> CoreResult<UpdateOutcome> {
        fields.insert("email".into(), Value::String(email.to_string()));
        let mut state = self.inner.write().await;
        let existing = state
            .tourist_profiles
            .iter()
            .position(|p| p.email.as_deref() == Some(email));
        match existing {
            Some(pos) => {
                let current = &state.tourist_profiles[pos];
                let merged = merge_profile(Some(current), &current.id.clone(), fields)?;
                let changed = merged != *current;
                state.tourist_profiles[pos] = merged;
                Ok(touched(changed))
            }
            None => {
                let id = new_id();
                let record = merge_profile(None, &id, fields)?;
                state.tourist_profiles.push(record);
                Ok(UpdateOutcome::upserted(id))
            }
        }
    }

    async fn find_admin_profile(&self, email: &str) -> CoreResult<Option<ProfileRecord>> {
        let state = self.inner.read().await;
        Ok(state
            .admins
            .iter()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned())
    }

    async fn create_admin_profile(&self, profile: NewAdminProfile) -> CoreResult<Option<String>> {
        let mut state = self.inner.write().await;
        if state
            .admins
            .iter()
            .any(|p| p.email.as_deref() == Some(profile.email.as_str()))
        {
            return Ok(None);
        }
        let id = new_id();
        state.admins.push(profile.into_record(id.clone()));
        Ok(Some(id))
    }

    async fn update_admin_profile(
        &self,
        email: &str,
        update: AdminProfileUpdate,
    ) -> CoreResult<UpdateOutcome> {
        let mut state = self.inner.write().await;
        let Some(profile) = state
            .admins
            .iter_mut()
            .find(|p| p.email.as_deref() == Some(email))
        else {
            return Ok(UpdateOutcome::default());
        };
        let mut changed = false;
        if let Some(name) = update.name {
            changed |= profile.name.as_ref() != Some(&name);
            profile.name = Some(name);
        }
        if let Some(photo) = update.photo_url {
            let photo = Value::String(photo);
            changed |= profile.extra.get("photoURL") != Some(&photo);
            profile.extra.insert("photoURL".into(), photo);
        }
        Ok(touched(changed))
    }

    async fn directory_candidates(
        &self,
        filter: &DirectoryFilter,
    ) -> CoreResult<Vec<Vec<ProfileRecord>>> {
        let state = self.inner.read().await;
        let select = |records: &[ProfileRecord]| -> Vec<ProfileRecord> {
            records.iter().filter(|r| filter.matches(r)).cloned().collect()
        };
        let guides: Vec<ProfileRecord> = state.guides.iter().map(guide_profile).collect();
        Ok(vec![
            select(&state.tourist_profiles),
            select(&state.admins),
            select(&guides),
        ])
    }
}

#[async_trait]
impl AssignedTourRepository for InMemoryStore {
    async fn assign_tour(&self, tour: NewAssignedTour) -> CoreResult<String> {
        let id = new_id();
        self.inner
            .write()
            .await
            .assigned_tours
            .push(tour.into_assigned_tour(id.clone()));
        Ok(id)
    }

    async fn list_assigned_tours(&self) -> CoreResult<Vec<AssignedTour>> {
        Ok(self.inner.read().await.assigned_tours.clone())
    }

    async fn assigned_tours_for_guide(&self, email: &str) -> CoreResult<Vec<AssignedTour>> {
        let state = self.inner.read().await;
        Ok(state
            .assigned_tours
            .iter()
            .filter(|t| t.tour_guide_email == email)
            .cloned()
            .collect())
    }

    async fn set_assigned_tour_status(
        &self,
        id: &str,
        status: AssignedTourStatus,
    ) -> CoreResult<UpdateOutcome> {
        let id = check_id(id)?;
        let mut state = self.inner.write().await;
        Ok(match state.assigned_tours.iter_mut().find(|t| t.id == id) {
            Some(tour) => {
                let changed = tour.status != status;
                tour.status = status;
                touched(changed)
            }
            None => UpdateOutcome::default(),
        })
    }

    async fn cancel_assigned_tour(&self, key: &AssignmentKey) -> CoreResult<bool> {
        let mut state = self.inner.write().await;
        match state.assigned_tours.iter().position(|t| t.matches(key)) {
            Some(pos) => {
                state.assigned_tours.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn record_payment(&self, payment: NewPayment) -> CoreResult<bool> {
        let booking_id = check_id(&payment.booking_id)?;
        let mut state = self.inner.write().await;
        let Some(booking) = state.bookings.iter_mut().find(|b| b.id == booking_id) else {
            return Ok(false);
        };
        booking.status = BookingStatus::InReview;
        let key = booking.assignment_key();
        if let Some(tour) = state.assigned_tours.iter_mut().find(|t| t.matches(&key)) {
            tour.status = AssignedTourStatus::InReview;
        }
        state.payments.push(payment.into_record(new_id()));
        Ok(true)
    }

    async fn total_payments(&self) -> CoreResult<f64> {
        let state = self.inner.read().await;
        Ok(state.payments.iter().map(|p| p.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tourbook_core::models::{
        ApplicationRequest, AssignedTourRequest, BookingRequest, StoryRequest,
    };

    async fn seeded_guide(store: &InMemoryStore) -> TourGuide {
        let application = NewApplication::try_from(ApplicationRequest {
            name: Some("Rahim".into()),
            email: Some("rahim@example.com".into()),
            title: Some("Hill tracks".into()),
            reason: Some("Local".into()),
            photo: Some("https://img/r.png".into()),
            cv: Some("https://cv/r.pdf".into()),
        })
        .unwrap();
        let id = store.submit_application(application).await.unwrap();
        store.accept_application(&id).await.unwrap().unwrap();
        store.list_guides().await.unwrap().remove(0)
    }

    fn story(email: &str) -> NewStory {
        NewStory::try_from(StoryRequest {
            email: Some(email.into()),
            title: Some("Sunrise".into()),
            story_text: Some("Over the hills".into()),
            image_links: Some(vec!["https://img/1.png".into()]),
        })
        .unwrap()
    }

    fn booking_request() -> BookingRequest {
        serde_json::from_value(json!({
            "packageId": ObjectId::new().to_hex(),
            "guideId": ObjectId::new().to_hex(),
            "packageName": "Sundarbans",
            "tourGuideEmail": "rahim@example.com",
            "userEmail": "tourist@example.com",
            "price": 300,
            "tourDate": "2026-12-01",
        }))
        .unwrap()
    }

    fn assignment() -> NewAssignedTour {
        let request: AssignedTourRequest = serde_json::from_value(json!({
            "packageName": "Sundarbans",
            "tourGuideEmail": "rahim@example.com",
            "userEmail": "tourist@example.com",
        }))
        .unwrap();
        NewAssignedTour::try_from(request).unwrap()
    }

    #[tokio::test]
    async fn test_push_then_pull_restores_stories() {
        let store = InMemoryStore::new();
        let guide = seeded_guide(&store).await;
        let before = store
            .stories_of(StoryOwner::Guide, &guide.email)
            .await
            .unwrap()
            .unwrap();

        let pushed = store
            .push_story(StoryOwner::Guide, story(&guide.email))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.count_stories(StoryOwner::Guide).await.unwrap(), 1);

        assert!(store
            .pull_story(StoryOwner::Guide, &guide.email, &pushed.id)
            .await
            .unwrap());
        let after = store
            .stories_of(StoryOwner::Guide, &guide.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_story_for_unknown_parent() {
        let store = InMemoryStore::new();
        let pushed = store
            .push_story(StoryOwner::User, story("ghost@example.com"))
            .await
            .unwrap();
        assert!(pushed.is_none());
    }

    #[tokio::test]
    async fn test_accepting_twice_creates_two_guides() {
        let store = InMemoryStore::new();
        seeded_guide(&store).await;
        let (apps, _) = store.list_applications(Pagination::default()).await.unwrap();
        let again = store.accept_application(&apps[0].id).await.unwrap().unwrap();
        assert!(!again.updated);
        assert_eq!(store.list_guides().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_booking_cascades_to_assignment() {
        let store = InMemoryStore::new();
        let booking = NewBooking::try_from(booking_request()).unwrap();
        let id = store.create_booking(booking).await.unwrap();
        store.assign_tour(assignment()).await.unwrap();

        let cancelled = store.cancel_booking(&id).await.unwrap().unwrap();
        assert!(cancelled.assignment_removed);
        assert!(store.list_assigned_tours().await.unwrap().is_empty());
        assert!(store.get_booking(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_booking_without_assignment() {
        let store = InMemoryStore::new();
        let booking = NewBooking::try_from(booking_request()).unwrap();
        let id = store.create_booking(booking).await.unwrap();

        let cancelled = store.cancel_booking(&id).await.unwrap().unwrap();
        assert!(!cancelled.assignment_removed);
        assert!(store.cancel_booking(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_payment_moves_booking_and_assignment_to_review() {
        let store = InMemoryStore::new();
        let booking = NewBooking::try_from(booking_request()).unwrap();
        let id = store.create_booking(booking).await.unwrap();
        store.assign_tour(assignment()).await.unwrap();

        let payment = NewPayment {
            transaction_id: "pi_1".into(),
            booking_id: id.clone(),
            amount: 300.0,
            date: Utc::now(),
        };
        assert!(store.record_payment(payment).await.unwrap());
        let bookings = store.list_bookings().await.unwrap();
        assert_eq!(bookings[0].status, BookingStatus::InReview);
        let tours = store.list_assigned_tours().await.unwrap();
        assert_eq!(tours[0].status, AssignedTourStatus::InReview);
        assert_eq!(store.total_payments().await.unwrap(), 300.0);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let store = InMemoryStore::new();
        let err = store.get_package("not-an-id").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_tourist_profile_upsert() {
        let store = InMemoryStore::new();
        let mut fields = Extra::new();
        fields.insert("name".into(), json!("Mina"));
        let first = store
            .save_tourist_profile("mina@example.com", fields.clone())
            .await
            .unwrap();
        assert!(first.upserted_id.is_some());

        let second = store
            .save_tourist_profile("mina@example.com", fields)
            .await
            .unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.modified_count, 0);
    }
}
