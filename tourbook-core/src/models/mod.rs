pub mod application;
pub mod assigned_tour;
pub mod booking;
pub mod guide;
pub mod outcome;
pub mod package;
pub mod payment;
pub mod profile;
pub mod story;
pub mod user;

/// Client-supplied fields with no fixed schema, stored and echoed unchanged.
pub type Extra = serde_json::Map<String, serde_json::Value>;

pub use application::{AcceptedApplication, ApplicationRequest, ApplicationStatus, GuideApplication, NewApplication};
pub use assigned_tour::{AssignedTour, AssignedTourRequest, AssignedTourStatus, AssignmentKey, AssignmentKeyRequest, NewAssignedTour};
pub use booking::{Booking, BookingRequest, BookingStatus, CancelledBooking, NewBooking};
pub use guide::{GuideProfileRequest, GuideProfileUpdate, NewGuide, TourGuide, GUIDE_ROLE};
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use package::{NewPackage, PackageRequest, TourPackage};
pub use payment::{NewPayment, PaymentRecord, PaymentRequest};
pub use profile::{AdminProfileRequest, AdminProfileUpdate, AdminProfileUpdateRequest, NewAdminProfile, ProfileRecord};
pub use story::{ImageRequest, NewStory, Story, StoryCard, StoryEdit, StoryEditRequest, StoryOwner, StoryRequest};
pub use user::{NewUser, Registration, UserProfileRequest, UserProfileSave, UserProfileUpdate, UserRequest, CLIENT_ROLE};
