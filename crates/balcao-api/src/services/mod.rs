//! Business rules over the repositories: ownership gates, status
//! transitions, defaulting and moderation.

pub mod blog;
pub mod jobs;
pub mod listings;
pub mod ownership;

pub use blog::BlogService;
pub use jobs::JobService;
pub use listings::ListingService;
pub use ownership::{authorize_owner, OwnerAccess};
