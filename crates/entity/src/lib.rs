//! Entity definitions for the feedback tracker
//!
//! Sea-ORM entity definitions for the SQLite schema created by the
//! `migration` crate.

pub mod feedback;
pub mod feedback_requests;
pub mod feedback_tags;
pub mod sea_orm_active_enums;
pub mod tags;
pub mod users;

pub use feedback::Entity as Feedback;
pub use feedback_requests::Entity as FeedbackRequests;
pub use feedback_tags::Entity as FeedbackTags;
pub use tags::Entity as Tags;
pub use users::Entity as Users;
