//! User domain: model and repository trait.

pub mod model;
pub mod repository;

pub use model::{User, UserRole};
pub use repository::{ParticipantFilter, UserRepository};
