//! Session domain: model, lifecycle state machine and repository trait.

pub mod lifecycle;
pub mod model;
pub mod repository;

pub use lifecycle::{SessionEvent, transition};
pub use model::{Answer, Session, SessionGroup, SessionStatus, Vote, VoteValue};
pub use repository::SessionRepository;
