//! Infrastructure layer for Limelight.
//!
//! This crate provides the storage-side implementations of the core
//! repository traits, all backed by one shared transactional in-memory
//! store.

pub mod group_repository;
pub mod question_repository;
pub mod session_repository;
pub mod store;
pub mod user_repository;

pub use group_repository::MemoryGroupRepository;
pub use question_repository::MemoryQuestionRepository;
pub use session_repository::MemorySessionRepository;
pub use store::MemoryStore;
pub use user_repository::MemoryUserRepository;
