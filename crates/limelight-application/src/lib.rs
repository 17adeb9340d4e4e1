//! Application layer for Limelight.
//!
//! This crate provides the orchestration engine's use cases: eligibility
//! selection, question allocation, viewer distribution, the session
//! lifecycle, trust scoring, and the periodic creation cycle.

pub mod allocator;
pub mod assignment;
pub mod eligibility;
pub mod lifecycle;
pub mod question_selector;
pub mod scheduler;
pub mod trust_service;

pub use allocator::ViewerAllocator;
pub use assignment::{AssignmentQuery, AssignmentView};
pub use eligibility::EligibilitySelector;
pub use lifecycle::SessionLifecycle;
pub use question_selector::QuestionSelector;
pub use scheduler::Scheduler;
pub use trust_service::TrustService;
