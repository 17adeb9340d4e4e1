//! Viewer cohort domain: assignment model and repository trait.

pub mod model;
pub mod repository;

pub use model::GroupAssignment;
pub use repository::GroupRepository;
