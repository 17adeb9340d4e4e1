//! Question domain: model and repository trait.

pub mod model;
pub mod repository;

pub use model::{Question, QuestionCategory};
pub use repository::QuestionRepository;
