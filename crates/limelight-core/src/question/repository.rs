//! Question repository trait.

use super::model::{Question, QuestionCategory};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the global question bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Inserts a new question.
    async fn insert(&self, question: &Question) -> Result<()>;

    /// Finds a question by id.
    async fn find_by_id(&self, question_id: &str) -> Result<Option<Question>>;

    /// Finds the active question in `category` with the lowest usage count,
    /// skipping any id in `exclude`. Returns `None` when the category has
    /// no remaining candidate.
    async fn find_least_used_active(
        &self,
        category: QuestionCategory,
        exclude: &[String],
    ) -> Result<Option<Question>>;

    /// Atomically increments a question's usage count by one.
    async fn increment_usage(&self, question_id: &str) -> Result<()>;
}
