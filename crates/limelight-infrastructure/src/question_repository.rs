//! In-memory question repository implementation.

use crate::store::MemoryStore;
use async_trait::async_trait;
use limelight_core::error::{EngineError, Result};
use limelight_core::question::model::{Question, QuestionCategory};
use limelight_core::question::repository::QuestionRepository;

/// Question repository backed by the shared [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryQuestionRepository {
    store: MemoryStore,
}

impl MemoryQuestionRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QuestionRepository for MemoryQuestionRepository {
    async fn insert(&self, question: &Question) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        if tables.questions.contains_key(&question.id) {
            return Err(EngineError::conflict(format!(
                "question '{}' already exists",
                question.id
            )));
        }
        tables
            .questions
            .insert(question.id.clone(), question.clone());
        Ok(())
    }

    async fn find_by_id(&self, question_id: &str) -> Result<Option<Question>> {
        let tables = self.store.tables.lock().await;
        Ok(tables.questions.get(question_id).cloned())
    }

    async fn find_least_used_active(
        &self,
        category: QuestionCategory,
        exclude: &[String],
    ) -> Result<Option<Question>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| q.is_active && q.category == category)
            .filter(|q| !exclude.iter().any(|id| id == &q.id))
            // Id as a deterministic tie-break between equally-used questions
            .min_by(|a, b| {
                a.usage_count
                    .cmp(&b.usage_count)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .cloned())
    }

    async fn increment_usage(&self, question_id: &str) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        let question = tables
            .questions
            .get_mut(question_id)
            .ok_or_else(|| EngineError::not_found("question", question_id))?;
        question.usage_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_least_used_wins() {
        let repo = MemoryQuestionRepository::new(MemoryStore::new());
        let mut heavy = Question::new("q1", QuestionCategory::Beliefs);
        heavy.usage_count = 7;
        let light = Question::new("q2", QuestionCategory::Beliefs);
        repo.insert(&heavy).await.unwrap();
        repo.insert(&light).await.unwrap();

        let found = repo
            .find_least_used_active(QuestionCategory::Beliefs, &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, light.id);
    }

    #[tokio::test]
    async fn test_exclusion_and_inactive_filtering() {
        let repo = MemoryQuestionRepository::new(MemoryStore::new());
        let asked = Question::new("q1", QuestionCategory::Past);
        let mut retired = Question::new("q2", QuestionCategory::Past);
        retired.is_active = false;
        repo.insert(&asked).await.unwrap();
        repo.insert(&retired).await.unwrap();

        let found = repo
            .find_least_used_active(QuestionCategory::Past, std::slice::from_ref(&asked.id))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_increment_usage() {
        let repo = MemoryQuestionRepository::new(MemoryStore::new());
        let question = Question::new("q", QuestionCategory::Secrets);
        repo.insert(&question).await.unwrap();
        repo.increment_usage(&question.id).await.unwrap();

        let found = repo
            .find_least_used_active(QuestionCategory::Secrets, &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.usage_count, 1);
    }
}
