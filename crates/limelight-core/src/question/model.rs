//! Question domain model.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The fixed set of question categories.
///
/// The selector shuffles this enumeration and takes the first K, so a
/// session's questions always come from K distinct categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum QuestionCategory {
    Personal,
    Situations,
    Beliefs,
    Past,
    Relationships,
    Secrets,
}

/// A question from the global bank.
///
/// `usage_count` is monotonically increasing and only mutated through the
/// selector's atomic increment, which load-balances exposure over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier (UUID format)
    pub id: String,
    /// The question text shown to the participant
    pub text: String,
    /// Category this question belongs to
    pub category: QuestionCategory,
    /// Inactive questions are never selected
    pub is_active: bool,
    /// How many sessions have used this question
    pub usage_count: u64,
}

impl Question {
    /// Creates a new active question with a zero usage count.
    pub fn new(text: impl Into<String>, category: QuestionCategory) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            category,
            is_active: true,
            usage_count: 0,
        }
    }
}
