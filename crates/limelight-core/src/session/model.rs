//! Session domain model.
//!
//! A session puts exactly one participant under the light. Its answer
//! slots are reserved at creation time and filled exactly once each;
//! vote tallies always satisfy `total_votes = true_votes + false_votes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a session. Transitions are strictly forward; see
/// [`crate::session::lifecycle`] for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created, waiting for the participant's first answer.
    Waiting,
    /// The participant is answering.
    InProgress,
    /// All answers revealed; viewers are voting.
    Voting,
    /// Finalized. All rows are immutable history from here on.
    Completed,
}

impl SessionStatus {
    /// Whether the session still occupies its participant and viewers.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// The value of a truthfulness vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    True,
    False,
}

/// A live or completed spotlight session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// The participant under the light, exclusively owned for the
    /// session's lifetime
    pub participant_id: String,
    /// Current lifecycle status
    pub status: SessionStatus,
    /// When the session row was created
    pub created_at: DateTime<Utc>,
    /// Stamped on the WAITING -> IN_PROGRESS transition
    pub started_at: Option<DateTime<Utc>>,
    /// Stamped on the VOTING -> COMPLETED transition
    pub ended_at: Option<DateTime<Utc>>,
    /// Count of TRUE votes
    pub true_votes: u32,
    /// Count of FALSE votes
    pub false_votes: u32,
    /// Always `true_votes + false_votes`
    pub total_votes: u32,
    /// Percentage of TRUE votes, set only at completion
    pub trust_result: Option<f64>,
}

/// The aggregation point for viewer assignment. Exactly one per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGroup {
    /// Unique group identifier (UUID format)
    pub id: String,
    /// The session this group belongs to
    pub session_id: String,
    /// When the group was created (creation-order tie-break)
    pub created_at: DateTime<Utc>,
}

/// A reserved (session, question) slot, filled exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Unique answer identifier (UUID format)
    pub id: String,
    /// Session this slot belongs to
    pub session_id: String,
    /// Question this slot answers
    pub question_id: String,
    /// Display position within the session
    pub order_index: usize,
    /// Empty until the participant submits; immutable afterwards
    pub text: String,
    /// Stamped at the moment `text` becomes non-empty
    pub revealed_at: Option<DateTime<Utc>>,
}

impl Answer {
    /// Whether the slot is still waiting for its answer.
    pub fn is_unanswered(&self) -> bool {
        self.text.is_empty()
    }
}

/// A viewer's one vote on a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Unique vote identifier (UUID format)
    pub id: String,
    /// Session voted on
    pub session_id: String,
    /// The voter; unique per session, never the session's participant
    pub voter_id: String,
    /// TRUE or FALSE
    pub value: VoteValue,
    /// When the vote was cast
    pub created_at: DateTime<Utc>,
}
