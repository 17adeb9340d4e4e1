//! Session repository trait.
//!
//! Defines the interface for session persistence. The contract encodes the
//! concurrency requirements of the engine: answer fills are conditional
//! updates guarded by "text is currently empty", status changes are
//! compare-and-set against an expected prior state, and vote insertion
//! enforces the (session, voter) uniqueness constraint in the same atomic
//! unit that bumps the tallies.

use super::model::{Answer, Session, SessionGroup, SessionStatus, Vote, VoteValue};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An abstract repository for sessions, their answer slots and votes.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Atomically creates a session in `Waiting` status, its group, and one
    /// empty answer slot per question id (in order). Either everything is
    /// created or nothing is.
    async fn create_with_slots(
        &self,
        participant_id: &str,
        question_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<(Session, SessionGroup)>;

    /// Removes a session together with its group, assignments, answer slots
    /// and votes. Creation-cycle rollback only; completed sessions are
    /// immutable history and must never be deleted.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Finds a session by id.
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Finds the non-completed session a participant currently owns, if any.
    async fn find_active_by_participant(&self, participant_id: &str) -> Result<Option<Session>>;

    /// Ids of participants of all non-completed sessions.
    async fn active_participant_ids(&self) -> Result<Vec<String>>;

    /// Counts non-completed sessions.
    async fn count_active(&self) -> Result<u64>;

    /// Counts sessions created at or after `cutoff` (daily cap accounting).
    async fn count_created_since(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// All completed sessions for a participant, any vote count.
    async fn list_completed_for_participant(&self, participant_id: &str) -> Result<Vec<Session>>;

    /// Fills an answer slot, guarded by "text is currently empty".
    ///
    /// Errors: `NotFound` when no slot exists for (session, question);
    /// `Conflict` when the slot was already filled. The guard and the write
    /// happen in one atomic unit, closing the read-then-write race.
    async fn fill_answer(
        &self,
        session_id: &str,
        question_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Answer>;

    /// Counts answer slots of the session whose text is still empty.
    async fn count_unanswered(&self, session_id: &str) -> Result<usize>;

    /// Answer slots of the session ordered by `order_index`.
    async fn answers_for_session(&self, session_id: &str) -> Result<Vec<Answer>>;

    /// Ids of every question ever placed in front of this participant,
    /// across all their sessions. Feeds the never-asked-before preference
    /// of question selection.
    async fn question_ids_seen_by_participant(&self, participant_id: &str) -> Result<Vec<String>>;

    /// Compare-and-set status transition.
    ///
    /// Returns `true` when the session was in `from` and is now in `to`;
    /// `false` when another writer got there first. Stamps `started_at`
    /// when entering `InProgress` and `ended_at` when entering `Completed`.
    async fn transition_status(
        &self,
        session_id: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Inserts a vote and increments `total_votes` plus the matching
    /// true/false tally in one atomic unit.
    ///
    /// Errors: `Conflict` when (session, voter) already voted, or when the
    /// session is not in `Voting` — both constraints live in the store's
    /// atomic unit, not in caller-side checks, so a vote racing `finalize`
    /// can never mutate a completed session's tallies.
    async fn insert_vote(
        &self,
        session_id: &str,
        voter_id: &str,
        value: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Vote>;

    /// Finds the vote a user cast on a session, if any.
    async fn find_vote(&self, session_id: &str, voter_id: &str) -> Result<Option<Vote>>;

    /// Compare-and-set completion: requires `Voting`, computes
    /// `trust_result` from the tallies, stamps `ended_at` and returns the
    /// finalized session.
    ///
    /// Errors: `Conflict` when the session is not in `Voting` (including
    /// already completed — re-invocation is rejected, never repeated).
    async fn finalize(&self, session_id: &str, now: DateTime<Utc>) -> Result<Session>;
}
