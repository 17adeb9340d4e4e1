//! The shared in-memory store.
//!
//! All tables live behind one mutex, so every repository method that takes
//! the lock once is a single serializable transaction: conditional updates,
//! uniqueness checks and multi-row creation are atomic with respect to each
//! other. This is the engine's stand-in for the durable relational store,
//! which is outside the engine's scope.

use limelight_core::group::model::GroupAssignment;
use limelight_core::question::model::Question;
use limelight_core::session::model::{Answer, Session, SessionGroup, Vote};
use limelight_core::user::model::User;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Row tables. Vectors keep insertion order, which doubles as creation
/// order for tie-breaking.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<String, User>,
    pub questions: HashMap<String, Question>,
    pub sessions: HashMap<String, Session>,
    pub groups: Vec<SessionGroup>,
    pub assignments: Vec<GroupAssignment>,
    pub answers: Vec<Answer>,
    pub votes: Vec<Vote>,
}

impl Tables {
    /// Whether the group's session is still active.
    pub fn group_is_active(&self, group: &SessionGroup) -> bool {
        self.sessions
            .get(&group.session_id)
            .is_some_and(|s| s.status.is_active())
    }
}

/// Handle to the shared tables. Cheap to clone; all clones see the same
/// data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
