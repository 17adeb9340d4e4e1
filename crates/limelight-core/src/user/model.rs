//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user plays in the system.
///
/// Participants can be put under the light; viewers only watch and vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Participant,
    Viewer,
}

/// A registered user, participant or viewer.
///
/// `trust_score` is a rolling reputation in `[0, 100]` recomputed from
/// completed sessions; `appearance_count` is monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID format)
    pub id: String,
    /// Display name
    pub username: String,
    /// Role in the system
    pub role: UserRole,
    /// Rolling reputation metric, mean percentage of truthful votes
    pub trust_score: f64,
    /// Frozen users cannot appear or vote until externally reversed
    pub is_frozen: bool,
    /// Last time this user polled or acted
    pub last_active_at: DateTime<Utc>,
    /// When the user last went under the light, if ever
    pub last_appearance_date: Option<DateTime<Utc>>,
    /// How many times the user has appeared
    pub appearance_count: u32,
}

impl User {
    /// Creates a new user with the neutral trust prior.
    pub fn new(
        username: impl Into<String>,
        role: UserRole,
        default_trust_score: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            role,
            trust_score: default_trust_score,
            is_frozen: false,
            last_active_at: now,
            last_appearance_date: None,
            appearance_count: 0,
        }
    }

    /// Whether this user was active within the window ending at `now`.
    pub fn is_active_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active_at >= cutoff
    }
}
