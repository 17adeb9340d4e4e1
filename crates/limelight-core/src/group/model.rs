//! Viewer cohort models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attachment of a viewer to a session group.
///
/// Unique per (group, user): a viewer sits in at most one cohort per
/// active session cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    /// Unique assignment identifier (UUID format)
    pub id: String,
    /// The group joined
    pub group_id: String,
    /// The viewer assigned
    pub user_id: String,
    /// When the assignment was created
    pub created_at: DateTime<Utc>,
}
