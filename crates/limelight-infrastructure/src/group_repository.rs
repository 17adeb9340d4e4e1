//! In-memory group repository implementation.

use crate::store::MemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use limelight_core::error::Result;
use limelight_core::group::model::GroupAssignment;
use limelight_core::group::repository::GroupRepository;
use limelight_core::session::model::SessionGroup;

/// Group repository backed by the shared [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryGroupRepository {
    store: MemoryStore,
}

impl MemoryGroupRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GroupRepository for MemoryGroupRepository {
    async fn active_groups_by_size(&self) -> Result<Vec<(SessionGroup, usize)>> {
        let tables = self.store.tables.lock().await;
        let mut groups: Vec<(SessionGroup, usize)> = tables
            .groups
            .iter()
            .filter(|g| tables.group_is_active(g))
            .map(|g| {
                let size = tables
                    .assignments
                    .iter()
                    .filter(|a| a.group_id == g.id)
                    .count();
                (g.clone(), size)
            })
            .collect();
        // Stable sort: groups are stored in creation order, which becomes
        // the deterministic tie-break between equally-sized groups.
        groups.sort_by_key(|(_, size)| *size);
        Ok(groups)
    }

    async fn assign(
        &self,
        group_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GroupAssignment> {
        let mut tables = self.store.tables.lock().await;
        // Idempotent on the (group, user) pair
        if let Some(existing) = tables
            .assignments
            .iter()
            .find(|a| a.group_id == group_id && a.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let assignment = GroupAssignment {
            id: uuid::Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn assigned_user_ids_for_active_groups(&self) -> Result<Vec<String>> {
        let tables = self.store.tables.lock().await;
        let active_group_ids: Vec<&str> = tables
            .groups
            .iter()
            .filter(|g| tables.group_is_active(g))
            .map(|g| g.id.as_str())
            .collect();
        Ok(tables
            .assignments
            .iter()
            .filter(|a| active_group_ids.iter().any(|id| *id == a.group_id))
            .map(|a| a.user_id.clone())
            .collect())
    }

    async fn find_active_assignment(
        &self,
        user_id: &str,
    ) -> Result<Option<(GroupAssignment, SessionGroup)>> {
        let tables = self.store.tables.lock().await;
        for assignment in tables.assignments.iter().filter(|a| a.user_id == user_id) {
            let group = tables
                .groups
                .iter()
                .find(|g| g.id == assignment.group_id && tables.group_is_active(g));
            if let Some(group) = group {
                return Ok(Some((assignment.clone(), group.clone())));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_core::session::repository::SessionRepository;

    async fn store_with_sessions(count: usize) -> (MemoryStore, Vec<SessionGroup>) {
        let store = MemoryStore::new();
        let sessions = crate::session_repository::MemorySessionRepository::new(store.clone());
        let mut groups = Vec::new();
        for i in 0..count {
            let (_, group) = sessions
                .create_with_slots(&format!("p{i}"), &["q".to_string()], Utc::now())
                .await
                .unwrap();
            groups.push(group);
        }
        (store, groups)
    }

    #[tokio::test]
    async fn test_assign_is_idempotent() {
        let (store, groups) = store_with_sessions(1).await;
        let repo = MemoryGroupRepository::new(store);

        let first = repo.assign(&groups[0].id, "viewer", Utc::now()).await.unwrap();
        let second = repo.assign(&groups[0].id, "viewer", Utc::now()).await.unwrap();
        assert_eq!(first.id, second.id);

        let assigned = repo.assigned_user_ids_for_active_groups().await.unwrap();
        assert_eq!(assigned, vec!["viewer".to_string()]);
    }

    #[tokio::test]
    async fn test_groups_ordered_by_size_then_creation() {
        let (store, groups) = store_with_sessions(3).await;
        let repo = MemoryGroupRepository::new(store);
        let now = Utc::now();
        repo.assign(&groups[0].id, "a", now).await.unwrap();
        repo.assign(&groups[0].id, "b", now).await.unwrap();
        repo.assign(&groups[2].id, "c", now).await.unwrap();

        let ordered = repo.active_groups_by_size().await.unwrap();
        let ids: Vec<&str> = ordered.iter().map(|(g, _)| g.id.as_str()).collect();
        // Empty group first, then size 1, then size 2
        assert_eq!(ids, vec![groups[1].id.as_str(), groups[2].id.as_str(), groups[0].id.as_str()]);
    }

    #[tokio::test]
    async fn test_find_active_assignment_ignores_completed_sessions() {
        let (store, groups) = store_with_sessions(1).await;
        let sessions = crate::session_repository::MemorySessionRepository::new(store.clone());
        let repo = MemoryGroupRepository::new(store);
        let now = Utc::now();
        repo.assign(&groups[0].id, "viewer", now).await.unwrap();

        assert!(repo.find_active_assignment("viewer").await.unwrap().is_some());

        use limelight_core::session::model::SessionStatus;
        sessions
            .transition_status(&groups[0].session_id, SessionStatus::Waiting, SessionStatus::Voting, now)
            .await
            .unwrap();
        sessions.finalize(&groups[0].session_id, now).await.unwrap();

        assert!(repo.find_active_assignment("viewer").await.unwrap().is_none());
    }
}
