//! In-memory user repository implementation.

use crate::store::MemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use limelight_core::error::{EngineError, Result};
use limelight_core::user::model::{User, UserRole};
use limelight_core::user::repository::{ParticipantFilter, UserRepository};

/// User repository backed by the shared [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let tables = self.store.tables.lock().await;
        Ok(tables.users.get(user_id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        if tables.users.contains_key(&user.id) {
            return Err(EngineError::conflict(format!(
                "user '{}' already exists",
                user.id
            )));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn touch_activity(&self, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        user.last_active_at = now;
        Ok(())
    }

    async fn count_active_since(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .users
            .values()
            .filter(|u| !u.is_frozen && u.is_active_since(cutoff))
            .count() as u64)
    }

    async fn list_active_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<User>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .users
            .values()
            .filter(|u| !u.is_frozen && u.is_active_since(cutoff))
            .cloned()
            .collect())
    }

    async fn find_participants_for_selection(
        &self,
        role: UserRole,
        filter: &ParticipantFilter,
    ) -> Result<Vec<User>> {
        let tables = self.store.tables.lock().await;
        let mut eligible: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.role == role)
            .filter(|u| !u.is_frozen)
            .filter(|u| u.is_active_since(filter.active_since))
            .filter(|u| !filter.exclude_ids.iter().any(|id| id == &u.id))
            .filter(|u| match u.last_appearance_date {
                None => true,
                Some(date) => date <= filter.cooldown_cutoff,
            })
            .cloned()
            .collect();

        // Ascending by last appearance; None sorts first, so users who
        // never appeared are prioritized. Id as a deterministic tie-break.
        eligible.sort_by(|a, b| {
            a.last_appearance_date
                .cmp(&b.last_appearance_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        eligible.truncate(filter.limit);
        Ok(eligible)
    }

    async fn record_appearance(&self, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        user.last_appearance_date = Some(now);
        user.appearance_count += 1;
        Ok(())
    }

    async fn set_trust_score(&self, user_id: &str, trust_score: f64) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        user.trust_score = trust_score.clamp(0.0, 100.0);
        Ok(())
    }

    async fn set_frozen(&self, user_id: &str, frozen: bool) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        user.is_frozen = frozen;
        Ok(())
    }
}
