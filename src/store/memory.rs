//! In-memory implementation of the advisor store.
//!
//! All state lives in a `HashMap` guarded by a `tokio::sync::RwLock` and is
//! lost on restart. Used for local development when `DATABASE_URL` is unset
//! and by the test suites. Appends take the write lock, so concurrent
//! submissions for one advisor are serialized and all persist.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, AdvisorStore, StoreError, StoreResult};
use crate::database::{Advisor, NewAdvisor, PerformanceEntry};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    advisors: Arc<RwLock<HashMap<Uuid, Advisor>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an advisor outright; the HTTP surface never deletes, tests do
    pub async fn remove_advisor(&self, id: Uuid) -> Option<Advisor> {
        self.advisors.write().await.remove(&id)
    }
}

#[async_trait]
impl AdvisorStore for MemoryStore {
    async fn find_advisor(&self, id: Uuid) -> StoreResult<Option<Advisor>> {
        Ok(self.advisors.read().await.get(&id).cloned())
    }

    async fn find_advisor_by_email(&self, email: &str) -> StoreResult<Option<Advisor>> {
        let email = normalize_email(email);
        Ok(self
            .advisors
            .read()
            .await
            .values()
            .find(|advisor| advisor.email == email)
            .cloned())
    }

    async fn list_advisors(&self) -> StoreResult<Vec<Advisor>> {
        let mut advisors: Vec<Advisor> = self.advisors.read().await.values().cloned().collect();
        advisors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(advisors)
    }

    async fn create_advisor(&self, advisor: NewAdvisor) -> StoreResult<Advisor> {
        let email = normalize_email(&advisor.email);
        let mut advisors = self.advisors.write().await;
        if advisors.values().any(|existing| existing.email == email) {
            return Err(StoreError::Conflict(format!("email '{}' already registered", email)));
        }

        let advisor = NewAdvisor { email, ..advisor }.into_advisor(Uuid::new_v4());
        advisors.insert(advisor.id, advisor.clone());
        Ok(advisor)
    }

    async fn append_performance(&self, id: Uuid, entry: PerformanceEntry) -> StoreResult<()> {
        let mut advisors = self.advisors.write().await;
        let advisor = advisors
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("advisor {}", id)))?;
        advisor.performance_data.push(entry);
        Ok(())
    }

    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> StoreResult<()> {
        let mut advisors = self.advisors.write().await;
        let advisor = advisors
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("advisor {}", id)))?;
        advisor.qr_code = Some(qr_code.to_string());
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
