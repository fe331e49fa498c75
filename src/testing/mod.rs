use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::database::{Advisor, NewAdvisor, PerformanceEntry};
use crate::store::{AdvisorStore, MemoryStore, StoreResult};
use crate::types::Role;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Insert an advisor with [`TEST_PASSWORD`] into a memory store
pub async fn seed_advisor(store: &MemoryStore, email: &str, role: Role) -> Advisor {
    let name = email.split('@').next().unwrap_or(email).to_string();
    store
        .create_advisor(NewAdvisor {
            name,
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hash test password"),
            role,
        })
        .await
        .expect("seed advisor")
}

/// Memory store that counts QR reference writes
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    qr_writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn qr_writes(&self) -> usize {
        self.qr_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisorStore for CountingStore {
    async fn find_advisor(&self, id: Uuid) -> StoreResult<Option<Advisor>> {
        self.inner.find_advisor(id).await
    }

    async fn find_advisor_by_email(&self, email: &str) -> StoreResult<Option<Advisor>> {
        self.inner.find_advisor_by_email(email).await
    }

    async fn list_advisors(&self) -> StoreResult<Vec<Advisor>> {
        self.inner.list_advisors().await
    }

    async fn create_advisor(&self, advisor: NewAdvisor) -> StoreResult<Advisor> {
        self.inner.create_advisor(advisor).await
    }

    async fn append_performance(&self, id: Uuid, entry: PerformanceEntry) -> StoreResult<()> {
        self.inner.append_performance(id, entry).await
    }

    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> StoreResult<()> {
        self.qr_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_qr_code(id, qr_code).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}
