//! Persistence boundary for advisor records.
//!
//! Every component that touches advisors (principal resolution, feedback
//! submission, QR references, login and the operator CLI) goes through the
//! [`AdvisorStore`] trait so the same code runs against Postgres in
//! deployments and the in-memory backend in development and tests.
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::{Advisor, NewAdvisor, PerformanceEntry};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AdvisorStore: Send + Sync {
    /// Advisor with its full performance history, `None` when absent
    async fn find_advisor(&self, id: Uuid) -> StoreResult<Option<Advisor>>;
    async fn find_advisor_by_email(&self, email: &str) -> StoreResult<Option<Advisor>>;
    async fn list_advisors(&self) -> StoreResult<Vec<Advisor>>;
    async fn create_advisor(&self, advisor: NewAdvisor) -> StoreResult<Advisor>;

    /// Append one entry; fails with `NotFound` if the advisor vanished.
    /// Each call is an independent append, never a read-modify-write.
    async fn append_performance(&self, id: Uuid, entry: PerformanceEntry) -> StoreResult<()>;

    async fn set_qr_code(&self, id: Uuid, qr_code: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Emails are compared case-insensitively
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
