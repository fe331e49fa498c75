use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Advisor;
use crate::store::{AdvisorStore, StoreError, StoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QrRefreshReport {
    pub checked: usize,
    pub updated: usize,
}

/// Keeps each advisor's stored QR reference pointing at the current public URL.
///
/// The QR image encodes [`QrService::form_url`]; the advisor record stores
/// [`QrService::reference_url`], the public location of the rendered image.
pub struct QrService {
    store: Arc<dyn AdvisorStore>,
    public_base_url: String,
}

impl QrService {
    pub fn new(store: Arc<dyn AdvisorStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn form_url(&self, advisor_id: Uuid) -> String {
        format!("{}/feedback/{}", self.public_base_url, advisor_id)
    }

    pub fn reference_url(&self, advisor_id: Uuid) -> String {
        format!("{}/qrcodes/{}.png", self.public_base_url, advisor_id)
    }

    /// Persist the reference only when stale. Returns whether a write happened.
    pub async fn refresh(&self, advisor: &Advisor) -> StoreResult<bool> {
        let target = self.reference_url(advisor.id);
        if advisor.qr_code.as_deref() == Some(target.as_str()) {
            return Ok(false);
        }

        self.store.set_qr_code(advisor.id, &target).await?;
        info!("Updated QR code for {}: {}", advisor.name, target);
        Ok(true)
    }

    pub async fn refresh_all(&self) -> StoreResult<QrRefreshReport> {
        let advisors = self.store.list_advisors().await?;
        let mut report = QrRefreshReport::default();

        for advisor in &advisors {
            report.checked += 1;
            match self.refresh(advisor).await {
                Ok(true) => report.updated += 1,
                Ok(false) => {}
                Err(StoreError::NotFound(_)) => {
                    warn!("Advisor {} disappeared during QR refresh", advisor.id);
                }
                Err(e) => return Err(e),
            }
        }

        info!("QR references checked: {}, updated: {}", report.checked, report.updated);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{seed_advisor, CountingStore};
    use crate::types::Role;

    #[tokio::test]
    async fn urls_follow_base() {
        let service = QrService::new(Arc::new(MemoryStore::new()), "https://qr.example.com/");
        let id = Uuid::nil();
        assert_eq!(
            service.form_url(id),
            "https://qr.example.com/feedback/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            service.reference_url(id),
            "https://qr.example.com/qrcodes/00000000-0000-0000-0000-000000000000.png"
        );
    }

    #[tokio::test]
    async fn stale_reference_is_written_once() {
        let store = Arc::new(CountingStore::new());
        seed_advisor(store.inner(), "a@example.com", Role::Advisor).await;
        seed_advisor(store.inner(), "b@example.com", Role::Manager).await;
        let service = QrService::new(store.clone(), "https://qr.example.com");

        let first = service.refresh_all().await.unwrap();
        assert_eq!(first, QrRefreshReport { checked: 2, updated: 2 });
        assert_eq!(store.qr_writes(), 2);

        // Already up to date: no store writes at all
        let second = service.refresh_all().await.unwrap();
        assert_eq!(second, QrRefreshReport { checked: 2, updated: 0 });
        assert_eq!(store.qr_writes(), 2);
    }

    #[tokio::test]
    async fn base_url_change_rewrites_reference() {
        let store = Arc::new(CountingStore::new());
        let advisor = seed_advisor(store.inner(), "c@example.com", Role::Advisor).await;

        QrService::new(store.clone(), "http://10.0.0.5:5000").refresh_all().await.unwrap();
        let service = QrService::new(store.clone(), "https://qr.example.com");
        let stored = store.find_advisor(advisor.id).await.unwrap().unwrap();
        assert!(service.refresh(&stored).await.unwrap());

        let stored = store.find_advisor(advisor.id).await.unwrap().unwrap();
        assert_eq!(stored.qr_code, Some(service.reference_url(advisor.id)));
        assert_eq!(store.qr_writes(), 2);
    }
}
