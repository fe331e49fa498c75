use std::sync::Arc;

use crate::auth::{AuthError, TokenService};
use crate::config::AppConfig;
use crate::network::LocalAddress;
use crate::services::{FeedbackService, QrService};
use crate::store::AdvisorStore;

/// Everything a handler or middleware needs, injected through axum state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn AdvisorStore>,
    pub tokens: Arc<TokenService>,
    pub feedback: Arc<FeedbackService>,
    pub qr: Arc<QrService>,
    pub local_address: LocalAddress,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn AdvisorStore>,
        local_address: LocalAddress,
    ) -> Result<Self, AuthError> {
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        let base_url = config.qr.public_base_url.clone();

        Ok(Self {
            feedback: Arc::new(FeedbackService::new(store.clone(), base_url.clone())),
            qr: Arc::new(QrService::new(store.clone(), base_url)),
            tokens: Arc::new(tokens),
            store,
            local_address,
            config: Arc::new(config),
        })
    }
}
