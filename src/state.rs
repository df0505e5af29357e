//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, ClickService, LinkSigner, PlacementService};
use crate::config::Config;
use crate::domain::counters::ClickCounters;
use crate::domain::repositories::PlacementRepository;
use crate::infrastructure::registry::ClickRegistry;
use crate::utils::bot_filter::BotFilter;

#[derive(Clone)]
pub struct AppState {
    pub click_service: Arc<ClickService>,
    pub placement_service: Arc<PlacementService>,
    pub auth_service: Arc<AuthService>,
    /// Read the client IP from proxy headers.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the chosen storage backends.
    pub fn new(
        config: &Config,
        placements: Arc<dyn PlacementRepository>,
        registry: Arc<dyn ClickRegistry>,
    ) -> Self {
        let signer = Arc::new(LinkSigner::new(
            config.hmac_secret.as_bytes(),
            config.base_url.as_str(),
        ));

        let click_service = ClickService::new(
            placements.clone(),
            registry,
            signer.clone(),
            Arc::new(ClickCounters::new()),
            BotFilter::with_extra_patterns(&config.extra_bot_patterns),
            config.fallback_url.clone(),
        );

        Self {
            click_service: Arc::new(click_service),
            placement_service: Arc::new(PlacementService::new(placements, signer)),
            auth_service: Arc::new(AuthService::new(
                config.api_token.clone(),
                config.hmac_secret.clone(),
            )),
            behind_proxy: config.behind_proxy,
        }
    }
}
