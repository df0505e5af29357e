//! Click validation pipeline.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::services::link_signer::{LinkSigner, PLACEMENT_PARAM, SIGNATURE_PARAM};
use crate::domain::counters::ClickCounters;
use crate::domain::entities::{ClickAttempt, ClickOutcome, RejectReason};
use crate::domain::repositories::PlacementRepository;
use crate::infrastructure::registry::ClickRegistry;
use crate::utils::bot_filter::BotFilter;
use crate::utils::freshness::is_fresh_at;
use crate::utils::subscriber_token::{extract_token, is_valid_token};

/// Decides whether a click is billable and where to send the browser.
///
/// # Pipeline
///
/// Each step short-circuits on failure:
///
/// 1. `placementId` and `sig` present
/// 2. User agent is not a known bot
/// 3. Signature verifies for the placement id
/// 4. A subscriber token is present
/// 5. The token is 40 hex characters
/// 6. `(ip, token)` has not been seen before (records it if new)
/// 7. The placement exists and is not deleted
/// 8. The placement is within its 72-hour window
///
/// Steps 1-6 perform no storage I/O apart from the registry call, and the
/// registry call completes before the placement lookup starts. A duplicate
/// therefore never reaches the store, and two concurrent requests for the
/// same pair cannot both pass step 6.
pub struct ClickService {
    placements: Arc<dyn PlacementRepository>,
    registry: Arc<dyn ClickRegistry>,
    signer: Arc<LinkSigner>,
    counters: Arc<ClickCounters>,
    bot_filter: BotFilter,
    fallback_url: String,
}

impl ClickService {
    pub fn new(
        placements: Arc<dyn PlacementRepository>,
        registry: Arc<dyn ClickRegistry>,
        signer: Arc<LinkSigner>,
        counters: Arc<ClickCounters>,
        bot_filter: BotFilter,
        fallback_url: String,
    ) -> Self {
        Self {
            placements,
            registry,
            signer,
            counters,
            bot_filter,
            fallback_url,
        }
    }

    pub fn counters(&self) -> &ClickCounters {
        &self.counters
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    pub fn registry(&self) -> &dyn ClickRegistry {
        self.registry.as_ref()
    }

    /// Runs the checks without touching counters.
    ///
    /// Returns the landing URL of a billable click.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] of the first failing check.
    pub async fn evaluate(&self, attempt: &ClickAttempt) -> Result<String, RejectReason> {
        let (placement_id, signature) = match (
            attempt.param(PLACEMENT_PARAM),
            attempt.param(SIGNATURE_PARAM),
        ) {
            (Some(p), Some(s)) => (p, s),
            _ => return Err(RejectReason::MissingParameters),
        };

        if self.bot_filter.is_bot(&attempt.user_agent) {
            return Err(RejectReason::BotUserAgent);
        }

        if !self.signer.verify(placement_id, signature) {
            return Err(RejectReason::InvalidSignature);
        }

        let token = extract_token(&attempt.params).ok_or(RejectReason::MissingToken)?;

        if !is_valid_token(token) {
            return Err(RejectReason::InvalidToken);
        }

        match self.registry.check_and_record(&attempt.ip, token).await {
            Ok(true) => {}
            Ok(false) => return Err(RejectReason::DuplicateClick),
            Err(e) => {
                warn!("Click registry unavailable: {}", e);
                return Err(RejectReason::RegistryUnavailable);
            }
        }

        let placement = match self.placements.find_by_id(placement_id).await {
            Ok(Some(placement)) => placement,
            Ok(None) => return Err(RejectReason::PlacementNotFound),
            Err(e) => {
                warn!("Placement lookup failed for {}: {}", placement_id, e);
                return Err(RejectReason::LookupFailed);
            }
        };

        if !is_fresh_at(placement.created_at, attempt.received_at) {
            return Err(RejectReason::StaleLink);
        }

        Ok(placement.landing_url)
    }

    /// Evaluates a click, updates counters and logs the decision.
    pub async fn process(&self, attempt: ClickAttempt) -> ClickOutcome {
        let placement_id = attempt.param(PLACEMENT_PARAM).unwrap_or("-").to_string();

        match self.evaluate(&attempt).await {
            Ok(landing_url) => {
                self.counters.record_billable();
                info!(
                    placement_id = %placement_id,
                    ip = %attempt.ip,
                    "Click accepted: billable"
                );
                self.log_stats();
                ClickOutcome::Accepted { landing_url }
            }
            Err(reason) => {
                self.counters.record_failed(reason);
                info!(
                    placement_id = %placement_id,
                    ip = %attempt.ip,
                    reason = %reason,
                    "Click rejected"
                );
                self.log_stats();
                ClickOutcome::Rejected(reason)
            }
        }
    }

    /// Counts a click whose processing crashed.
    pub fn record_fault(&self) {
        self.counters.record_failed(RejectReason::InternalFault);
    }

    /// Redirect target for an outcome: the landing URL or the fallback.
    pub fn redirect_target<'a>(&'a self, outcome: &'a ClickOutcome) -> &'a str {
        match outcome {
            ClickOutcome::Accepted { landing_url } => landing_url,
            ClickOutcome::Rejected(_) => &self.fallback_url,
        }
    }

    fn log_stats(&self) {
        let snap = self.counters.snapshot();
        debug!(
            total = snap.total,
            unique = snap.unique,
            failed = snap.failed,
            "Click stats"
        );
    }
}
