//! Click attempt and outcome types for the validation pipeline.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A single inbound request against the tracking redirect endpoint.
///
/// Exists only for the duration of one request and is never persisted.
#[derive(Debug, Clone)]
pub struct ClickAttempt {
    pub ip: String,
    pub params: HashMap<String, String>,
    pub user_agent: String,
    pub received_at: DateTime<Utc>,
}

impl ClickAttempt {
    /// Creates a click attempt stamped with the current time.
    pub fn new(ip: String, params: HashMap<String, String>, user_agent: String) -> Self {
        Self {
            ip,
            params,
            user_agent,
            received_at: Utc::now(),
        }
    }

    /// Overrides the arrival time.
    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }

    /// Returns the value of a query parameter if it is present and non-empty.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Why a click was not billable.
///
/// Never exposed to the client; used for server-side logs and metrics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    MissingParameters,
    BotUserAgent,
    InvalidSignature,
    MissingToken,
    InvalidToken,
    DuplicateClick,
    RegistryUnavailable,
    PlacementNotFound,
    LookupFailed,
    StaleLink,
    InternalFault,
}

impl RejectReason {
    /// Stable label for logs and metric dimensions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingParameters => "missing_parameters",
            Self::BotUserAgent => "bot_user_agent",
            Self::InvalidSignature => "invalid_signature",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::DuplicateClick => "duplicate_click",
            Self::RegistryUnavailable => "registry_unavailable",
            Self::PlacementNotFound => "placement_not_found",
            Self::LookupFailed => "lookup_failed",
            Self::StaleLink => "stale_link",
            Self::InternalFault => "internal_fault",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of the click pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Billable click; redirect to the placement's landing page.
    Accepted { landing_url: String },
    /// Any failure; redirect to the configured fallback URL.
    Rejected(RejectReason),
}

impl ClickOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(params: &[(&str, &str)]) -> ClickAttempt {
        ClickAttempt::new(
            "10.0.0.1".to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            "Mozilla/5.0".to_string(),
        )
    }

    #[test]
    fn test_param_skips_empty_values() {
        let a = attempt(&[("placementId", ""), ("sig", "abc")]);
        assert_eq!(a.param("placementId"), None);
        assert_eq!(a.param("sig"), Some("abc"));
        assert_eq!(a.param("missing"), None);
    }

    #[test]
    fn test_received_at_override() {
        let at = Utc::now() - chrono::Duration::hours(1);
        let a = attempt(&[]).received_at(at);
        assert_eq!(a.received_at, at);
    }

    #[test]
    fn test_reason_labels_are_snake_case() {
        assert_eq!(RejectReason::DuplicateClick.to_string(), "duplicate_click");
        assert_eq!(RejectReason::StaleLink.as_str(), "stale_link");
    }

    #[test]
    fn test_outcome_is_accepted() {
        assert!(
            ClickOutcome::Accepted {
                landing_url: "https://a.example".to_string()
            }
            .is_accepted()
        );
        assert!(!ClickOutcome::Rejected(RejectReason::BotUserAgent).is_accepted());
    }
}
