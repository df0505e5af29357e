//! Click registry trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur while consulting the click registry.
#[derive(Debug)]
pub enum RegistryError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Registry connection error: {}", e),
            Self::OperationError(e) => write!(f, "Registry operation error: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// IP → subscriber-token uniqueness tracker.
///
/// Tracking is keyed by source IP alone, not by placement: the same token
/// clicked under two placements from one IP is billable once.
///
/// # Atomicity
///
/// [`ClickRegistry::check_and_record`] must behave as a single compare-and-insert.
/// Two concurrent calls with the same `(ip, token)` pair must never both
/// return `true`.
///
/// # Implementations
///
/// - [`crate::infrastructure::registry::InMemoryClickRegistry`] - Mutex-guarded map, process lifetime
/// - [`crate::infrastructure::registry::RedisClickRegistry`] - Shared set per IP, optional expiry
#[async_trait]
pub trait ClickRegistry: Send + Sync {
    /// Records `token` for `ip` and reports whether the pair is new.
    ///
    /// Returns `Ok(true)` and inserts the token on first sight; returns
    /// `Ok(false)` without mutating state for a repeated pair.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the backend cannot be reached. Callers
    /// must treat an error as "not billable".
    async fn check_and_record(&self, ip: &str, token: &str) -> RegistryResult<bool>;

    /// Checks if the registry backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}
