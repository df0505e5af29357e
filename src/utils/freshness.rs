//! Placement link validity window.

use chrono::{DateTime, Duration, Utc};

/// How long after creation a placement's clicks are attributable.
pub const LINK_VALIDITY_HOURS: i64 = 72;

/// Returns true iff `0 < now - created_at <= 72h`.
///
/// A creation time at or after `now` is rejected as clock skew or a corrupt record.
pub fn is_fresh_at(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(created_at);
    age > Duration::zero() && age <= Duration::hours(LINK_VALIDITY_HOURS)
}

/// [`is_fresh_at`] evaluated against the current wall clock.
pub fn is_fresh(created_at: DateTime<Utc>) -> bool {
    is_fresh_at(created_at, Utc::now())
}
