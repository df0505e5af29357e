//! Process-wide click counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::RejectReason;

/// Monotonic counters for click attempts.
///
/// Reset only on restart. Each update is mirrored to the `metrics` facade so
/// an installed exporter sees the same numbers.
#[derive(Debug, Default)]
pub struct ClickCounters {
    total: AtomicU64,
    unique: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`ClickCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub total: u64,
    pub unique: u64,
    pub failed: u64,
}

impl ClickCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a billable click: total and unique are incremented.
    pub fn record_billable(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.unique.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_total", "outcome" => "billable").increment(1);
    }

    /// Records a rejected click: total and failed are incremented.
    pub fn record_failed(&self, reason: RejectReason) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_total", "outcome" => "failed").increment(1);
        metrics::counter!("clicks_rejected_total", "reason" => reason.as_str()).increment(1);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total: self.total.load(Ordering::Relaxed),
            unique: self.unique.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
