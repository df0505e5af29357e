//! DTOs for click statistics endpoint.

use serde::Serialize;

use crate::domain::counters::CounterSnapshot;

/// Click counters since process start.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_clicks: u64,
    pub unique_clicks: u64,
    pub failed_clicks: u64,
}

impl From<CounterSnapshot> for StatsResponse {
    fn from(snap: CounterSnapshot) -> Self {
        Self {
            total_clicks: snap.total,
            unique_clicks: snap.unique,
            failed_clicks: snap.failed,
        }
    }
}
