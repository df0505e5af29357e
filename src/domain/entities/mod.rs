//! Core domain entities for click attribution.
//!
//! - [`Placement`] - A purchased ad slot with its landing URL
//! - [`ClickAttempt`] - One inbound request against the tracking endpoint
//! - [`ClickOutcome`] / [`RejectReason`] - Result of the validation pipeline
//!
//! Creation and update inputs use separate structs (`NewPlacement`,
//! `PlacementPatch`), following the same pattern throughout the crate.

pub mod click;
pub mod placement;

pub use click::{ClickAttempt, ClickOutcome, RejectReason};
pub use placement::{NewPlacement, Placement, PlacementFilter, PlacementPatch};
