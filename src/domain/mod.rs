//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`counters`] - Process-wide click counters
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits are implemented in
//! [`crate::infrastructure::persistence`].

pub mod counters;
pub mod entities;
pub mod repositories;
