//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Placement stores (PostgreSQL and in-memory)
//! - [`registry`] - Click uniqueness registries (in-memory and Redis)

pub mod persistence;
pub mod registry;
