//! Placement store implementations.
//!
//! - [`PgPlacementRepository`] - PostgreSQL via SQLx
//! - [`InMemoryPlacementRepository`] - Process-local fallback and test store

pub mod memory_placement_repository;
pub mod pg_placement_repository;

pub use memory_placement_repository::InMemoryPlacementRepository;
pub use pg_placement_repository::PgPlacementRepository;
