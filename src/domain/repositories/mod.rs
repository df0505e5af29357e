//! Repository trait definitions for the domain layer.
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod placement_repository;

pub use placement_repository::PlacementRepository;

#[cfg(test)]
pub use placement_repository::MockPlacementRepository;
