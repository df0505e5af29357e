//! Click uniqueness registry.
//!
//! Provides a [`ClickRegistry`] trait with two implementations:
//! - [`InMemoryClickRegistry`] - Default, process-lifetime map
//! - [`RedisClickRegistry`] - Shared store for multi-instance deployments

mod memory_registry;
mod redis_registry;
mod service;

pub use memory_registry::InMemoryClickRegistry;
pub use redis_registry::RedisClickRegistry;
pub use service::{ClickRegistry, RegistryError, RegistryResult};
