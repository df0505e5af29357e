//! Application layer services implementing business logic.
//!
//! Services consume repository and registry traits and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::click_service::ClickService`] - Click validation pipeline
//! - [`services::placement_service::PlacementService`] - Placement management
//! - [`services::link_signer::LinkSigner`] - Tracking link signing and verification
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
