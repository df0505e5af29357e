//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_service;
pub mod link_signer;
pub mod placement_service;

pub use auth_service::AuthService;
pub use click_service::ClickService;
pub use link_signer::LinkSigner;
pub use placement_service::PlacementService;
