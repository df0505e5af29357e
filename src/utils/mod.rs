//! Click validation checks and request helpers.
//!
//! - [`bot_filter`] - User-agent deny list
//! - [`subscriber_token`] - Token extraction and format validation
//! - [`freshness`] - 72-hour placement validity window
//! - [`client_ip`] - Source address resolution behind optional proxies
//! - [`id_generator`] - Placement identifier generation
//! - [`landing_url`] - Redirect target validation

pub mod bot_filter;
pub mod client_ip;
pub mod freshness;
pub mod id_generator;
pub mod landing_url;
pub mod subscriber_token;
