//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod click;
pub mod health;
pub mod placements;
pub mod stats;

pub use click::click_handler;
pub use health::health_handler;
pub use placements::{
    create_placement_handler, delete_placement_handler, get_placement_handler,
    list_placements_handler, update_placement_handler,
};
pub use stats::stats_handler;
