//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod generate;
pub mod health;
pub mod redirect;

pub use generate::{generate_custom_url_handler, generate_url_handler};
pub use health::{health_handler, ping_handler};
pub use redirect::{redirect_handler, redirect_url_handler};
