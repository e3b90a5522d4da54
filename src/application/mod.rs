//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::issuance_service::IssuanceService`] - Short URL creation (generated or custom)
//! - [`services::resolution_service::ResolutionService`] - Short code lookup for redirects
//! - [`services::access_gate::AccessGate`] - API key authorization

pub mod services;
