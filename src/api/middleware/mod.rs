//! HTTP middleware for request processing and protection.
//!
//! Provides rate limiting and observability middleware. Authorization is not a
//! middleware: the access gate runs inside issuance.

pub mod rate_limit;
pub mod tracing;
