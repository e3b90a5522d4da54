//! Business logic services for the application layer.

pub mod access_gate;
pub mod issuance_service;
pub mod resolution_service;

pub use access_gate::{AccessGate, ApiKeyEntry, KeyId, MAX_KEY_ID_LENGTH};
pub use issuance_service::{IssuanceService, IssuanceSettings, IssuedUrl};
pub use resolution_service::{Resolution, ResolutionService};
