//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A persisted short code to long URL mapping
//! - [`NewUrlRecord`] - Input for inserting a record
//! - [`Origin`] - Whether a code was generated or chosen by the caller

pub mod url_record;

pub use url_record::{NewUrlRecord, Origin, UrlRecord};
