//! Utility functions for code generation, input validation, and request handling.
//!
//! - [`code_generator`] - Random short code generation
//! - [`alias_validator`] - Custom alias format and reserved word checks
//! - [`url_validator`] - Long URL validation
//! - [`extract_api_key`] - API key extraction from HTTP headers

pub mod alias_validator;
pub mod code_generator;
pub mod extract_api_key;
pub mod url_validator;
