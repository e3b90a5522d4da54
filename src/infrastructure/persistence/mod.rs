//! Mapping store implementations.
//!
//! Concrete implementations of [`UrlRepository`](crate::domain::repositories::UrlRepository).
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - PostgreSQL, durable (default)
//! - [`MemoryUrlRepository`] - in-process `DashMap`, lost on restart

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
