//! # Finprofile Database Crate
//!
//! This crate owns the storage boundary of the system. The domain service
//! never talks to a concrete backend; it holds an `Arc<dyn ProfileStore>`
//! and every read or write flows through that trait.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all
//!   storage-specific logic. It provides a clean, abstract API to the rest
//!   of the application, hiding SQL and locking details.
//! - **Swappable Backends:** Two implementations ship today: `DbRepository`
//!   (PostgreSQL over a pooled connection) and `MemoryStore` (a
//!   mutex-guarded in-process collection). Swapping one for the other never
//!   touches domain logic.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and the
//!   PostgreSQL backend uses a connection pool (`PgPool`) for concurrent
//!   access.
//!
//! ## Public API
//!
//! - `ProfileStore`: The storage abstraction the service is written against.
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `DbRepository` / `MemoryStore`: The two shipped backends.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::ProfileStore;
